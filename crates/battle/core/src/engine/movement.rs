use tracing::warn;

use crate::events::BattleEvent;
use crate::state::{Position, UnitId};

use super::BattleContext;

/// Moves a unit one cell toward `goal`.
///
/// Picks the empty neighbour that minimizes Chebyshev then Manhattan
/// distance (first in scan order on ties) and only moves when that strictly
/// improves on the current cell. Returns whether the unit moved.
pub fn step_toward(ctx: &mut BattleContext<'_>, id: UnitId, goal: Position) -> bool {
    let Some(unit) = ctx.state.live_unit(id) else {
        return false;
    };
    let from = unit.position;
    let score = |cell: Position| (cell.distance(goal), cell.manhattan(goal));

    let best = ctx
        .state
        .board
        .adjacent_cells(from)
        .into_iter()
        .filter(|cell| ctx.state.board.is_empty_cell(*cell))
        .fold(None, |best: Option<Position>, cell| match best {
            Some(current) if score(current) <= score(cell) => Some(current),
            _ => Some(cell),
        });

    let Some(to) = best.filter(|cell| score(*cell) < score(from)) else {
        return false;
    };
    teleport(ctx, id, to)
}

/// Moves a unit straight to an empty cell and reports it.
pub fn teleport(ctx: &mut BattleContext<'_>, id: UnitId, to: Position) -> bool {
    match ctx.state.move_unit(id, to) {
        Ok(from) if from != to => {
            ctx.emit(BattleEvent::UnitMoved { unit: id, from, to });
            true
        }
        Ok(_) => false,
        Err(err) => {
            warn!(unit = %id, %to, %err, "move rejected");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ability::build_registry;
    use crate::config::BattleConfig;
    use crate::engine::Scheduler;
    use crate::env::{BattleRng, UnitSpec, Weather};
    use crate::state::{BattleState, Board, Stats, Team};

    #[test]
    fn step_reduces_distance_and_avoids_occupied_cells() {
        let mut state = BattleState::new(Board::new(8, 6), Weather::Neutral);
        let spec = UnitSpec::new("u", Position::ORIGIN, Stats::default());
        let mover = state.spawn_unit(Team::Blue, Position::new(0, 0), &spec).unwrap();
        state.spawn_unit(Team::Blue, Position::new(1, 1), &spec).unwrap();

        let registry = Arc::new(build_registry());
        let config = BattleConfig::default();
        let mut rng = BattleRng::new(0);
        let mut scheduler = Scheduler::new();
        let mut events = Vec::new();
        let mut ctx = BattleContext::new(
            &mut state,
            &mut rng,
            &mut scheduler,
            &mut events,
            &registry,
            &config,
        );

        assert!(step_toward(&mut ctx, mover, Position::new(5, 5)));
        let now = ctx.state.unit(mover).unwrap().position;
        assert_eq!(now, Position::new(1, 0));
        assert_eq!(now.manhattan(Position::new(5, 5)), 9);
        assert!(matches!(events.as_slice(), [BattleEvent::UnitMoved { .. }]));
    }
}
