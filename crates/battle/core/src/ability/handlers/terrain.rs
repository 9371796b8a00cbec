//! Abilities that leave environment tags on the board.

use crate::combat::{self, AttackType};
use crate::engine::BattleContext;
use crate::events::{BattleEvent, BoardEventKind};
use crate::state::{EnvironmentKind, EnvironmentTag, Position, StatusKind};
use crate::targeting;

use super::{CasterView, ensure_on_board, hit, inflict, primary_target};
use crate::ability::{AbilityError, AbilityId, Cast};

/// Lays a timed tag owned by the caster's team on every cell.
fn lay(
    ctx: &mut BattleContext<'_>,
    view: &CasterView,
    cells: &[Position],
    kind: EnvironmentKind,
    lifetime_ms: u32,
) -> Result<(), AbilityError> {
    let lifetime = lifetime_ms.min(i32::MAX as u32) as i32;
    for &cell in cells {
        let tag = EnvironmentTag::new(kind, Some(view.team)).with_lifetime(lifetime);
        ctx.state.board.set_environment(cell, Some(tag))?;
        ctx.emit(BattleEvent::StatusBoard {
            unit: None,
            kind: BoardEventKind::EnvironmentPlaced(kind),
            position: cell,
            magnitude: lifetime_ms,
        });
    }
    Ok(())
}

/// The center cell followed by its neighbours within `radius`.
fn patch(ctx: &BattleContext<'_>, center: Position, radius: u32) -> Vec<Position> {
    let mut cells = vec![center];
    cells.extend(ctx.state.board.cells_in_radius(center, radius));
    cells
}

pub fn smog(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, at)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    ensure_on_board(ctx, AbilityId::Smog, at)?;
    let cells = patch(ctx, at, 1);
    lay(ctx, &view, &cells, EnvironmentKind::PoisonGas, 4000)?;
    inflict(ctx, cast, target, StatusKind::Poison, view.tuned([2000, 3000, 4000]));
    Ok(())
}

pub fn sticky_web(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((_, at)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    ensure_on_board(ctx, AbilityId::StickyWeb, at)?;
    let cells = patch(ctx, at, 1);
    lay(ctx, &view, &cells, EnvironmentKind::StickyWeb, 5000)
}

/// Grows healing grass under the caster's side of the fight.
pub fn grassy_terrain(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let cells = patch(ctx, view.position, 1);
    lay(
        ctx,
        &view,
        &cells,
        EnvironmentKind::Grass,
        view.tuned([3000, 5000, 8000]),
    )?;
    combat::heal(ctx, view.id, view.power([20, 40, 80]), Some(view.id));
    Ok(())
}

/// Sets the ground ahead on fire and scorches whoever stands there.
pub fn inferno(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((_, toward)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let cells = ctx.state.board.cells_in_front(view.position, toward, 2);
    let victims = targeting::units_on_cells(ctx.state, &cells, view.enemy());
    lay(ctx, &view, &cells, EnvironmentKind::Ember, 4000)?;
    let damage = view.power([20, 40, 80]);
    for enemy in victims {
        hit(ctx, cast, enemy, damage, AttackType::Special);
    }
    Ok(())
}

pub fn smokescreen(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((_, at)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    ensure_on_board(ctx, AbilityId::Smokescreen, at)?;
    let cells = patch(ctx, at, 1);
    lay(ctx, &view, &cells, EnvironmentKind::Smoke, 3000)
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::state::{Stats, Team};

    #[test]
    fn smog_covers_the_target_area() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::default());
        let enemy = h.spawn(Team::Red, 3, 3, Stats::default());

        let cast = Cast { caster, target: Some(enemy), crit: false };
        smog(&mut h.ctx(), &cast).unwrap();
        for cell in [Position::new(3, 3), Position::new(2, 2), Position::new(4, 4)] {
            let tag = h.state.board.environment(cell).unwrap();
            assert_eq!(tag.kind, EnvironmentKind::PoisonGas);
            assert_eq!(tag.owner, Some(Team::Blue));
        }
        assert!(h.state.board.environment(Position::new(5, 5)).is_none());
        assert!(h.state.unit(enemy).unwrap().has_status(StatusKind::Poison));
    }

    #[test]
    fn placements_are_reported() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::default());
        h.spawn(Team::Red, 7, 5, Stats::default());

        let cast = Cast { caster, target: None, crit: false };
        smokescreen(&mut h.ctx(), &cast).unwrap();
        let placed = h
            .events
            .iter()
            .filter(|event| {
                matches!(
                    event,
                    BattleEvent::StatusBoard {
                        kind: BoardEventKind::EnvironmentPlaced(EnvironmentKind::Smoke),
                        ..
                    }
                )
            })
            .count();
        // Corner target: itself plus three neighbours.
        assert_eq!(placed, 4);
    }

    #[test]
    fn grass_does_not_hurt_its_owner() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 2, 2, Stats::default());

        let cast = Cast { caster, target: None, crit: false };
        grassy_terrain(&mut h.ctx(), &cast).unwrap();
        let tag = h.state.board.environment(Position::new(2, 2)).unwrap();
        assert!(tag.affects(Team::Blue));
        assert!(!tag.affects(Team::Red));
    }
}
