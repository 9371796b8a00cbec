//! Grid targeting queries.
//!
//! Pure reads over [`BattleState`]. Queries that break ties randomly take the
//! battle's [`BattleRng`] so every choice replays from the seed; all others
//! break ties by scan or insertion order.

use crate::env::{BattleRng, RollPurpose};
use crate::state::{BattleState, Position, Team, UnitId};

/// Live units of `team` currently standing on the board, in insertion order.
fn on_board(state: &BattleState, team: Team) -> impl Iterator<Item = (UnitId, Position)> + '_ {
    state
        .live_units(team)
        .filter(|unit| state.board.get(unit.position) == Some(unit.id))
        .map(|unit| (unit.id, unit.position))
}

/// Collects every candidate at minimum distance from `origin`.
fn closest(candidates: impl Iterator<Item = (UnitId, Position)>, origin: Position) -> Vec<UnitId> {
    let mut best = u32::MAX;
    let mut tied = Vec::new();
    for (id, position) in candidates {
        let distance = origin.distance(position);
        if distance < best {
            best = distance;
            tied.clear();
        }
        if distance == best {
            tied.push(id);
        }
    }
    tied
}

/// Nearest enemy of `team` seen from `origin`; ties are broken uniformly.
pub fn nearest_enemy_from(
    state: &BattleState,
    rng: &mut BattleRng,
    team: Team,
    origin: Position,
) -> Option<UnitId> {
    let tied = closest(on_board(state, team.opponent()), origin);
    rng.pick(&tied, RollPurpose::TieBreak)
}

/// Nearest enemy of a unit, or `None` when no enemy is left on the board.
pub fn nearest_enemy(state: &BattleState, rng: &mut BattleRng, unit: UnitId) -> Option<UnitId> {
    let unit = state.live_unit(unit)?;
    nearest_enemy_from(state, rng, unit.team, unit.position)
}

/// Target chosen by a confused unit: the nearest other unit of either team,
/// with the unit itself always among the candidates.
pub fn confused_target(state: &BattleState, rng: &mut BattleRng, unit: UnitId) -> Option<UnitId> {
    let me = state.live_unit(unit)?;
    let others = Team::ALL
        .into_iter()
        .flat_map(|team| on_board(state, team))
        .filter(|(id, _)| *id != unit);
    let mut candidates = closest(others, me.position);
    candidates.push(unit);
    rng.pick(&candidates, RollPurpose::RandomTarget)
}

/// Farthest enemy; the first in insertion order wins ties.
pub fn farthest_enemy(state: &BattleState, unit: UnitId) -> Option<UnitId> {
    let me = state.live_unit(unit)?;
    on_board(state, me.team.opponent())
        .fold(None, |best: Option<(UnitId, u32)>, (id, position)| {
            let distance = me.position.distance(position);
            match best {
                Some((_, d)) if d >= distance => best,
                _ => Some((id, distance)),
            }
        })
        .map(|(id, _)| id)
}

/// Landing spot next to the farthest reachable enemy.
///
/// Enemies are tried farthest first; for each one the empty adjacent cell
/// farthest from the caster is chosen. The first enemy with a free neighbour
/// wins.
pub fn farthest_landing(state: &BattleState, unit: UnitId) -> Option<(UnitId, Position)> {
    let me = state.live_unit(unit)?;
    let mut enemies: Vec<(UnitId, Position)> = on_board(state, me.team.opponent()).collect();
    enemies.sort_by_key(|(_, position)| std::cmp::Reverse(me.position.distance(*position)));

    enemies.into_iter().find_map(|(id, position)| {
        state
            .board
            .adjacent_cells(position)
            .into_iter()
            .filter(|cell| state.board.is_empty_cell(*cell))
            .fold(None, |best: Option<Position>, cell| match best {
                Some(current) if current.distance(me.position) >= cell.distance(me.position) => {
                    best
                }
                _ => Some(cell),
            })
            .map(|cell| (id, cell))
    })
}

/// Empty cell touching the most units of `enemy_of`'s opponents.
///
/// Ties go to the first cell in scan order. Returns `None` only when the
/// board has no empty cell.
pub fn most_surrounded_cell(state: &BattleState, enemy_of: Team) -> Option<Position> {
    let enemy = enemy_of.opponent();
    let mut best: Option<(Position, usize)> = None;
    for cell in state.board.positions() {
        if !state.board.is_empty_cell(cell) {
            continue;
        }
        let count = state
            .board
            .adjacent_cells(cell)
            .into_iter()
            .filter(|adjacent| state.unit_at(*adjacent).is_some_and(|u| u.team == enemy))
            .count();
        if best.is_none_or(|(_, c)| count > c) {
            best = Some((cell, count));
        }
    }
    best.map(|(cell, _)| cell)
}

/// Enemies of `caster` ordered front row first.
///
/// Blue deploys on low rows, so its front-most enemies are those with the
/// lowest row; red sees the reverse. Columns break ties left to right.
pub fn rank_ordered_enemies(state: &BattleState, caster: UnitId) -> Vec<UnitId> {
    let Some(me) = state.live_unit(caster) else {
        return Vec::new();
    };
    let mut enemies: Vec<(UnitId, Position)> = on_board(state, me.team.opponent()).collect();
    match me.team {
        Team::Blue => enemies.sort_by_key(|(_, p)| (p.y, p.x)),
        Team::Red => enemies.sort_by_key(|(_, p)| (std::cmp::Reverse(p.y), p.x)),
    }
    enemies.into_iter().map(|(id, _)| id).collect()
}

/// Live units of `team` standing on any of `cells`, in the order of `cells`.
pub fn units_on_cells(state: &BattleState, cells: &[Position], team: Team) -> Vec<UnitId> {
    cells
        .iter()
        .filter_map(|cell| state.unit_at(*cell))
        .filter(|unit| unit.team == team)
        .map(|unit| unit.id)
        .collect()
}

/// Units of `team` adjacent to `center`.
pub fn adjacent_units(state: &BattleState, center: Position, team: Team) -> Vec<UnitId> {
    units_on_cells(state, &state.board.adjacent_cells(center), team)
}

/// Units of `team` within `radius` of `center` (center excluded).
pub fn units_in_radius(state: &BattleState, center: Position, radius: u32, team: Team) -> Vec<UnitId> {
    units_on_cells(state, &state.board.cells_in_radius(center, radius), team)
}

/// Units of `team` on the line from `from` to `to`, `to` included.
pub fn units_in_line(state: &BattleState, from: Position, to: Position, team: Team) -> Vec<UnitId> {
    let mut cells = state.board.cells_between(from, to);
    cells.push(to);
    units_on_cells(state, &cells, team)
}

/// Ally with the lowest life share; the first in insertion order wins ties.
pub fn lowest_life_ally(state: &BattleState, team: Team) -> Option<UnitId> {
    state
        .live_units(team)
        .fold(None, |best: Option<(UnitId, u32)>, unit| {
            let pct = unit.life_pct();
            match best {
                Some((_, p)) if p <= pct => best,
                _ => Some((unit.id, pct)),
            }
        })
        .map(|(id, _)| id)
}

/// Uniformly random enemy of `team`.
pub fn random_enemy(state: &BattleState, rng: &mut BattleRng, team: Team) -> Option<UnitId> {
    let enemies: Vec<UnitId> = on_board(state, team.opponent()).map(|(id, _)| id).collect();
    rng.pick(&enemies, RollPurpose::RandomTarget)
}
