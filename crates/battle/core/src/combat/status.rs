//! Status application with its battle-wide side effects.
//!
//! [`StatusEffects`](crate::state::StatusEffects) only tracks timers; these
//! helpers add what needs the rest of the battle: events, the attack speed
//! held back by paralysis and the SYNCHRONIZE fan-out.

use tracing::trace;

use crate::engine::BattleContext;
use crate::events::{BattleEvent, BoardEventKind};
use crate::state::{StatusKind, UnitId, UnitTags};

/// Triggers a status on one unit without fan-out.
fn trigger(
    ctx: &mut BattleContext<'_>,
    target: UnitId,
    kind: StatusKind,
    duration_ms: u32,
    origin: Option<UnitId>,
) -> bool {
    let Some(unit) = ctx.state.live_unit_mut(target) else {
        return false;
    };
    if !unit.statuses.trigger(kind, duration_ms, origin) {
        return false;
    }
    unit.on_status_start(kind);
    let position = unit.position;
    ctx.emit(BattleEvent::StatusBoard {
        unit: Some(target),
        kind: BoardEventKind::StatusApplied(kind),
        position,
        magnitude: duration_ms,
    });
    trace!(unit = %target, %kind, duration_ms, "status applied");
    true
}

/// Triggers a status on `target`.
///
/// When the target carries SYNCHRONIZE and the status took hold, every other
/// living teammate receives it once as well. Teammates never propagate it
/// further and the target is never re-triggered. Returns whether the target
/// itself became affected.
pub fn apply_status(
    ctx: &mut BattleContext<'_>,
    target: UnitId,
    kind: StatusKind,
    duration_ms: u32,
    origin: Option<UnitId>,
) -> bool {
    if !trigger(ctx, target, kind, duration_ms, origin) {
        return false;
    }

    let Some(unit) = ctx.state.live_unit(target) else {
        return true;
    };
    if unit.has_tag(UnitTags::SYNCHRONIZE) {
        let team = unit.team;
        for ally in ctx.state.live_ids(team) {
            if ally != target {
                trigger(ctx, ally, kind, duration_ms, origin);
            }
        }
    }
    true
}

/// Ends one status early. Returns whether it was active.
pub fn clear_status(ctx: &mut BattleContext<'_>, target: UnitId, kind: StatusKind) -> bool {
    let Some(unit) = ctx.state.live_unit_mut(target) else {
        return false;
    };
    if !unit.statuses.clear(kind) {
        return false;
    }
    unit.on_status_end(kind);
    let position = unit.position;
    ctx.emit(BattleEvent::StatusBoard {
        unit: Some(target),
        kind: BoardEventKind::StatusCleared(kind),
        position,
        magnitude: 0,
    });
    true
}

/// Clears every negative status. Returns how many were cleared.
pub fn cleanse(ctx: &mut BattleContext<'_>, target: UnitId) -> usize {
    let Some(unit) = ctx.state.live_unit_mut(target) else {
        return 0;
    };
    let cleared = unit.statuses.cleanse();
    for kind in cleared.iter().copied() {
        unit.on_status_end(kind);
    }
    let position = unit.position;
    for kind in cleared.iter().copied() {
        ctx.emit(BattleEvent::StatusBoard {
            unit: Some(target),
            kind: BoardEventKind::StatusCleared(kind),
            position,
            magnitude: 0,
        });
    }
    cleared.len()
}
