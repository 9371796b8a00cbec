//! Per-unit Moving/Attacking state machine.
//!
//! # Transitions
//!
//! ```text
//! Moving    ── enemy within range ──▶ Attacking
//! Attacking ── no target in range ──▶ Moving (acts again next tick)
//! ```
//!
//! Frozen and sleeping units skip the whole branch, cooldown included.
//! Charmed units walk toward their charmer and never act. Confused units pick
//! targets with [`targeting::confused_target`] and never cast on that pick.

use tracing::trace;

use crate::ability;
use crate::combat;
use crate::state::{StatusKind, UnitId, UnitState};
use crate::targeting;

use super::BattleContext;
use super::movement::step_toward;

/// Runs one tick of a unit's state machine.
pub fn update_unit(ctx: &mut BattleContext<'_>, id: UnitId, dt: u32) {
    let move_delay = ctx.config.move_delay_ms.min(i32::MAX as u32) as i32;
    let Some(unit) = ctx.state.live_unit_mut(id) else {
        return;
    };
    if unit.statuses.is_disabled() {
        return;
    }
    unit.cooldown = unit.cooldown.saturating_sub(dt.min(i32::MAX as u32) as i32);
    if unit.cooldown > 0 {
        return;
    }

    if let Some(charmer) = unit.statuses.origin(StatusKind::Charm) {
        unit.state = UnitState::Moving;
        unit.target = None;
        unit.cooldown = move_delay;
        if let Some(goal) = ctx.state.live_unit(charmer).map(|c| c.position) {
            step_toward(ctx, id, goal);
        }
        return;
    }

    let confused = unit.has_status(StatusKind::Confusion);
    let retained = retained_target(ctx, id, confused);
    let target = match retained {
        Some(target) => Some(target),
        None if confused => targeting::confused_target(ctx.state, ctx.rng, id),
        None => targeting::nearest_enemy(ctx.state, ctx.rng, id),
    };

    let Some(unit) = ctx.state.live_unit(id) else {
        return;
    };
    let position = unit.position;
    let was_attacking = unit.state == UnitState::Attacking;
    let Some((target, target_pos)) =
        target.and_then(|t| ctx.state.live_unit(t).map(|u| (t, u.position)))
    else {
        set_branch(ctx, id, UnitState::Moving, None, 0);
        return;
    };

    let in_range = ctx
        .state
        .live_unit(id)
        .is_some_and(|unit| unit.in_range_of(target_pos));
    if in_range {
        set_branch(ctx, id, UnitState::Attacking, Some(target), 0);
        act(ctx, id, target, confused);
    } else if was_attacking {
        trace!(unit = %id, "target left range");
        set_branch(ctx, id, UnitState::Moving, None, 0);
    } else {
        let moved = step_toward(ctx, id, target_pos);
        let cooldown = if moved { move_delay } else { 0 };
        set_branch(ctx, id, UnitState::Moving, Some(target), cooldown);
        if !moved {
            trace!(unit = %id, %position, "no path toward target");
        }
    }
}

/// Keeps the engaged enemy while it stays alive and in range.
fn retained_target(ctx: &BattleContext<'_>, id: UnitId, confused: bool) -> Option<UnitId> {
    if confused {
        return None;
    }
    let unit = ctx.state.live_unit(id)?;
    if unit.state != UnitState::Attacking {
        return None;
    }
    let target = ctx.state.live_unit(unit.target?)?;
    (target.team != unit.team && unit.in_range_of(target.position)).then_some(target.id)
}

fn set_branch(
    ctx: &mut BattleContext<'_>,
    id: UnitId,
    state: UnitState,
    target: Option<UnitId>,
    cooldown: i32,
) {
    if let Some(unit) = ctx.state.live_unit_mut(id) {
        unit.state = state;
        unit.target = target;
        unit.cooldown = cooldown;
    }
}

/// Resolves exactly one action: a cast when the meter is full and the unit
/// may cast, a basic attack otherwise. The cooldown then resets to the
/// current attack delay.
fn act(ctx: &mut BattleContext<'_>, id: UnitId, target: UnitId, confused: bool) {
    let Some(unit) = ctx.state.live_unit(id) else {
        return;
    };
    let casts = !confused && unit.can_cast() && !unit.has_status(StatusKind::Silence);

    if casts {
        ability::cast(ctx, id, Some(target));
    } else {
        combat::basic_attack(ctx, id, target);
    }

    if let Some(unit) = ctx.state.live_unit_mut(id) {
        unit.cooldown = unit.live.attack_delay_ms();
    }
}
