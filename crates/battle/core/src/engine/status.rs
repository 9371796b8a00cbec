//! Per-tick upkeep of a unit: status timers, environment and regeneration.

use crate::combat::{self, AttackType, DamageRequest, percent_of};
use crate::env::Item;
use crate::events::{BattleEvent, BoardEventKind};
use crate::state::{EnvironmentKind, StatusKind, StatusPulse, UnitId, UnitTags};

use super::BattleContext;

/// Advances a unit's status timers, resolving damage pulses and expiries.
pub fn tick_statuses(ctx: &mut BattleContext<'_>, id: UnitId, dt: u32) {
    let pulse_ms = ctx.config.status_pulse_ms;
    let Some(unit) = ctx.state.live_unit_mut(id) else {
        return;
    };
    let max_life = unit.max_life();
    let pulses = unit.statuses.update(dt, pulse_ms);

    for pulse in pulses {
        let Some(unit) = ctx.state.live_unit_mut(id) else {
            return;
        };
        match pulse {
            StatusPulse::Pulse {
                kind,
                origin,
                count,
            } => {
                let pct = match kind {
                    StatusKind::Burn => ctx.config.burn_hp_pct,
                    StatusKind::Poison => ctx.config.poison_hp_pct,
                    _ => continue,
                };
                let amount = percent_of(max_life, pct).max(1);
                for _ in 0..count {
                    if ctx.state.live_unit(id).is_none() {
                        return;
                    }
                    combat::apply_damage(
                        ctx,
                        DamageRequest::new(id, amount, AttackType::True)
                            .from_opt(origin)
                            .without_reactions(),
                    );
                }
            }
            StatusPulse::Expired { kind } => {
                unit.on_status_end(kind);
                let position = unit.position;
                ctx.emit(BattleEvent::StatusBoard {
                    unit: Some(id),
                    kind: BoardEventKind::StatusExpired(kind),
                    position,
                    magnitude: 0,
                });
            }
        }
    }
}

/// Applies the environment tag under a unit.
///
/// Harmful tags (re)apply their status every tick; the status itself is
/// idempotent while active. Grass heals once per elapsed status pulse period.
/// FLYING units ignore the ground.
pub fn apply_environment(ctx: &mut BattleContext<'_>, id: UnitId, dt: u32) {
    let Some(unit) = ctx.state.live_unit(id) else {
        return;
    };
    if unit.has_tag(UnitTags::FLYING) {
        return;
    }
    let team = unit.team;
    let max_life = unit.max_life();
    let tag = ctx
        .state
        .board
        .environment(unit.position)
        .filter(|tag| tag.affects(team));

    let Some(tag) = tag else {
        if let Some(unit) = ctx.state.live_unit_mut(id) {
            unit.environment_elapsed = 0;
        }
        return;
    };

    let status = match tag.kind {
        EnvironmentKind::Ember => StatusKind::Burn,
        EnvironmentKind::PoisonGas => StatusKind::Poison,
        EnvironmentKind::StickyWeb => StatusKind::Paralysis,
        EnvironmentKind::Smoke => StatusKind::Confusion,
        EnvironmentKind::Grass => {
            let pulse_ms = ctx.config.status_pulse_ms.clamp(1, i32::MAX as u32) as i32;
            let heal_pct = ctx.config.grass_heal_pct;
            let Some(unit) = ctx.state.live_unit_mut(id) else {
                return;
            };
            unit.environment_elapsed = unit
                .environment_elapsed
                .saturating_add(dt.min(i32::MAX as u32) as i32);
            let mut periods = 0;
            while unit.environment_elapsed >= pulse_ms {
                unit.environment_elapsed -= pulse_ms;
                periods += 1;
            }
            let amount = percent_of(max_life, heal_pct).max(1);
            for _ in 0..periods {
                combat::heal(ctx, id, amount, None);
            }
            return;
        }
    };
    let duration = ctx.config.hazard_status_ms;
    combat::apply_status(ctx, id, status, duration, None);
}

/// Advances passive regeneration: resource from `mana_regen` and the
/// Leftovers heal, once per regeneration interval.
pub fn tick_regen(ctx: &mut BattleContext<'_>, id: UnitId, dt: u32) {
    let interval = ctx.config.regen_interval_ms.max(1) as i32;
    let Some(unit) = ctx.state.live_unit_mut(id) else {
        return;
    };
    unit.regen_elapsed = unit
        .regen_elapsed
        .saturating_add(dt.min(i32::MAX as u32) as i32);
    let mut periods = 0;
    while unit.regen_elapsed >= interval {
        unit.regen_elapsed -= interval;
        periods += 1;
    }
    if periods == 0 {
        return;
    }
    let regen = unit.live.mana_regen;
    unit.gain_pp(regen.saturating_mul(periods));
    if unit.has_item(Item::Leftovers) {
        let amount = percent_of(unit.max_life(), Item::LEFTOVERS_HEAL_PCT).max(1);
        for _ in 0..periods {
            combat::heal(ctx, id, amount, Some(id));
        }
    }
}
