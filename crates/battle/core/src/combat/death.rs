//! Lethal-hit resolution: revive, removal and on-death hooks.

use tracing::{debug, warn};

use crate::engine::BattleContext;
use crate::env::Item;
use crate::events::BattleEvent;
use crate::state::{StatKind, StatusKind, UnitId, UnitTags};

/// Resolves a unit whose life reached zero.
///
/// A REVIVE tag intercepts the death once: the unit returns at full life,
/// loses its negative statuses and is protected for a short while. Otherwise
/// the unit leaves the board and the on-death hooks run in order: killer
/// rewards, RALLY buffs for the killer's team, then the spawn-on-death summon.
///
/// Returns `true` if the unit died for good.
pub fn resolve_lethal(ctx: &mut BattleContext<'_>, victim: UnitId, killer: Option<UnitId>) -> bool {
    let revive_protect_ms = ctx.config.revive_protect_ms;
    let Some(unit) = ctx.state.live_unit_mut(victim) else {
        return false;
    };
    if unit.life() > 0 {
        return false;
    }
    let position = unit.position;
    let team = unit.team;

    if unit.has_tag(UnitTags::REVIVE) {
        unit.tags.remove(UnitTags::REVIVE);
        unit.revive();
        unit.statuses
            .trigger(StatusKind::Protect, revive_protect_ms, None);
        debug!(unit = %victim, %position, "unit revived");
        ctx.emit(BattleEvent::UnitRevived {
            unit: victim,
            position,
        });
        return false;
    }

    let summon = unit.summon_on_death.take();
    ctx.state.remove_from_board(victim);
    debug!(unit = %victim, killer = ?killer, %position, "unit fainted");
    ctx.emit(BattleEvent::UnitDied {
        unit: victim,
        killer,
        position,
    });

    if let Some(killer) = killer.filter(|k| *k != victim) {
        reward_killer(ctx, killer);
    }

    if let Some(spec) = summon {
        match ctx.state.spawn_unit(team, position, &spec) {
            Ok(id) => {
                if let Some(summoned) = ctx.state.unit_mut(id) {
                    summoned.tags |= UnitTags::SUMMONED;
                }
                ctx.emit(BattleEvent::UnitSpawned {
                    unit: id,
                    team,
                    position,
                });
            }
            Err(err) => warn!(%err, unit = %victim, "spawn-on-death summon failed"),
        }
    }
    true
}

fn reward_killer(ctx: &mut BattleContext<'_>, killer: UnitId) {
    let kill_mana = ctx.config.kill_mana_reward;
    let rally_bonus = ctx.config.rally_attack_bonus;
    let Some(unit) = ctx.state.live_unit_mut(killer) else {
        return;
    };
    unit.counters.kills += 1;
    unit.gain_pp(kill_mana);
    if unit.has_item(Item::AmuletCoin) {
        unit.counters.gold_earned += Item::AMULET_COIN_GOLD;
    }
    let team = unit.team;

    for ally in ctx.state.live_ids(team) {
        if let Some(ally) = ctx.state.unit_mut(ally) {
            if ally.has_tag(UnitTags::RALLY) {
                ally.live.add_flat(StatKind::Atk, rally_bonus as f32);
            }
        }
    }
}
