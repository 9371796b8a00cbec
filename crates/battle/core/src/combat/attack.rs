use tracing::trace;

use crate::engine::BattleContext;
use crate::env::RollPurpose;
use crate::events::BattleEvent;
use crate::state::{UnitId, UnitTags};

use super::{AttackType, DamageOutcome, DamageRequest, apply_damage};

/// Resolves one basic attack.
///
/// Crit is drawn once per attack. A pending DOUBLE_DAMAGE tag doubles the hit
/// and is consumed. The attacker gains its per-attack resource before the
/// damage lands. Returns `None` when either side is gone.
pub fn basic_attack(
    ctx: &mut BattleContext<'_>,
    attacker: UnitId,
    defender: UnitId,
) -> Option<DamageOutcome> {
    let to = ctx.state.live_unit(defender)?.position;
    let mana = ctx.config.mana_per_attack;
    let unit = ctx.state.live_unit(attacker)?;
    let from = unit.position;
    let crit_chance = unit.live.crit_chance;

    let crit = ctx.rng.chance_pct(crit_chance, RollPurpose::Crit);
    let unit = ctx.state.live_unit_mut(attacker)?;
    let mut amount = unit.live.atk;
    if unit.has_tag(UnitTags::DOUBLE_DAMAGE) {
        unit.tags.remove(UnitTags::DOUBLE_DAMAGE);
        amount = amount.saturating_mul(2);
    }
    if crit {
        unit.counters.crits += 1;
    }
    unit.gain_pp(mana);

    let outcome = apply_damage(
        ctx,
        DamageRequest::new(defender, amount, AttackType::Physical)
            .from(attacker)
            .dodgeable()
            .crit(crit),
    );
    ctx.emit(BattleEvent::AttackResolved {
        attacker,
        defender,
        from,
        to,
        damage: outcome.taken,
        crit,
    });
    trace!(%attacker, %defender, damage = outcome.taken, crit, "basic attack");
    Some(outcome)
}
