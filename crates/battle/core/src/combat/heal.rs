use crate::engine::BattleContext;
use crate::events::BattleEvent;
use crate::state::{StatusKind, UnitId};

/// Restores life to a live unit. Wounded units cannot be healed.
///
/// Returns the life actually restored.
pub fn heal(
    ctx: &mut BattleContext<'_>,
    target: UnitId,
    amount: u32,
    source: Option<UnitId>,
) -> u32 {
    let Some(unit) = ctx.state.live_unit_mut(target) else {
        return 0;
    };
    if amount == 0 || unit.has_status(StatusKind::Wound) {
        return 0;
    }
    let restored = unit.restore_life(amount);
    if restored == 0 {
        return 0;
    }
    unit.counters.healed += restored as u64;
    let position = unit.position;

    if let Some(healer) = source.and_then(|id| ctx.state.unit_mut(id)) {
        healer.counters.healing_done += restored as u64;
    }
    ctx.emit(BattleEvent::HealApplied {
        source,
        target,
        position,
        amount: restored,
    });
    restored
}

/// Adds shield points to a live unit.
pub fn add_shield(
    ctx: &mut BattleContext<'_>,
    target: UnitId,
    amount: u32,
    source: Option<UnitId>,
) -> u32 {
    let Some(unit) = ctx.state.live_unit_mut(target) else {
        return 0;
    };
    if amount == 0 {
        return 0;
    }
    unit.shield = unit.shield.saturating_add(amount);
    unit.counters.shielded += amount as u64;
    let position = unit.position;
    ctx.emit(BattleEvent::ShieldApplied {
        source,
        target,
        position,
        amount,
    });
    amount
}

/// Grants resource to a live unit.
pub fn restore_pp(ctx: &mut BattleContext<'_>, target: UnitId, amount: u32) {
    if let Some(unit) = ctx.state.live_unit_mut(target) {
        unit.gain_pp(amount);
    }
}
