//! Healing, shielding and buffs.

use crate::combat;
use crate::engine::{BattleContext, DeferredAction};
use crate::state::{StatKind, StatusKind, UnitTags};
use crate::targeting;

use super::{CasterView, inflict};
use crate::ability::{AbilityError, Cast};

const AGILITY_DURATION_MS: u32 = 4000;

/// Heals the most injured ally, caster included.
pub fn wish(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    if let Some(ally) = targeting::lowest_life_ally(ctx.state, view.team) {
        combat::heal(ctx, ally, view.power([40, 80, 150]), Some(view.id));
    }
    Ok(())
}

pub fn recover(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let amount = combat::percent_of(view.max_life, view.tuned([25, 35, 50]));
    combat::heal(ctx, view.id, amount, Some(view.id));
    Ok(())
}

pub fn protect(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    inflict(ctx, cast, view.id, StatusKind::Protect, view.tuned([1500, 3000, 5000]));
    Ok(())
}

/// Cleanses and heals the whole team.
pub fn aromatherapy(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let amount = view.power([20, 40, 80]);
    for ally in ctx.state.live_ids(view.team) {
        combat::cleanse(ctx, ally);
        combat::heal(ctx, ally, amount, Some(view.id));
    }
    Ok(())
}

/// Shields the caster and its neighbours from negative statuses.
pub fn safeguard(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let duration = view.tuned([3000, 5000, 8000]);
    let mut allies = vec![view.id];
    allies.extend(targeting::adjacent_units(ctx.state, view.position, view.team));
    for ally in allies {
        inflict(ctx, cast, ally, StatusKind::RuneProtect, duration);
    }
    Ok(())
}

pub fn iron_defense(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let bonus = view.tuned([5.0, 10.0, 20.0]);
    if let Some(caster) = ctx.state.live_unit_mut(view.id) {
        caster.live.add_flat(StatKind::Def, bonus);
        caster.live.add_flat(StatKind::SpeDef, bonus);
    }
    Ok(())
}

pub fn swords_dance(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let bonus = view.tuned([5.0, 10.0, 20.0]);
    if let Some(caster) = ctx.state.live_unit_mut(view.id) {
        caster.live.add_flat(StatKind::Atk, bonus);
        caster.tags |= UnitTags::DOUBLE_DAMAGE;
    }
    Ok(())
}

/// Temporary attack speed boost, reverted by a deferred action.
pub fn agility(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let bonus = view.tuned([0.3, 0.5, 0.8]);
    if let Some(caster) = ctx.state.live_unit_mut(view.id) {
        caster.live.add_flat(StatKind::AttackSpeed, bonus);
    }
    ctx.schedule(
        AGILITY_DURATION_MS,
        DeferredAction::RevertStat {
            target: view.id,
            stat: StatKind::AttackSpeed,
            amount: bonus,
        },
    );
    Ok(())
}

/// Shields the closest allies and primes their next attack.
pub fn helping_hand(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let count = view.tuned([2, 3, 4]);
    let shield = view.power([20, 40, 60]);

    let mut allies: Vec<_> = ctx
        .state
        .live_units(view.team)
        .filter(|unit| unit.id != view.id)
        .map(|unit| (unit.id, unit.position.distance(view.position)))
        .collect();
    allies.sort_by_key(|(_, distance)| *distance);

    for (ally, _) in allies.into_iter().take(count) {
        combat::add_shield(ctx, ally, shield, Some(view.id));
        if let Some(unit) = ctx.state.live_unit_mut(ally) {
            unit.tags |= UnitTags::DOUBLE_DAMAGE;
        }
    }
    Ok(())
}
