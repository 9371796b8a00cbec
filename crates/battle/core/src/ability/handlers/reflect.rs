//! Abilities that borrow other abilities.
//!
//! None of these are copyable themselves, so a chain of reflections always
//! ends after one hop.

use tracing::debug;

use crate::engine::BattleContext;
use crate::env::RollPurpose;

use super::{CasterView, primary_target};
use crate::ability::{AbilityError, AbilityId, Cast};

/// Runs `ability` as if the caster owned it.
fn borrow(ctx: &mut BattleContext<'_>, cast: &Cast, ability: AbilityId) -> Result<(), AbilityError> {
    let effect = ctx.registry.get(ability);
    if !effect.copyable {
        return Ok(());
    }
    debug!(unit = %cast.caster, %ability, "borrowed ability");
    (effect.apply)(ctx, cast)
}

/// Casts the target's ability. Non-copyable abilities yield nothing.
pub fn mimic(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let Some(ability) = ctx.state.live_unit(target).map(|unit| unit.ability) else {
        return Ok(());
    };
    borrow(ctx, &Cast { target: Some(target), ..*cast }, ability)
}

pub fn metronome(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    CasterView::capture(ctx, cast)?;
    let pool = ctx.registry.copyable_ids();
    match ctx.rng.pick(&pool, RollPurpose::RandomAbility) {
        Some(ability) => borrow(ctx, cast, ability),
        None => Ok(()),
    }
}

/// Permanently takes the target's ability and its offensive stats.
pub fn transform(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let Some(model) = ctx.state.live_unit(target) else {
        return Ok(());
    };
    let ability = model.ability;
    let (atk, def, spe_def) = (model.live.atk, model.live.def, model.live.spe_def);
    let copy_ability = ctx.registry.is_copyable(ability);

    if let Some(caster) = ctx.state.live_unit_mut(view.id) {
        if copy_ability {
            caster.ability = ability;
        }
        caster.live.atk = atk;
        caster.live.def = def;
        caster.live.spe_def = spe_def;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::events::BattleEvent;
    use crate::state::{Stats, Team};

    fn with_ability(h: &mut Harness, id: crate::state::UnitId, ability: AbilityId) {
        h.state.unit_mut(id).unwrap().ability = ability;
    }

    #[test]
    fn mimic_casts_the_target_ability() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::new(10, 0, 0, 300));
        let enemy = h.spawn(Team::Red, 0, 2, Stats::new(10, 0, 0, 300));
        with_ability(&mut h, caster, AbilityId::Mimic);
        with_ability(&mut h, enemy, AbilityId::Thunder);

        let cast = Cast { caster, target: Some(enemy), crit: false };
        mimic(&mut h.ctx(), &cast).unwrap();
        assert_eq!(h.life(enemy), 270);
    }

    #[test]
    fn mimic_against_a_reflection_does_nothing() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::default());
        let enemy = h.spawn(Team::Red, 0, 2, Stats::default());
        with_ability(&mut h, caster, AbilityId::Mimic);
        with_ability(&mut h, enemy, AbilityId::Mimic);

        let cast = Cast { caster, target: Some(enemy), crit: false };
        mimic(&mut h.ctx(), &cast).unwrap();
        assert!(h.events.is_empty());
        assert_eq!(h.life(enemy), 100);
    }

    #[test]
    fn metronome_draws_from_the_copyable_pool() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::default());
        h.spawn(Team::Red, 0, 2, Stats::default());

        let before = h.rng.draws();
        let cast = Cast { caster, target: None, crit: false };
        metronome(&mut h.ctx(), &cast).unwrap();
        assert!(h.rng.draws() > before);
    }

    #[test]
    fn transform_adopts_ability_and_stats() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::new(5, 1, 1, 100));
        let enemy = h.spawn(Team::Red, 0, 2, Stats::new(40, 9, 7, 100));
        with_ability(&mut h, caster, AbilityId::Transform);
        with_ability(&mut h, enemy, AbilityId::IceBeam);

        let cast = Cast { caster, target: Some(enemy), crit: false };
        transform(&mut h.ctx(), &cast).unwrap();
        let unit = h.state.unit(caster).unwrap();
        assert_eq!(unit.ability, AbilityId::IceBeam);
        assert_eq!((unit.live.atk, unit.live.def, unit.live.spe_def), (40, 9, 7));
        assert!(!h.events.iter().any(|e| matches!(e, BattleEvent::DamageApplied { .. })));
    }
}
