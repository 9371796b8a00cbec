//! Single-target and line abilities.

use crate::combat::{self, AttackType};
use crate::engine::BattleContext;
use crate::env::Weather;
use crate::state::{StatusKind, UnitTags};
use crate::targeting;

use super::{CasterView, ensure_on_board, hit, inflict, primary_target, strike};
use crate::ability::{AbilityError, AbilityId, Cast};

pub fn thunder(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let mut damage = view.power([30, 60, 120]);
    if matches!(ctx.state.weather, Weather::Rain | Weather::Storm) {
        damage = damage.saturating_mul(2);
    }
    hit(ctx, cast, target, damage, AttackType::Special);
    Ok(())
}

/// Beam through every enemy between the caster and its target.
pub fn solar_beam(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((_, at)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    ensure_on_board(ctx, AbilityId::SolarBeam, at)?;
    let mut damage = view.power([40, 80, 160]);
    if ctx.state.weather == Weather::Sun {
        damage = damage.saturating_mul(2);
    }
    for enemy in targeting::units_in_line(ctx.state, view.position, at, view.enemy()) {
        hit(ctx, cast, enemy, damage, AttackType::Special);
    }
    Ok(())
}

/// Heavy physical blow; a kill refunds half the resource bar.
pub fn guillotine(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let ratio = view.tuned([150, 200, 300]);
    let damage = view.atk.saturating_mul(ratio).div_ceil(100);
    let outcome = strike(ctx, cast, target, damage);
    if outcome.death {
        if let Some(caster) = ctx.state.live_unit_mut(view.id) {
            let refund = caster.max_pp() / 2;
            caster.gain_pp(refund);
        }
    }
    Ok(())
}

pub fn giga_drain(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let outcome = hit(ctx, cast, target, view.power([30, 60, 90]), AttackType::Special);
    combat::heal(ctx, view.id, combat::percent_of(outcome.taken, 50), Some(view.id));
    Ok(())
}

/// True damage scaled on the caster's missing life.
pub fn counter(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let missing = view.max_life.saturating_sub(view.life);
    let damage = combat::percent_of(missing, view.tuned([30, 40, 60]));
    hit(ctx, cast, target, damage, AttackType::True);
    Ok(())
}

pub fn lock_on(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    if let Some(caster) = ctx.state.live_unit_mut(view.id) {
        caster.tags |= UnitTags::LOCK_ON;
    }
    if let Some((target, _)) = primary_target(ctx, cast, &view) {
        let duration = view.tuned([3000, 6000, 9000]);
        inflict(ctx, cast, target, StatusKind::ArmorReduction, duration);
    }
    Ok(())
}

/// Physical slash that always lands as a critical hit.
pub fn night_slash(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let always_crit = Cast { crit: true, ..*cast };
    strike(ctx, &always_crit, target, view.power([40, 80, 150]));
    Ok(())
}

pub fn ice_beam(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let outcome = hit(ctx, cast, target, view.power([30, 60, 120]), AttackType::Special);
    if !outcome.death {
        inflict(ctx, cast, target, StatusKind::Freeze, view.tuned([1000, 2000, 3000]));
    }
    Ok(())
}

/// Hits the target and whoever stands right behind it.
pub fn dragon_breath(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, at)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let damage = view.power([30, 60, 120]);
    let (dx, dy) = view.position.direction_to(at);
    let behind = at.offset(dx, dy);

    hit(ctx, cast, target, damage, AttackType::Special);
    if ctx.state.board.contains(behind) {
        for enemy in targeting::units_on_cells(ctx.state, &[behind], view.enemy()) {
            hit(ctx, cast, enemy, damage, AttackType::Special);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::state::{Stats, Team};

    fn sturdy() -> Stats {
        Stats::new(10, 0, 0, 500)
    }

    #[test]
    fn oversized_stats_saturate_instead_of_overflowing() {
        let mut h = Harness::new();
        let mut huge = Stats::new(u32::MAX, 0, 0, 500);
        huge.ability_power = i32::MAX;
        let caster = h.spawn(Team::Blue, 0, 0, huge);
        let first = h.spawn(Team::Red, 0, 3, sturdy());
        let second = h.spawn(Team::Red, 4, 4, sturdy());
        h.state.weather = Weather::Rain;

        let cast = Cast { caster, target: Some(first), crit: false };
        thunder(&mut h.ctx(), &cast).unwrap();
        assert_eq!(h.life(first), 0);

        let cast = Cast { caster, target: Some(second), crit: false };
        guillotine(&mut h.ctx(), &cast).unwrap();
        assert_eq!(h.life(second), 0);
    }

    #[test]
    fn thunder_doubles_in_rain() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, sturdy());
        let enemy = h.spawn(Team::Red, 0, 3, sturdy());
        h.state.weather = Weather::Rain;

        let cast = Cast { caster, target: Some(enemy), crit: false };
        thunder(&mut h.ctx(), &cast).unwrap();
        assert_eq!(h.life(enemy), 440);
    }

    #[test]
    fn solar_beam_hits_every_enemy_on_the_line() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, sturdy());
        let near = h.spawn(Team::Red, 0, 2, sturdy());
        let far = h.spawn(Team::Red, 0, 4, sturdy());
        let aside = h.spawn(Team::Red, 3, 3, sturdy());

        let cast = Cast { caster, target: Some(far), crit: false };
        solar_beam(&mut h.ctx(), &cast).unwrap();
        assert_eq!(h.life(near), 460);
        assert_eq!(h.life(far), 460);
        assert_eq!(h.life(aside), 500);
    }

    #[test]
    fn guillotine_kill_refunds_resource() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::new(100, 0, 0, 100).with_max_pp(80));
        let enemy = h.spawn(Team::Red, 0, 1, Stats::new(10, 0, 0, 50));

        let cast = Cast { caster, target: Some(enemy), crit: false };
        guillotine(&mut h.ctx(), &cast).unwrap();
        assert!(!h.state.is_alive(enemy));
        assert!(h.state.unit(caster).unwrap().pp() >= 40);
    }

    #[test]
    fn counter_scales_with_missing_life() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, sturdy());
        let enemy = h.spawn(Team::Red, 0, 1, sturdy());
        h.state.unit_mut(caster).unwrap().set_life(300);

        let cast = Cast { caster, target: Some(enemy), crit: false };
        counter(&mut h.ctx(), &cast).unwrap();
        assert_eq!(h.life(enemy), 440);
    }

    #[test]
    fn dragon_breath_reaches_the_cell_behind() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 2, 0, sturdy());
        let front = h.spawn(Team::Red, 2, 1, sturdy());
        let back = h.spawn(Team::Red, 2, 2, sturdy());

        let cast = Cast { caster, target: Some(front), crit: false };
        dragon_breath(&mut h.ctx(), &cast).unwrap();
        assert_eq!(h.life(front), 470);
        assert_eq!(h.life(back), 470);
    }

    #[test]
    fn strike_without_enemies_is_a_no_op() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, sturdy());
        let cast = Cast { caster, target: None, crit: false };
        assert!(ice_beam(&mut h.ctx(), &cast).is_ok());
        assert!(h.events.is_empty());
    }
}
