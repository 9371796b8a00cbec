//! Crowd control.

use crate::combat::AttackType;
use crate::engine::BattleContext;
use crate::state::StatusKind;
use crate::targeting;

use super::{CasterView, hit, inflict, primary_target};
use crate::ability::{AbilityError, Cast};

/// Applies `kind` to the `count` front-most enemies.
fn front_row(
    ctx: &mut BattleContext<'_>,
    cast: &Cast,
    count: usize,
    kind: StatusKind,
    duration_ms: u32,
) {
    let enemies = targeting::rank_ordered_enemies(ctx.state, cast.caster);
    for enemy in enemies.into_iter().take(count) {
        inflict(ctx, cast, enemy, kind, duration_ms);
    }
}

pub fn hypnosis(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    front_row(
        ctx,
        cast,
        view.tuned([1, 2, 3]),
        StatusKind::Sleep,
        view.tuned([1500, 2500, 3500]),
    );
    Ok(())
}

/// Charmed enemies walk toward the caster instead of fighting.
pub fn attract(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    front_row(
        ctx,
        cast,
        view.tuned([1, 2, 3]),
        StatusKind::Charm,
        view.tuned([1000, 2000, 3000]),
    );
    Ok(())
}

pub fn confuse_ray(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    front_row(ctx, cast, view.tuned([1, 2, 3]), StatusKind::Confusion, 2000);
    Ok(())
}

/// Poisons the target and every enemy touching it.
pub fn toxic(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, at)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let duration = view.tuned([3000, 5000, 8000]);
    let mut victims = vec![target];
    victims.extend(targeting::adjacent_units(ctx.state, at, view.enemy()));
    for enemy in victims {
        inflict(ctx, cast, enemy, StatusKind::Poison, duration);
    }
    Ok(())
}

pub fn will_o_wisp(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    inflict(ctx, cast, target, StatusKind::Burn, view.tuned([3000, 4000, 5000]));
    hit(ctx, cast, target, view.power([10, 20, 40]), AttackType::Special);
    Ok(())
}

/// Silences the target and drains its resource.
pub fn disable(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    inflict(ctx, cast, target, StatusKind::Silence, view.tuned([2000, 4000, 6000]));
    if let Some(unit) = ctx.state.live_unit_mut(target) {
        unit.set_pp(0);
    }
    Ok(())
}

pub fn screech(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let duration = view.tuned([3000, 4000, 6000]);
    for enemy in targeting::units_in_radius(ctx.state, view.position, 2, view.enemy()) {
        inflict(ctx, cast, enemy, StatusKind::ArmorReduction, duration);
    }
    Ok(())
}

pub fn thunder_wave(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let outcome = hit(ctx, cast, target, view.power([20, 40, 80]), AttackType::Special);
    if !outcome.death {
        inflict(ctx, cast, target, StatusKind::Paralysis, view.tuned([2000, 3000, 4000]));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::state::{Stats, Team, UnitTags};

    #[test]
    fn hypnosis_targets_the_front_row_first() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::default());
        let back = h.spawn(Team::Red, 1, 5, Stats::default());
        let front = h.spawn(Team::Red, 6, 3, Stats::default());

        let cast = Cast { caster, target: Some(back), crit: false };
        hypnosis(&mut h.ctx(), &cast).unwrap();
        assert!(h.state.unit(front).unwrap().has_status(StatusKind::Sleep));
        assert!(!h.state.unit(back).unwrap().has_status(StatusKind::Sleep));
    }

    #[test]
    fn attract_remembers_the_charmer() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Red, 0, 5, Stats::default());
        let enemy = h.spawn(Team::Blue, 0, 1, Stats::default());

        let cast = Cast { caster, target: Some(enemy), crit: false };
        attract(&mut h.ctx(), &cast).unwrap();
        let charmed = h.state.unit(enemy).unwrap();
        assert_eq!(charmed.statuses.origin(StatusKind::Charm), Some(caster));
    }

    #[test]
    fn toxic_spreads_to_neighbours_only() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::default());
        let target = h.spawn(Team::Red, 4, 4, Stats::default());
        let neighbour = h.spawn(Team::Red, 4, 5, Stats::default());
        let loner = h.spawn(Team::Red, 7, 0, Stats::default());

        let cast = Cast { caster, target: Some(target), crit: false };
        toxic(&mut h.ctx(), &cast).unwrap();
        let poisoned = |h: &Harness, id| h.state.unit(id).unwrap().has_status(StatusKind::Poison);
        assert!(poisoned(&h, target));
        assert!(poisoned(&h, neighbour));
        assert!(!poisoned(&h, loner));
    }

    #[test]
    fn disable_drains_resource() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::default());
        let enemy = h.spawn(Team::Red, 0, 1, Stats::default());
        h.state.unit_mut(enemy).unwrap().set_pp(70);

        let cast = Cast { caster, target: Some(enemy), crit: false };
        disable(&mut h.ctx(), &cast).unwrap();
        let unit = h.state.unit(enemy).unwrap();
        assert_eq!(unit.pp(), 0);
        assert!(unit.has_status(StatusKind::Silence));
    }

    #[test]
    fn synchronize_spreads_control_to_teammates() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::default());
        let front = h.spawn(Team::Red, 0, 2, Stats::default());
        let mate = h.spawn(Team::Red, 7, 5, Stats::default());
        h.state.unit_mut(front).unwrap().tags |= UnitTags::SYNCHRONIZE;

        let cast = Cast { caster, target: Some(front), crit: false };
        confuse_ray(&mut h.ctx(), &cast).unwrap();
        assert!(h.state.unit(mate).unwrap().has_status(StatusKind::Confusion));
    }
}
