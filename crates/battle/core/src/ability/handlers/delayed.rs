//! Abilities that land after a delay through the scheduler.

use crate::combat::AttackType;
use crate::engine::{BattleContext, DeferredAction};
use crate::state::StatusKind;

use super::{CasterView, ensure_on_board, inflict, primary_target};
use crate::ability::{AbilityError, AbilityId, Cast};

const PREMONITION_DELAY_MS: u32 = 2000;
const FIRE_SPIN_PULSES: u32 = 3;
const FIRE_SPIN_INTERVAL_MS: u32 = 1000;

pub fn future_sight(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    ctx.schedule(
        PREMONITION_DELAY_MS,
        DeferredAction::Damage {
            source: view.id,
            target,
            amount: view.power([50, 100, 200]),
            attack_type: AttackType::Special,
        },
    );
    Ok(())
}

/// Marks the target's cell; whoever stands around it when the delay ends is hit.
pub fn doom_desire(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((_, center)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    ensure_on_board(ctx, AbilityId::DoomDesire, center)?;
    ctx.schedule(
        PREMONITION_DELAY_MS,
        DeferredAction::AreaDamage {
            source: view.id,
            center,
            radius: 1,
            amount: view.power([40, 80, 160]),
            attack_type: AttackType::Special,
        },
    );
    Ok(())
}

pub fn fire_spin(ctx: &mut BattleContext<'_>, cast: &Cast) -> Result<(), AbilityError> {
    let view = CasterView::capture(ctx, cast)?;
    let Some((target, _)) = primary_target(ctx, cast, &view) else {
        return Ok(());
    };
    let burn = FIRE_SPIN_PULSES * FIRE_SPIN_INTERVAL_MS;
    inflict(ctx, cast, target, StatusKind::Burn, burn);

    let amount = view.power([10, 20, 40]);
    for pulse in 1..=FIRE_SPIN_PULSES {
        ctx.schedule(
            pulse * FIRE_SPIN_INTERVAL_MS,
            DeferredAction::Damage {
                source: view.id,
                target,
                amount,
                attack_type: AttackType::Special,
            },
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::testing::Harness;
    use super::*;
    use crate::state::{Stats, Team};

    #[test]
    fn future_sight_lands_later() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::default());
        let enemy = h.spawn(Team::Red, 0, 4, Stats::default());

        let cast = Cast { caster, target: Some(enemy), crit: false };
        future_sight(&mut h.ctx(), &cast).unwrap();
        assert_eq!(h.life(enemy), 100);
        assert!(h.scheduler.take_due(1999).is_empty());
        assert_eq!(
            h.scheduler.take_due(2000),
            vec![DeferredAction::Damage {
                source: caster,
                target: enemy,
                amount: 50,
                attack_type: AttackType::Special,
            }]
        );
    }

    #[test]
    fn fire_spin_queues_three_pulses() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::default());
        let enemy = h.spawn(Team::Red, 0, 1, Stats::default());

        let cast = Cast { caster, target: Some(enemy), crit: false };
        fire_spin(&mut h.ctx(), &cast).unwrap();
        assert_eq!(h.scheduler.len(), 3);
        assert!(h.state.unit(enemy).unwrap().has_status(StatusKind::Burn));
        assert_eq!(h.scheduler.take_due(3000).len(), 3);
    }

    #[test]
    fn doom_desire_without_enemies_schedules_nothing() {
        let mut h = Harness::new();
        let caster = h.spawn(Team::Blue, 0, 0, Stats::default());

        let cast = Cast { caster, target: None, crit: false };
        doom_desire(&mut h.ctx(), &cast).unwrap();
        assert!(h.scheduler.is_empty());
    }
}
