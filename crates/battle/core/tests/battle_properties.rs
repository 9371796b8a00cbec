use std::sync::Arc;

use battle_core::combat;
use battle_core::engine::{tick_statuses, update_unit};
use battle_core::{
    AbilityId, AttackType, BattleConfig, BattleEvent, BattleSetup, DamageRequest, Position,
    RosterError, RosterSnapshot, Simulation, SimulationError, Stats, StatusKind, Team,
    TeamModifier, UnitId, UnitSpec, UnitState, build_registry,
};

fn roster(units: Vec<UnitSpec>) -> RosterSnapshot {
    RosterSnapshot::new(units)
}

fn duel(blue: UnitSpec, red: UnitSpec) -> Simulation {
    let setup = BattleSetup::new(roster(vec![blue]), roster(vec![red])).with_seed(11);
    Simulation::initialize(&setup, Arc::new(build_registry()), BattleConfig::default())
        .expect("valid setup")
}

fn first(sim: &Simulation, team: Team) -> UnitId {
    sim.state().live_ids(team)[0]
}

fn skirmish(seed: u64) -> BattleSetup {
    let blue = vec![
        UnitSpec::new("striker", Position::new(1, 0), Stats::new(18, 4, 3, 320).with_max_pp(40))
            .with_ability(AbilityId::Thunder),
        UnitSpec::new("guard", Position::new(3, 1), Stats::new(12, 8, 8, 420).with_max_pp(60))
            .with_ability(AbilityId::Protect),
        UnitSpec::new(
            "mimic",
            Position::new(5, 0),
            Stats::new(14, 3, 3, 280).with_max_pp(30).with_range(3),
        )
        .with_ability(AbilityId::Mimic),
        UnitSpec::new("healer", Position::new(6, 2), Stats::new(9, 3, 5, 260).with_max_pp(50))
            .with_ability(AbilityId::Wish)
            .with_stars(2),
    ];
    let red = vec![
        UnitSpec::new("quaker", Position::new(2, 0), Stats::new(16, 5, 4, 340).with_max_pp(50))
            .with_ability(AbilityId::Earthquake),
        UnitSpec::new(
            "sniper",
            Position::new(4, 2),
            Stats::new(20, 2, 2, 240).with_max_pp(40).with_range(4),
        )
        .with_ability(AbilityId::FutureSight),
        UnitSpec::new("gasser", Position::new(6, 1), Stats::new(13, 4, 4, 300).with_max_pp(40))
            .with_ability(AbilityId::Smog),
        UnitSpec::new(
            "dice",
            Position::new(0, 1),
            Stats::new(15, 3, 3, 300).with_max_pp(30).with_dodge(20),
        )
        .with_ability(AbilityId::Metronome),
    ];
    BattleSetup::new(roster(blue), roster(red))
        .with_modifiers(Team::Blue, vec![TeamModifier::Shield { amount: 20 }])
        .with_seed(seed)
}

#[test]
fn life_and_shield_stay_in_bounds_every_tick() {
    let mut sim = Simulation::initialize(
        &skirmish(3),
        Arc::new(build_registry()),
        BattleConfig::default(),
    )
    .expect("valid setup");

    while !sim.finished() {
        sim.update(50);
        for unit in sim.state().units().filter(|unit| unit.is_alive()) {
            assert!(unit.life() <= unit.max_life(), "{} over max life", unit.name);
            assert!(unit.life() > 0, "{} alive at zero life", unit.name);
            assert!(unit.pp() <= unit.max_pp());
        }
        assert!(sim.state().is_consistent());
    }
    let result = sim.result().expect("finished battle has a result");
    assert!(result.elapsed_ms <= sim.config().max_duration_ms + 50);
}

#[test]
fn true_damage_ignores_defense() {
    let mut sim = duel(
        UnitSpec::new("a", Position::new(0, 0), Stats::new(10, 50, 50, 100)),
        UnitSpec::new("b", Position::new(0, 0), Stats::default()),
    );
    let target = first(&sim, Team::Blue);
    let outcome = combat::apply_damage(
        &mut sim.context(),
        DamageRequest::new(target, 30, AttackType::True),
    );
    assert_eq!(outcome.taken, 30);
    assert_eq!(sim.state().unit(target).unwrap().life(), 70);
}

#[test]
fn physical_damage_against_ten_defense_is_halved() {
    let mut sim = duel(
        UnitSpec::new("a", Position::new(0, 0), Stats::new(10, 10, 0, 200)),
        UnitSpec::new("b", Position::new(0, 0), Stats::default()),
    );
    let target = first(&sim, Team::Blue);
    let outcome = combat::apply_damage(
        &mut sim.context(),
        DamageRequest::new(target, 100, AttackType::Physical),
    );
    assert_eq!(outcome.taken, 50);
}

#[test]
fn lethal_true_damage_ends_the_battle() {
    let mut sim = duel(
        UnitSpec::new("a", Position::new(0, 0), Stats::default()),
        UnitSpec::new("b", Position::new(0, 0), Stats::default()),
    );
    let victim = first(&sim, Team::Red);
    let cell = sim.state().unit(victim).unwrap().position;
    {
        let mut ctx = sim.context();
        ctx.state.unit_mut(victim).unwrap().set_life(10);
        let outcome = combat::apply_damage(&mut ctx, DamageRequest::new(victim, 30, AttackType::True));
        assert_eq!(outcome.taken, 10);
        assert!(outcome.death);
    }
    let unit = sim.state().unit(victim).unwrap();
    assert_eq!(unit.life(), 0);
    assert!(!unit.is_alive());
    assert_eq!(sim.state().board.get(cell), None);

    sim.update(16);
    assert!(sim.finished());
    assert_eq!(sim.result().unwrap().winner, Some(Team::Blue));
}

#[test]
fn active_status_is_not_refreshed() {
    let mut sim = duel(
        UnitSpec::new("a", Position::new(0, 0), Stats::default()),
        UnitSpec::new("b", Position::new(0, 0), Stats::default()),
    );
    let target = first(&sim, Team::Red);
    let mut ctx = sim.context();
    assert!(combat::apply_status(&mut ctx, target, StatusKind::Burn, 3000, None));
    let remaining = ctx.state.unit(target).unwrap().statuses.remaining(StatusKind::Burn);
    assert!(!combat::apply_status(&mut ctx, target, StatusKind::Burn, 9000, None));
    assert_eq!(
        ctx.state.unit(target).unwrap().statuses.remaining(StatusKind::Burn),
        remaining
    );
}

#[test]
fn burn_damage_does_not_depend_on_tick_length() {
    let burned_life = |slices: u32| {
        let mut sim = duel(
            UnitSpec::new("a", Position::new(0, 0), Stats::new(10, 0, 0, 1000)),
            UnitSpec::new("b", Position::new(0, 0), Stats::default()),
        );
        let target = first(&sim, Team::Blue);
        let mut ctx = sim.context();
        assert!(combat::apply_status(&mut ctx, target, StatusKind::Burn, 5000, None));
        for _ in 0..slices {
            tick_statuses(&mut ctx, target, 5000 / slices);
        }
        assert!(!ctx.state.unit(target).unwrap().has_status(StatusKind::Burn));
        ctx.state.unit(target).unwrap().life()
    };

    let sliced = burned_life(100);
    assert!(sliced < 1000);
    assert_eq!(burned_life(1), sliced);
}

#[test]
fn lone_unit_idles_without_failing() {
    let mut sim = duel(
        UnitSpec::new("a", Position::new(0, 0), Stats::default()),
        UnitSpec::new("b", Position::new(0, 0), Stats::default()),
    );
    let blue = first(&sim, Team::Blue);
    let red = first(&sim, Team::Red);
    let mut ctx = sim.context();
    combat::apply_damage(&mut ctx, DamageRequest::new(red, 1000, AttackType::True));
    update_unit(&mut ctx, blue, 100);
    update_unit(&mut ctx, blue, 100);

    let unit = ctx.state.unit(blue).unwrap();
    assert_eq!(unit.state, UnitState::Moving);
    assert_eq!(unit.target, None);
    assert_eq!(unit.cooldown, 0);
}

#[test]
fn mimic_against_non_copyable_still_spends_the_cast() {
    let stats = Stats::new(10, 0, 0, 200).with_max_pp(20).with_range(8);
    let mut sim = duel(
        UnitSpec::new("mimic", Position::new(0, 0), stats).with_ability(AbilityId::Mimic),
        UnitSpec::new("other", Position::new(0, 0), stats).with_ability(AbilityId::Metronome),
    );
    let mimic = first(&sim, Team::Blue);
    let other = first(&sim, Team::Red);

    let mut ctx = sim.context();
    ctx.state.unit_mut(mimic).unwrap().set_pp(20);
    let delay = ctx.state.unit(mimic).unwrap().live.attack_delay_ms();
    update_unit(&mut ctx, mimic, 16);

    let caster = ctx.state.unit(mimic).unwrap();
    assert_eq!(caster.pp(), 0);
    assert_eq!(caster.cooldown, delay);
    assert_eq!(caster.counters.casts, 1);
    assert_eq!(ctx.state.unit(other).unwrap().life(), 200);
    assert!(ctx.events.iter().any(|e| matches!(e, BattleEvent::AbilityCast { .. })));
    assert!(!ctx.events.iter().any(|e| matches!(e, BattleEvent::DamageApplied { .. })));
}

#[test]
fn malformed_roster_is_rejected_up_front() {
    let blue = roster(vec![
        UnitSpec::new("a", Position::new(1, 1), Stats::default()),
        UnitSpec::new("b", Position::new(1, 1), Stats::default()),
    ]);
    let red = roster(vec![UnitSpec::new("c", Position::new(0, 0), Stats::default())]);
    let setup = BattleSetup::new(blue, red);

    let err = Simulation::initialize(&setup, Arc::new(build_registry()), BattleConfig::default())
        .err()
        .expect("duplicate position must be rejected");
    assert!(matches!(
        err,
        SimulationError::Roster(RosterError::DuplicatePosition { team: Team::Blue, .. })
    ));
}

#[test]
fn same_seed_same_battle() {
    let run = |seed| {
        let mut sim = Simulation::initialize(
            &skirmish(seed),
            Arc::new(build_registry()),
            BattleConfig::default(),
        )
        .expect("valid setup");
        let result = sim.run_to_end(50);
        (result, sim.drain_events())
    };
    assert_eq!(run(21), run(21));
}

#[test]
fn stop_drops_pending_effects() {
    let mut sim = Simulation::initialize(
        &skirmish(5),
        Arc::new(build_registry()),
        BattleConfig::default(),
    )
    .expect("valid setup");
    for _ in 0..40 {
        sim.update(50);
    }
    sim.stop();
    assert!(sim.finished());
    assert!(sim.scheduler().is_empty());
    assert!(sim.state().units().all(|unit| unit.statuses.is_empty()));

    let elapsed = sim.elapsed_ms();
    sim.update(50);
    assert_eq!(sim.elapsed_ms(), elapsed);
}
