//! Representative ability handlers and the helpers they share.
//!
//! Every handler captures what it needs from the caster up front, re-checks
//! liveness before each sub-effect and treats a fainted target as "no
//! target". Coordinates are always `(x, y)`; off-board cells computed by a
//! handler abort that handler through [`AbilityError::OutOfBounds`].
mod area;
mod control;
mod delayed;
mod mobility;
mod reflect;
mod strike;
mod support;
mod terrain;

use crate::combat::{self, AttackType, DamageOutcome, DamageRequest};
use crate::engine::BattleContext;
use crate::state::{Position, StatusKind, Team, UnitId};
use crate::targeting;

use super::registry::AbilityRegistryBuilder;
use super::{AbilityError, AbilityId, Cast};

/// Picks the tuning value for a star level (1..=3).
pub fn by_stars<T: Copy>(stars: u8, values: [T; 3]) -> T {
    values[(stars.clamp(1, 3) - 1) as usize]
}

/// Caster values captured at the start of a handler.
#[derive(Clone, Copy, Debug)]
pub(crate) struct CasterView {
    pub id: UnitId,
    pub team: Team,
    pub position: Position,
    pub stars: u8,
    pub atk: u32,
    pub ability_power: i32,
    pub max_life: u32,
    pub life: u32,
}

impl CasterView {
    pub fn capture(ctx: &BattleContext<'_>, cast: &Cast) -> Result<Self, AbilityError> {
        let unit = ctx
            .state
            .live_unit(cast.caster)
            .ok_or(AbilityError::CasterMissing {
                caster: cast.caster,
            })?;
        Ok(Self {
            id: unit.id,
            team: unit.team,
            position: unit.position,
            stars: unit.stars,
            atk: unit.live.atk,
            ability_power: unit.live.ability_power,
            max_life: unit.max_life(),
            life: unit.life(),
        })
    }

    pub fn enemy(&self) -> Team {
        self.team.opponent()
    }

    /// Star tuning without scaling.
    pub fn tuned<T: Copy>(&self, values: [T; 3]) -> T {
        by_stars(self.stars, values)
    }

    /// Star tuning scaled by ability power.
    pub fn power(&self, values: [u32; 3]) -> u32 {
        let ratio = (100 + i64::from(self.ability_power)).max(0) as u64;
        let scaled = u64::from(self.tuned(values)).saturating_mul(ratio).saturating_add(50) / 100;
        u32::try_from(scaled).unwrap_or(u32::MAX)
    }
}

/// The cast's target if it is still a live enemy, else the nearest enemy.
pub(crate) fn primary_target(
    ctx: &mut BattleContext<'_>,
    cast: &Cast,
    view: &CasterView,
) -> Option<(UnitId, Position)> {
    let engaged = cast
        .target
        .and_then(|id| ctx.state.live_unit(id))
        .filter(|unit| unit.team != view.team)
        .map(|unit| (unit.id, unit.position));
    engaged.or_else(|| {
        let id = targeting::nearest_enemy_from(ctx.state, ctx.rng, view.team, view.position)?;
        ctx.state.live_unit(id).map(|unit| (id, unit.position))
    })
}

/// Ability damage from the caster, carrying the cast's crit.
pub(crate) fn hit(
    ctx: &mut BattleContext<'_>,
    cast: &Cast,
    target: UnitId,
    amount: u32,
    attack_type: AttackType,
) -> DamageOutcome {
    combat::apply_damage(
        ctx,
        DamageRequest::new(target, amount, attack_type)
            .from(cast.caster)
            .crit(cast.crit),
    )
}

/// Dodgeable variant of [`hit`] for physical strikes.
pub(crate) fn strike(
    ctx: &mut BattleContext<'_>,
    cast: &Cast,
    target: UnitId,
    amount: u32,
) -> DamageOutcome {
    combat::apply_damage(
        ctx,
        DamageRequest::new(target, amount, AttackType::Physical)
            .from(cast.caster)
            .crit(cast.crit)
            .dodgeable(),
    )
}

pub(crate) fn inflict(
    ctx: &mut BattleContext<'_>,
    cast: &Cast,
    target: UnitId,
    kind: StatusKind,
    duration_ms: u32,
) -> bool {
    combat::apply_status(ctx, target, kind, duration_ms, Some(cast.caster))
}

/// Rejects cells outside the board.
pub(crate) fn ensure_on_board(
    ctx: &BattleContext<'_>,
    ability: AbilityId,
    position: Position,
) -> Result<(), AbilityError> {
    if ctx.state.board.contains(position) {
        Ok(())
    } else {
        Err(AbilityError::OutOfBounds {
            ability,
            position,
            context: ctx.error_context().with_position(position),
        })
    }
}

fn default(_ctx: &mut BattleContext<'_>, _cast: &Cast) -> Result<(), AbilityError> {
    Ok(())
}

/// Registers every shipped handler. Reflection handlers are non-copyable.
pub(crate) fn register_all(builder: AbilityRegistryBuilder) -> AbilityRegistryBuilder {
    use AbilityId::*;

    builder
        .register(Default, false, default)
        // strike
        .register(Thunder, true, strike::thunder)
        .register(SolarBeam, true, strike::solar_beam)
        .register(Guillotine, true, strike::guillotine)
        .register(GigaDrain, true, strike::giga_drain)
        .register(Counter, true, strike::counter)
        .register(LockOn, true, strike::lock_on)
        .register(NightSlash, true, strike::night_slash)
        .register(IceBeam, true, strike::ice_beam)
        .register(DragonBreath, true, strike::dragon_breath)
        // area
        .register(Earthquake, true, area::earthquake)
        .register(Blizzard, true, area::blizzard)
        .register(Discharge, true, area::discharge)
        .register(SelfDestruct, true, area::self_destruct)
        .register(HeatWave, true, area::heat_wave)
        // control
        .register(Hypnosis, true, control::hypnosis)
        .register(Attract, true, control::attract)
        .register(ConfuseRay, true, control::confuse_ray)
        .register(Toxic, true, control::toxic)
        .register(WillOWisp, true, control::will_o_wisp)
        .register(Disable, true, control::disable)
        .register(Screech, true, control::screech)
        .register(ThunderWave, true, control::thunder_wave)
        // support
        .register(Wish, true, support::wish)
        .register(Recover, true, support::recover)
        .register(Protect, true, support::protect)
        .register(Aromatherapy, true, support::aromatherapy)
        .register(Safeguard, true, support::safeguard)
        .register(IronDefense, true, support::iron_defense)
        .register(SwordsDance, true, support::swords_dance)
        .register(Agility, true, support::agility)
        .register(HelpingHand, true, support::helping_hand)
        // mobility
        .register(Teleport, true, mobility::teleport)
        .register(FlyAway, true, mobility::fly_away)
        .register(ShadowSneak, true, mobility::shadow_sneak)
        .register(Dig, true, mobility::dig)
        .register(Switcheroo, true, mobility::switcheroo)
        // delayed
        .register(FutureSight, true, delayed::future_sight)
        .register(DoomDesire, true, delayed::doom_desire)
        .register(FireSpin, true, delayed::fire_spin)
        // terrain
        .register(Smog, true, terrain::smog)
        .register(StickyWeb, true, terrain::sticky_web)
        .register(GrassyTerrain, true, terrain::grassy_terrain)
        .register(Inferno, true, terrain::inferno)
        .register(Smokescreen, true, terrain::smokescreen)
        // reflection
        .register(Mimic, false, reflect::mimic)
        .register(Metronome, false, reflect::metronome)
        .register(Transform, false, reflect::transform)
}

#[cfg(test)]
pub(crate) mod testing {
    //! Small battle harness shared by handler tests.
    use std::sync::Arc;

    use crate::ability::{AbilityRegistry, build_registry};
    use crate::config::BattleConfig;
    use crate::engine::{BattleContext, Scheduler};
    use crate::env::{BattleRng, UnitSpec, Weather};
    use crate::events::BattleEvent;
    use crate::state::{BattleState, Board, Position, Stats, Team, UnitId};

    pub struct Harness {
        pub state: BattleState,
        pub rng: BattleRng,
        pub scheduler: Scheduler,
        pub events: Vec<BattleEvent>,
        pub registry: Arc<AbilityRegistry>,
        pub config: BattleConfig,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                state: BattleState::new(Board::new(8, 6), Weather::Neutral),
                rng: BattleRng::new(7),
                scheduler: Scheduler::new(),
                events: Vec::new(),
                registry: Arc::new(build_registry()),
                config: BattleConfig::default(),
            }
        }

        pub fn spawn(&mut self, team: Team, x: i32, y: i32, stats: Stats) -> UnitId {
            let spec = UnitSpec::new("unit", Position::ORIGIN, stats);
            self.state
                .spawn_unit(team, Position::new(x, y), &spec)
                .unwrap()
        }

        pub fn ctx(&mut self) -> BattleContext<'_> {
            BattleContext::new(
                &mut self.state,
                &mut self.rng,
                &mut self.scheduler,
                &mut self.events,
                &self.registry,
                &self.config,
            )
        }

        pub fn life(&self, id: UnitId) -> u32 {
            self.state.unit(id).map_or(0, |unit| unit.life())
        }
    }
}
