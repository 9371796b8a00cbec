//! Simulation clock and per-tick resolution.
//!
//! [`Simulation`] owns one battle: its [`BattleState`], the seeded
//! [`BattleRng`], the deferred-action [`Scheduler`] and the event buffer. Each
//! [`Simulation::update`] call advances simulated time by `dt` milliseconds
//! and resolves, in order:
//!
//! 1. deferred actions that became due
//! 2. for every live unit of blue then red, in insertion order: environment
//!    tag, status timers, regeneration, state machine
//! 3. the dead-unit sweep and environment tag ageing
//! 4. the end-of-battle check
//!
//! No step suspends and nothing outlives the simulation instance.
mod context;
mod movement;
mod scheduler;
#[cfg(feature = "serde")]
mod snapshot;
mod state_machine;
mod status;

use std::sync::Arc;

use tracing::{debug, info};

use crate::ability::AbilityRegistry;
use crate::config::BattleConfig;
use crate::env::{BattleRng, BattleSetup, RosterError, TeamModifier, board_position};
use crate::error::{BattleError, ErrorSeverity};
use crate::events::{BattleEvent, BoardEventKind, EventSink};
use crate::state::{Board, BattleState, BoardError, Counters, Team, UnitId};

pub use context::BattleContext;
pub use movement::{step_toward, teleport};
pub use scheduler::{DeferredAction, Scheduler};
#[cfg(feature = "serde")]
pub use snapshot::{BattleSnapshot, SnapshotError};
pub use state_machine::update_unit;
pub use status::{apply_environment, tick_regen, tick_statuses};

/// Errors surfaced by the simulation lifecycle.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid battle setup: {0}")]
    Roster(#[from] RosterError),

    #[error("deployment failed: {0}")]
    Board(#[from] BoardError),
}

impl BattleError for SimulationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Roster(err) => err.severity(),
            Self::Board(_) => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Roster(err) => err.error_code(),
            Self::Board(err) => err.error_code(),
        }
    }
}

/// Final per-unit tallies.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitReport {
    pub id: UnitId,
    pub team: Team,
    pub name: String,
    pub alive: bool,
    pub life: u32,
    pub counters: Counters,
}

/// Outcome of a finished battle.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleResult {
    /// `None` for a draw (mutual elimination, time out or stop).
    pub winner: Option<Team>,
    pub elapsed_ms: u64,
    pub survivors: Vec<UnitId>,
    pub units: Vec<UnitReport>,
}

/// One running battle.
pub struct Simulation {
    state: BattleState,
    rng: BattleRng,
    scheduler: Scheduler,
    registry: Arc<AbilityRegistry>,
    config: BattleConfig,
    events: Vec<BattleEvent>,
    sink: Option<Box<dyn EventSink>>,
    finished: bool,
    winner: Option<Team>,
}

impl Simulation {
    /// Validates the setup, deploys both rosters and applies team modifiers.
    ///
    /// A malformed setup is rejected before any unit is placed.
    pub fn initialize(
        setup: &BattleSetup,
        registry: Arc<AbilityRegistry>,
        config: BattleConfig,
    ) -> Result<Self, SimulationError> {
        setup.validate(&config)?;

        let board = Board::new(config.board_width, config.board_height);
        let mut state = BattleState::new(board, setup.weather);
        for team in Team::ALL {
            for spec in &setup.roster(team).units {
                let position = board_position(team, spec.position, &config);
                state.spawn_unit(team, position, spec)?;
            }
            for id in state.live_ids(team) {
                apply_modifiers(&mut state, id, setup.modifiers(team));
            }
        }

        info!(
            blue = state.live_count(Team::Blue),
            red = state.live_count(Team::Red),
            seed = setup.seed,
            weather = %setup.weather,
            "battle initialized"
        );

        let mut simulation = Self {
            state,
            rng: BattleRng::new(setup.seed),
            scheduler: Scheduler::new(),
            registry,
            config,
            events: Vec::new(),
            sink: None,
            finished: false,
            winner: None,
        };
        simulation.check_finished();
        Ok(simulation)
    }

    /// Forwards events to `sink` after every update instead of buffering them.
    #[must_use]
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Advances the battle by `dt` simulated milliseconds.
    pub fn update(&mut self, dt: u32) {
        if self.finished {
            return;
        }
        self.state.tick = self.state.tick.next();
        self.state.elapsed_ms += dt as u64;

        let mut ctx = BattleContext::new(
            &mut self.state,
            &mut self.rng,
            &mut self.scheduler,
            &mut self.events,
            &self.registry,
            &self.config,
        );

        let now = ctx.now();
        for action in ctx.scheduler.take_due(now) {
            scheduler::resolve(&mut ctx, action);
        }

        for team in Team::ALL {
            for id in ctx.state.live_ids(team) {
                if !ctx.state.is_alive(id) {
                    continue;
                }
                status::apply_environment(&mut ctx, id, dt);
                status::tick_statuses(&mut ctx, id, dt);
                status::tick_regen(&mut ctx, id, dt);
                state_machine::update_unit(&mut ctx, id, dt);
            }
        }

        for id in ctx.state.sweep_dead() {
            debug!(unit = %id, "swept unresolved faint");
            let position = ctx.state.unit(id).map(|unit| unit.position).unwrap_or_default();
            ctx.emit(BattleEvent::UnitDied {
                unit: id,
                killer: None,
                position,
            });
        }
        for position in ctx.state.board.tick_environment(dt) {
            ctx.emit(BattleEvent::StatusBoard {
                unit: None,
                kind: BoardEventKind::EnvironmentExpired,
                position,
                magnitude: 0,
            });
        }

        self.check_finished();
        self.flush();
    }

    /// Ends the battle now: pending deferred actions are dropped and every
    /// per-unit timer is cleared.
    pub fn stop(&mut self) {
        self.scheduler.clear();
        let ids: Vec<UnitId> = self.state.units().map(|unit| unit.id).collect();
        for id in ids {
            if let Some(unit) = self.state.unit_mut(id) {
                unit.statuses.clear_all();
                unit.cooldown = 0;
                unit.regen_elapsed = 0;
                unit.environment_elapsed = 0;
            }
        }
        if !self.finished {
            info!(elapsed_ms = self.state.elapsed_ms, "battle stopped");
        }
        self.finished = true;
        self.flush();
    }

    pub fn finished(&self) -> bool {
        self.finished
    }

    pub fn state(&self) -> &BattleState {
        &self.state
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<AbilityRegistry> {
        &self.registry
    }

    pub fn rng(&self) -> &BattleRng {
        &self.rng
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.state.elapsed_ms
    }

    /// Takes the events buffered since the last drain.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    /// Battle outcome once finished.
    pub fn result(&self) -> Option<BattleResult> {
        if !self.finished {
            return None;
        }
        let units: Vec<UnitReport> = self
            .state
            .units()
            .map(|unit| UnitReport {
                id: unit.id,
                team: unit.team,
                name: unit.name.clone(),
                alive: unit.is_alive(),
                life: unit.life(),
                counters: unit.counters,
            })
            .collect();
        let survivors = units
            .iter()
            .filter(|report| report.alive)
            .map(|report| report.id)
            .collect();
        Some(BattleResult {
            winner: self.winner,
            elapsed_ms: self.state.elapsed_ms,
            survivors,
            units,
        })
    }

    /// Updates with a fixed step until the battle finishes.
    pub fn run_to_end(&mut self, dt: u32) -> Option<BattleResult> {
        let dt = dt.max(1);
        while !self.finished {
            self.update(dt);
        }
        self.result()
    }

    /// Mutable context for driving resolution steps directly.
    pub fn context(&mut self) -> BattleContext<'_> {
        BattleContext::new(
            &mut self.state,
            &mut self.rng,
            &mut self.scheduler,
            &mut self.events,
            &self.registry,
            &self.config,
        )
    }

    fn check_finished(&mut self) {
        if self.finished {
            return;
        }
        let blue = self.state.live_count(Team::Blue);
        let red = self.state.live_count(Team::Red);
        let timed_out = self.state.elapsed_ms >= self.config.max_duration_ms;
        if blue > 0 && red > 0 && !timed_out {
            return;
        }

        self.winner = match (blue, red) {
            (0, 0) => None,
            (0, _) => Some(Team::Red),
            (_, 0) => Some(Team::Blue),
            _ => None,
        };
        self.finished = true;
        self.events.push(BattleEvent::BattleEnded {
            winner: self.winner,
            elapsed_ms: self.state.elapsed_ms,
        });
        info!(
            winner = ?self.winner,
            elapsed_ms = self.state.elapsed_ms,
            blue,
            red,
            "battle finished"
        );
    }

    fn flush(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            for event in self.events.drain(..) {
                sink.emit(event);
            }
        }
    }
}

/// Applies a team's pre-battle modifiers to one unit, then refills its life.
fn apply_modifiers(state: &mut BattleState, id: UnitId, modifiers: &[TeamModifier]) {
    let Some(unit) = state.unit_mut(id) else {
        return;
    };
    for modifier in modifiers {
        match modifier {
            TeamModifier::FlatStat { stat, amount } => unit.live.add_flat(*stat, *amount),
            TeamModifier::PercentStat { stat, percent } => unit.live.add_percent(*stat, *percent),
            TeamModifier::Shield { amount } => unit.shield = unit.shield.saturating_add(*amount),
            TeamModifier::StartingPp { amount } => unit.gain_pp(*amount),
            TeamModifier::GrantTag { tag } => unit.tags |= *tag,
            TeamModifier::DamageAmp { percent } => {
                unit.modifiers.outgoing_pct = unit.modifiers.outgoing_pct.saturating_add(*percent)
            }
            TeamModifier::DamageReduction { percent } => {
                unit.modifiers.incoming_pct = unit.modifiers.incoming_pct.saturating_sub(*percent)
            }
        }
    }
    unit.live.dodge = unit.live.dodge.min(BattleConfig::MAX_DODGE_PCT);
    unit.live.hp = unit.live.hp.max(1);
    let max = unit.max_life();
    unit.set_life(max);
}
