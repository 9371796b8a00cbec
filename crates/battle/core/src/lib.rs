//! Deterministic real-time combat resolver for an auto-battler.
//!
//! Two squads are deployed from roster snapshots onto a small grid and fight
//! without further input until one side is eliminated. `battle-core` owns the
//! canonical rules: the board and its environment tags, per-unit status
//! timers, the damage pipeline, the moving/attacking state machine, the
//! ability registry and the simulation clock that drives them. Every random
//! draw comes from one seeded [`BattleRng`], so a battle replays exactly from
//! its setup and seed.
//!
//! All mutation flows through [`Simulation`]; supporting crates depend on the
//! types re-exported here.
pub mod ability;
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod events;
pub mod state;
pub mod targeting;

pub use ability::{
    AbilityEffect, AbilityError, AbilityFn, AbilityId, AbilityRegistry, AbilityRegistryBuilder,
    Cast, build_registry,
};
pub use combat::{AttackType, DamageOutcome, DamageRequest, apply_damage};
pub use config::BattleConfig;
#[cfg(feature = "serde")]
pub use engine::{BattleSnapshot, SnapshotError};
pub use engine::{
    BattleContext, BattleResult, DeferredAction, Scheduler, Simulation, SimulationError,
    UnitReport,
};
pub use env::{
    BattleRng, BattleSetup, Item, RollPurpose, RosterError, RosterSnapshot, TeamModifier,
    UnitSpec, Weather,
};
pub use error::{BattleError, ErrorContext, ErrorSeverity};
pub use events::{BattleEvent, BoardEventKind, EventSink, NullSink};
pub use state::{
    BattleState, Board, BoardError, Combatant, Counters, EnvironmentKind, EnvironmentTag,
    Position, StatKind, Stats, StatusEffects, StatusKind, Team, UnitId, UnitState, UnitTags,
};
