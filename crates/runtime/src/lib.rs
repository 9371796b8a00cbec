//! Async runtime for driving battles in real time.
//!
//! This crate wraps a [`battle_core::Simulation`] in a tokio worker that steps
//! it at a fixed tick length, publishes its events on a topic-based bus, and
//! answers queries through a cloneable [`BattleHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator and builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`logging`] installs the tracing subscriber used by binaries
//! - workers keep background tasks internal to the crate
pub mod api;
pub mod config;
pub mod events;
pub mod logging;
pub mod runtime;

mod workers;

pub use api::{BattleHandle, Result, RuntimeError};
pub use config::{Pace, RuntimeConfig};
pub use events::{BattleTick, Event, EventBus, LifecycleEvent, Topic};
pub use runtime::{Runtime, RuntimeBuilder};
