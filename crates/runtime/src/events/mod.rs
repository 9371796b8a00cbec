//! Topic-based event bus for runtime events.
//!
//! The battle worker publishes every combat event on [`Topic::Battle`] and
//! start/finish notifications on [`Topic::Lifecycle`]; consumers subscribe
//! only to the topics they need.

mod bus;
mod types;

pub use bus::{Event, EventBus, Topic};
pub use types::{BattleTick, LifecycleEvent};
