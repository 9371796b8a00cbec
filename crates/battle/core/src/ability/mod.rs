//! Ability identifiers, the handler registry and cast dispatch.
//!
//! A unit whose resource meter is full casts instead of attacking.
//! [`cast`] empties the meter, reports the cast and looks the handler up in
//! the immutable [`AbilityRegistry`]. Handlers are plain functions over the
//! tick's [`BattleContext`](crate::engine::BattleContext); their faults are
//! logged and never abort the tick.
mod dispatch;
mod handlers;
mod id;
mod registry;

pub use dispatch::{AbilityError, Cast, cast, invoke};
pub use handlers::by_stars;
pub use id::AbilityId;
pub use registry::{AbilityEffect, AbilityFn, AbilityRegistry, AbilityRegistryBuilder, build_registry};
