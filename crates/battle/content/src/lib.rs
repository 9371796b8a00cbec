//! Data-driven battle content and loaders.
//!
//! This crate houses the shipped battle data and the loaders that read it:
//! - Rosters (RON): the ordered unit list one team deploys
//! - Team modifier sets (TOML): named pre-battle bonuses
//! - Battle scenarios (TOML): which rosters, modifiers, weather and seed to use
//! - Battle configuration (TOML): overrides for [`battle_core::BattleConfig`]
//!
//! Content is consumed when a battle is set up and never appears in battle state.
//! All loaders deserialize `battle-core` types directly through serde.

#[cfg(feature = "loaders")]
pub mod loaders;
#[cfg(feature = "loaders")]
pub mod presets;

#[cfg(feature = "loaders")]
pub use loaders::{
    BattleSpec, ConfigLoader, ContentFactory, LoadResult, ModifierLoader, ModifierSets,
    RosterLoader, ScenarioCatalog, ScenarioLoader,
};
