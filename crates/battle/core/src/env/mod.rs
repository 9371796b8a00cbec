//! Inputs consumed from outside the simulation: rosters, team modifiers,
//! items, weather and the deterministic RNG service.
mod items;
mod rng;
mod roster;
mod weather;

pub use items::Item;
pub use rng::{BattleRng, RollPurpose};
pub use roster::{
    BattleSetup, RosterError, RosterSnapshot, TeamModifier, UnitSpec, board_position,
};
pub use weather::Weather;
