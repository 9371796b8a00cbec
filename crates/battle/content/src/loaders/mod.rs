//! Content loaders for reading battle data from files.
//!
//! Rosters are RON catalogs; modifier sets, scenarios and configuration are
//! TOML tables. Each loader exposes `load(path)` for files and `parse(str)`
//! for embedded data.

pub mod config;
pub mod factory;
pub mod modifiers;
pub mod roster;
pub mod scenario;

pub use config::ConfigLoader;
pub use factory::ContentFactory;
pub use modifiers::{ModifierLoader, ModifierSets};
pub use roster::RosterLoader;
pub use scenario::{BattleSpec, ScenarioCatalog, ScenarioLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
