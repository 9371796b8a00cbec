//! Team modifier set loader.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::{BattleConfig, TeamModifier};

use crate::loaders::{LoadResult, read_file};

/// Named modifier sets, e.g. one per synergy tier.
pub type ModifierSets = BTreeMap<String, Vec<TeamModifier>>;

/// Loader for team modifier sets from TOML files.
///
/// Every top-level array of tables is one set:
///
/// ```toml
/// [[guardians]]
/// kind = "shield"
/// amount = 20
/// ```
pub struct ModifierLoader;

impl ModifierLoader {
    pub fn load(path: &Path) -> LoadResult<ModifierSets> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ModifierSets> {
        let sets: ModifierSets = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse modifier TOML: {}", e))?;
        if let Some((name, set)) = sets
            .iter()
            .find(|(_, set)| set.len() > BattleConfig::MAX_TEAM_MODIFIERS)
        {
            anyhow::bail!(
                "Modifier set '{}' has {} entries (max {})",
                name,
                set.len(),
                BattleConfig::MAX_TEAM_MODIFIERS
            );
        }
        Ok(sets)
    }
}
