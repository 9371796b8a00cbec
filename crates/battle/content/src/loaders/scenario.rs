//! Battle scenario loader.

use std::collections::BTreeMap;
use std::path::Path;

use battle_core::Weather;
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One battle scenario: names of the rosters and modifier sets to combine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleSpec {
    pub blue: String,
    pub red: String,
    #[serde(default)]
    pub blue_modifiers: Option<String>,
    #[serde(default)]
    pub red_modifiers: Option<String>,
    #[serde(default)]
    pub weather: Weather,
    #[serde(default)]
    pub seed: u64,
}

/// Scenario catalog structure for TOML files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScenarioCatalog {
    #[serde(default)]
    pub battles: BTreeMap<String, BattleSpec>,
}

/// Loader for battle scenarios from TOML files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<ScenarioCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ScenarioCatalog> {
        toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse scenario TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_fields_default() {
        let catalog = ScenarioLoader::parse(
            r#"
            [battles.mirror]
            blue = "vanguard"
            red = "vanguard"
            "#,
        )
        .unwrap();
        let spec = &catalog.battles["mirror"];
        assert_eq!(spec.weather, Weather::Neutral);
        assert_eq!(spec.seed, 0);
        assert!(spec.blue_modifiers.is_none());
    }
}
