//! Content factory for assembling battles from data files.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, BattleSetup, RosterSnapshot, Team, TeamModifier};

use crate::loaders::{
    BattleSpec, ConfigLoader, LoadResult, ModifierLoader, ModifierSets, RosterLoader,
    ScenarioCatalog, ScenarioLoader,
};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── modifiers.toml
/// ├── battles.toml
/// └── rosters/
///     ├── vanguard.ron
///     └── raiders.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle configuration from `config.toml`.
    ///
    /// A missing file yields the default configuration.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join("config.toml");
        if !path.exists() {
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load a roster from `rosters/{name}.ron`.
    pub fn load_roster(&self, name: &str) -> LoadResult<RosterSnapshot> {
        let path = self.data_dir.join("rosters").join(format!("{}.ron", name));
        RosterLoader::load(&path)
    }

    /// Load every modifier set from `modifiers.toml`.
    pub fn load_modifiers(&self) -> LoadResult<ModifierSets> {
        let path = self.data_dir.join("modifiers.toml");
        ModifierLoader::load(&path)
    }

    /// Load the scenario catalog from `battles.toml`.
    pub fn load_scenarios(&self) -> LoadResult<ScenarioCatalog> {
        let path = self.data_dir.join("battles.toml");
        ScenarioLoader::load(&path)
    }

    /// Assemble the named scenario into a validated [`BattleSetup`].
    pub fn load_battle(&self, name: &str) -> LoadResult<(BattleSetup, BattleConfig)> {
        let config = self.load_config()?;
        let catalog = self.load_scenarios()?;
        let spec = catalog
            .battles
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("Unknown battle '{}'", name))?;
        let setup = self.assemble(spec, &config)?;
        Ok((setup, config))
    }

    /// Assemble a scenario entry into a validated [`BattleSetup`].
    pub fn assemble(&self, spec: &BattleSpec, config: &BattleConfig) -> LoadResult<BattleSetup> {
        let sets = if spec.blue_modifiers.is_some() || spec.red_modifiers.is_some() {
            self.load_modifiers()?
        } else {
            ModifierSets::new()
        };
        build_setup(
            spec,
            self.load_roster(&spec.blue)?,
            self.load_roster(&spec.red)?,
            &sets,
            config,
        )
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Combines loaded rosters and modifier sets as a scenario entry describes.
pub(crate) fn build_setup(
    spec: &BattleSpec,
    blue: RosterSnapshot,
    red: RosterSnapshot,
    sets: &ModifierSets,
    config: &BattleConfig,
) -> LoadResult<BattleSetup> {
    let setup = BattleSetup::new(blue, red)
        .with_modifiers(Team::Blue, pick_set(sets, spec.blue_modifiers.as_deref())?)
        .with_modifiers(Team::Red, pick_set(sets, spec.red_modifiers.as_deref())?)
        .with_weather(spec.weather)
        .with_seed(spec.seed);
    setup.validate(config)?;
    Ok(setup)
}

fn pick_set(sets: &ModifierSets, name: Option<&str>) -> LoadResult<Vec<TeamModifier>> {
    match name {
        None => Ok(Vec::new()),
        Some(name) => sets
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown modifier set '{}'", name)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use battle_core::Weather;

    use super::*;

    const ROSTER: &str = r#"(units: [(name: "solo", position: (x: 1, y: 0), stats: (atk: 10, hp: 100))])"#;

    fn write_data(dir: &Path) {
        fs::create_dir_all(dir.join("rosters")).unwrap();
        fs::write(dir.join("rosters/solo.ron"), ROSTER).unwrap();
        fs::write(dir.join("modifiers.toml"), "[[tough]]\nkind = \"shield\"\namount = 15\n")
            .unwrap();
        fs::write(
            dir.join("battles.toml"),
            r#"
            [battles.duel]
            blue = "solo"
            red = "solo"
            red_modifiers = "tough"
            weather = "Rain"
            seed = 42

            [battles.broken]
            blue = "solo"
            red = "solo"
            blue_modifiers = "missing"
            "#,
        )
        .unwrap();
    }

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn assembles_named_battle() {
        let dir = tempfile::tempdir().unwrap();
        write_data(dir.path());
        let factory = ContentFactory::new(dir.path());

        let (setup, config) = factory.load_battle("duel").unwrap();
        assert_eq!(config, BattleConfig::default());
        assert_eq!(setup.blue.units.len(), 1);
        assert!(setup.blue_modifiers.is_empty());
        assert_eq!(setup.red_modifiers, vec![TeamModifier::Shield { amount: 15 }]);
        assert_eq!(setup.weather, Weather::Rain);
        assert_eq!(setup.seed, 42);
    }

    #[test]
    fn unknown_names_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        write_data(dir.path());
        let factory = ContentFactory::new(dir.path());

        let err = factory.load_battle("broken").unwrap_err();
        assert!(err.to_string().contains("missing"));
        assert!(factory.load_battle("nope").is_err());
        assert!(factory.load_roster("nope").is_err());
    }
}
