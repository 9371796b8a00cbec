//! Built-in content compiled into the binary.
//!
//! Mirrors the files under `data/` so callers can set up a battle without a
//! data directory on disk.

use battle_core::{BattleConfig, BattleSetup, RosterSnapshot};

use crate::loaders::factory::build_setup;
use crate::loaders::{
    BattleSpec, ConfigLoader, LoadResult, ModifierLoader, ModifierSets, RosterLoader,
    ScenarioCatalog, ScenarioLoader,
};

const CONFIG: &str = include_str!("../data/config.toml");
const MODIFIERS: &str = include_str!("../data/modifiers.toml");
const BATTLES: &str = include_str!("../data/battles.toml");
const VANGUARD: &str = include_str!("../data/rosters/vanguard.ron");
const RAIDERS: &str = include_str!("../data/rosters/raiders.ron");

/// Names of the built-in rosters.
pub const ROSTERS: [&str; 2] = ["vanguard", "raiders"];

pub fn default_config() -> LoadResult<BattleConfig> {
    ConfigLoader::parse(CONFIG)
}

pub fn roster(name: &str) -> LoadResult<RosterSnapshot> {
    let content = match name {
        "vanguard" => VANGUARD,
        "raiders" => RAIDERS,
        other => anyhow::bail!("Unknown built-in roster '{}'", other),
    };
    RosterLoader::parse(content)
}

pub fn modifier_sets() -> LoadResult<ModifierSets> {
    ModifierLoader::parse(MODIFIERS)
}

pub fn scenarios() -> LoadResult<ScenarioCatalog> {
    ScenarioLoader::parse(BATTLES)
}

/// Assembles a built-in scenario by name.
pub fn battle(name: &str) -> LoadResult<BattleSetup> {
    let catalog = scenarios()?;
    let spec = catalog
        .battles
        .get(name)
        .ok_or_else(|| anyhow::anyhow!("Unknown built-in battle '{}'", name))?;
    assemble(spec, &default_config()?)
}

/// The default demonstration battle.
pub fn skirmish() -> LoadResult<BattleSetup> {
    battle("skirmish")
}

fn assemble(spec: &BattleSpec, config: &BattleConfig) -> LoadResult<BattleSetup> {
    build_setup(
        spec,
        roster(&spec.blue)?,
        roster(&spec.red)?,
        &modifier_sets()?,
        config,
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use battle_core::{Simulation, Team, build_registry};

    use super::*;

    #[test]
    fn shipped_config_matches_defaults() {
        assert_eq!(default_config().unwrap(), BattleConfig::default());
    }

    #[test]
    fn every_shipped_roster_is_valid() {
        let config = default_config().unwrap();
        for name in ROSTERS {
            let roster = roster(name).unwrap();
            assert!(!roster.units.is_empty());
            for team in Team::ALL {
                roster.validate(team, &config).unwrap();
            }
        }
    }

    #[test]
    fn every_shipped_battle_runs_to_completion() {
        let registry = Arc::new(build_registry());
        for name in scenarios().unwrap().battles.keys() {
            let setup = battle(name).unwrap();
            let mut sim =
                Simulation::initialize(&setup, registry.clone(), default_config().unwrap())
                    .unwrap();
            let result = sim.run_to_end(50).unwrap();
            assert!(result.elapsed_ms > 0, "{name} ended immediately");
        }
    }

    #[test]
    fn unknown_names_fail() {
        assert!(roster("nobody").is_err());
        assert!(battle("nowhere").is_err());
    }
}
