//! Battle configuration loader.

use std::path::Path;

use battle_core::BattleConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for battle configuration from TOML files.
///
/// Missing keys keep their [`BattleConfig::default`] value.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<BattleConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<BattleConfig> {
        let config: BattleConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;
        if config.board_width == 0 || config.board_height < 2 {
            anyhow::bail!(
                "Board {}x{} is too small for two teams",
                config.board_width,
                config.board_height
            );
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("move_delay_ms = 250\nburn_hp_pct = 7\n").unwrap();
        assert_eq!(config.move_delay_ms, 250);
        assert_eq!(config.burn_hp_pct, 7);
        assert_eq!(config.board_width, BattleConfig::DEFAULT_BOARD_WIDTH);
    }

    #[test]
    fn degenerate_board_is_rejected() {
        assert!(ConfigLoader::parse("board_height = 1").is_err());
    }
}
