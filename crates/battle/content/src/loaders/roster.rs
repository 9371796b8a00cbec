//! Roster loader.

use std::path::Path;

use battle_core::{BattleConfig, RosterSnapshot, Team};

use crate::loaders::{LoadResult, read_file};

/// Loader for team rosters from RON files.
///
/// RON format: `(units: [UnitSpec, ...])`, positions in the team's local frame.
pub struct RosterLoader;

impl RosterLoader {
    pub fn load(path: &Path) -> LoadResult<RosterSnapshot> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Roster {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> LoadResult<RosterSnapshot> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse roster RON: {}", e))
    }

    /// Loads a roster and checks it against the board it will be deployed on.
    pub fn load_checked(
        path: &Path,
        team: Team,
        config: &BattleConfig,
    ) -> LoadResult<RosterSnapshot> {
        let roster = Self::load(path)?;
        roster.validate(team, config)?;
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use battle_core::ability::cast;
    use battle_core::{
        AbilityId, BattleEvent, BattleSetup, Item, Position, Simulation, build_registry,
    };

    use super::*;

    const ROSTER: &str = r#"(
        units: [
            (
                name: "bell",
                position: (x: 2, y: 1),
                stats: (atk: 12, hp: 250, max_pp: 40),
                ability: GigaDrain,
                stars: 2,
                items: [ShellBell],
                summon_on_death: Some((name: "seed", stats: (hp: 60))),
            ),
        ],
    )"#;

    #[test]
    fn parses_partial_unit_specs() {
        let roster = RosterLoader::parse(ROSTER).unwrap();
        let unit = &roster.units[0];
        assert_eq!(unit.position, Position::new(2, 1));
        assert_eq!(unit.ability, AbilityId::GigaDrain);
        assert_eq!(unit.items, vec![Item::ShellBell]);
        assert_eq!(unit.stats.hp, 250);
        assert_eq!(unit.stats.range, 1);
        assert_eq!(unit.summon_on_death.as_ref().map(|s| s.stats.hp), Some(60));
    }

    #[test]
    fn unknown_ability_falls_back_to_no_op() {
        let roster = RosterLoader::parse(
            "(units: [(name: \"x\", stats: (max_pp: 30), ability: Splash)])",
        )
        .unwrap();
        assert_eq!(roster.units[0].ability, AbilityId::Default);

        let foe = RosterLoader::parse("(units: [(name: \"y\", stats: (hp: 80))])").unwrap();
        let setup = BattleSetup::new(roster, foe);
        let mut sim = Simulation::initialize(
            &setup,
            Arc::new(build_registry()),
            BattleConfig::default(),
        )
        .unwrap();
        let caster = sim.state().live_ids(Team::Blue)[0];
        let enemy = sim.state().live_ids(Team::Red)[0];
        sim.drain_events();

        {
            let mut ctx = sim.context();
            ctx.state.unit_mut(caster).unwrap().set_pp(30);
            cast(&mut ctx, caster, Some(enemy));
        }

        let events = sim.drain_events();
        assert_eq!(events.len(), 1);
        assert!(matches!(
            events[0],
            BattleEvent::AbilityCast { ability: AbilityId::Default, .. }
        ));
        assert_eq!(sim.state().unit(caster).unwrap().pp(), 0);
        assert_eq!(sim.state().unit(enemy).unwrap().life(), 80);
    }
}
