//! Battle inputs supplied by collaborators outside the simulation.
//!
//! A [`BattleSetup`] bundles one [`RosterSnapshot`] per team, the pre-battle
//! [`TeamModifier`]s produced by the synergy system, the weather and the RNG
//! seed. Rosters are validated as a whole before any unit is placed.

use crate::ability::AbilityId;
use crate::config::BattleConfig;
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{Position, StatKind, Stats, Team, UnitTags};

use super::{Item, Weather};

/// One unit of a roster snapshot.
///
/// `position` is expressed in the team's local frame: row 0 is the row nearest
/// to the team's own board edge. Red rosters are mirrored onto the board.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnitSpec {
    pub name: String,
    pub position: Position,
    pub stats: Stats,
    pub ability: AbilityId,
    pub stars: u8,
    pub items: Vec<Item>,
    pub tags: UnitTags,
    /// Unit spawned on the death cell when this unit dies for good.
    pub summon_on_death: Option<Box<UnitSpec>>,
}

impl UnitSpec {
    pub fn new(name: impl Into<String>, position: Position, stats: Stats) -> Self {
        Self {
            name: name.into(),
            position,
            stats,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_ability(mut self, ability: AbilityId) -> Self {
        self.ability = ability;
        self
    }

    #[must_use]
    pub fn with_stars(mut self, stars: u8) -> Self {
        self.stars = stars;
        self
    }

    #[must_use]
    pub fn with_item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    #[must_use]
    pub fn with_tags(mut self, tags: UnitTags) -> Self {
        self.tags |= tags;
        self
    }

    #[must_use]
    pub fn with_summon_on_death(mut self, summon: UnitSpec) -> Self {
        self.summon_on_death = Some(Box::new(summon));
        self
    }

    /// Checks everything except the deployment cell.
    fn validate_body(&self, team: Team, index: usize) -> Result<(), RosterError> {
        if self.stats.hp == 0 {
            return Err(RosterError::ZeroHp { team, index });
        }
        if !self.stats.attack_speed.is_finite() || self.stats.attack_speed <= 0.0 {
            return Err(RosterError::InvalidAttackSpeed { team, index });
        }
        if !(1..=BattleConfig::MAX_STARS).contains(&self.stars) {
            return Err(RosterError::InvalidStars {
                team,
                index,
                stars: self.stars,
            });
        }
        if self.items.len() > BattleConfig::MAX_ITEMS {
            return Err(RosterError::TooManyItems {
                team,
                index,
                count: self.items.len(),
            });
        }
        if let Some(summon) = &self.summon_on_death {
            summon.validate_body(team, index)?;
        }
        Ok(())
    }
}

impl Default for UnitSpec {
    fn default() -> Self {
        Self {
            name: String::from("unit"),
            position: Position::ORIGIN,
            stats: Stats::default(),
            ability: AbilityId::Default,
            stars: 1,
            items: Vec::new(),
            tags: UnitTags::empty(),
            summon_on_death: None,
        }
    }
}

/// Ordered list of units one team deploys.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterSnapshot {
    pub units: Vec<UnitSpec>,
}

impl RosterSnapshot {
    pub fn new(units: Vec<UnitSpec>) -> Self {
        Self { units }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Validates the whole roster for `team` without touching any board.
    pub fn validate(&self, team: Team, config: &BattleConfig) -> Result<(), RosterError> {
        if self.units.len() > BattleConfig::MAX_UNITS_PER_TEAM {
            return Err(RosterError::TooManyUnits {
                team,
                count: self.units.len(),
            });
        }

        let mut seen: Vec<Position> = Vec::with_capacity(self.units.len());
        for (index, unit) in self.units.iter().enumerate() {
            let local = unit.position;
            if local.x < 0
                || local.y < 0
                || local.x >= config.board_width as i32
                || local.y >= config.deploy_rows() as i32
            {
                return Err(RosterError::OutOfBounds {
                    team,
                    index,
                    position: local,
                });
            }
            if seen.contains(&local) {
                return Err(RosterError::DuplicatePosition {
                    team,
                    position: local,
                });
            }
            seen.push(local);
            unit.validate_body(team, index)?;
        }
        Ok(())
    }
}

/// Maps a team-local deployment cell onto the board.
pub fn board_position(team: Team, local: Position, config: &BattleConfig) -> Position {
    match team {
        Team::Blue => local,
        Team::Red => Position::new(local.x, config.board_height as i32 - 1 - local.y),
    }
}

/// Passive team-wide modifier applied once at initialization.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TeamModifier {
    FlatStat { stat: StatKind, amount: f32 },
    PercentStat { stat: StatKind, percent: i32 },
    /// Starting shield on every unit.
    Shield { amount: u32 },
    /// Starting resource on every unit.
    StartingPp { amount: u32 },
    GrantTag { tag: UnitTags },
    /// Percentage added to all outgoing damage.
    DamageAmp { percent: i32 },
    /// Percentage removed from all incoming damage.
    DamageReduction { percent: i32 },
}

/// Everything needed to initialize a battle.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleSetup {
    pub blue: RosterSnapshot,
    pub red: RosterSnapshot,
    pub blue_modifiers: Vec<TeamModifier>,
    pub red_modifiers: Vec<TeamModifier>,
    pub weather: Weather,
    pub seed: u64,
}

impl BattleSetup {
    pub fn new(blue: RosterSnapshot, red: RosterSnapshot) -> Self {
        Self {
            blue,
            red,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, team: Team, modifiers: Vec<TeamModifier>) -> Self {
        match team {
            Team::Blue => self.blue_modifiers = modifiers,
            Team::Red => self.red_modifiers = modifiers,
        }
        self
    }

    #[must_use]
    pub fn with_weather(mut self, weather: Weather) -> Self {
        self.weather = weather;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn roster(&self, team: Team) -> &RosterSnapshot {
        match team {
            Team::Blue => &self.blue,
            Team::Red => &self.red,
        }
    }

    pub fn modifiers(&self, team: Team) -> &[TeamModifier] {
        match team {
            Team::Blue => &self.blue_modifiers,
            Team::Red => &self.red_modifiers,
        }
    }

    /// Validates both rosters and modifier lists.
    pub fn validate(&self, config: &BattleConfig) -> Result<(), RosterError> {
        if config.board_width == 0 || config.deploy_rows() == 0 {
            return Err(RosterError::EmptyBoard);
        }
        for team in Team::ALL {
            self.roster(team).validate(team, config)?;
            let count = self.modifiers(team).len();
            if count > BattleConfig::MAX_TEAM_MODIFIERS {
                return Err(RosterError::TooManyModifiers { team, count });
            }
        }
        Ok(())
    }
}

/// Reasons a battle setup is rejected at initialization.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    #[error("board has no deployment rows")]
    EmptyBoard,

    #[error("{team} roster has {count} units (max {})", BattleConfig::MAX_UNITS_PER_TEAM)]
    TooManyUnits { team: Team, count: usize },

    #[error("{team} unit {index} deploys outside its half at {position}")]
    OutOfBounds {
        team: Team,
        index: usize,
        position: Position,
    },

    #[error("{team} roster deploys two units at {position}")]
    DuplicatePosition { team: Team, position: Position },

    #[error("{team} unit {index} has zero hp")]
    ZeroHp { team: Team, index: usize },

    #[error("{team} unit {index} has a non-positive attack speed")]
    InvalidAttackSpeed { team: Team, index: usize },

    #[error("{team} unit {index} has invalid star level {stars}")]
    InvalidStars { team: Team, index: usize, stars: u8 },

    #[error("{team} unit {index} holds {count} items (max {})", BattleConfig::MAX_ITEMS)]
    TooManyItems {
        team: Team,
        index: usize,
        count: usize,
    },

    #[error("{team} has {count} team modifiers (max {})", BattleConfig::MAX_TEAM_MODIFIERS)]
    TooManyModifiers { team: Team, count: usize },
}

impl BattleError for RosterError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyBoard => "ROSTER_EMPTY_BOARD",
            Self::TooManyUnits { .. } => "ROSTER_TOO_MANY_UNITS",
            Self::OutOfBounds { .. } => "ROSTER_OUT_OF_BOUNDS",
            Self::DuplicatePosition { .. } => "ROSTER_DUPLICATE_POSITION",
            Self::ZeroHp { .. } => "ROSTER_ZERO_HP",
            Self::InvalidAttackSpeed { .. } => "ROSTER_INVALID_ATTACK_SPEED",
            Self::InvalidStars { .. } => "ROSTER_INVALID_STARS",
            Self::TooManyItems { .. } => "ROSTER_TOO_MANY_ITEMS",
            Self::TooManyModifiers { .. } => "ROSTER_TOO_MANY_MODIFIERS",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(x: i32, y: i32) -> UnitSpec {
        UnitSpec::new("u", Position::new(x, y), Stats::default())
    }

    #[test]
    fn red_positions_are_mirrored() {
        let config = BattleConfig::default();
        assert_eq!(
            board_position(Team::Red, Position::new(2, 0), &config),
            Position::new(2, 5)
        );
        assert_eq!(
            board_position(Team::Blue, Position::new(2, 0), &config),
            Position::new(2, 0)
        );
    }

    #[test]
    fn duplicate_positions_are_rejected() {
        let config = BattleConfig::default();
        let roster = RosterSnapshot::new(vec![unit(1, 1), unit(1, 1)]);
        assert_eq!(
            roster.validate(Team::Blue, &config),
            Err(RosterError::DuplicatePosition {
                team: Team::Blue,
                position: Position::new(1, 1)
            })
        );
    }

    #[test]
    fn units_must_deploy_on_their_half() {
        let config = BattleConfig::default();
        let roster = RosterSnapshot::new(vec![unit(0, 3)]);
        assert!(matches!(
            roster.validate(Team::Red, &config),
            Err(RosterError::OutOfBounds { index: 0, .. })
        ));
    }

    #[test]
    fn invalid_unit_bodies_are_rejected() {
        let config = BattleConfig::default();
        let mut zero = unit(0, 0);
        zero.stats.hp = 0;
        assert!(matches!(
            RosterSnapshot::new(vec![zero]).validate(Team::Blue, &config),
            Err(RosterError::ZeroHp { .. })
        ));

        let stars = unit(0, 0).with_stars(4);
        assert!(matches!(
            RosterSnapshot::new(vec![stars]).validate(Team::Blue, &config),
            Err(RosterError::InvalidStars { stars: 4, .. })
        ));

        let items = unit(0, 0)
            .with_item(Item::Leftovers)
            .with_item(Item::ShellBell)
            .with_item(Item::QuickClaw)
            .with_item(Item::ScopeLens);
        let err = RosterSnapshot::new(vec![items])
            .validate(Team::Blue, &config)
            .unwrap_err();
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "ROSTER_TOO_MANY_ITEMS");
    }
}
