//! Held items deployed with a unit.
//!
//! Items are static: their stat bonuses and tags are folded into the combatant
//! once at initialization, and their reactions are read by the damage pipeline
//! and the regeneration step.

use crate::state::{StatKind, UnitTags};

/// Items a roster may equip on a unit.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Item {
    // ===== stat items =====
    ChoiceSpecs,
    QuickClaw,
    AssaultVest,
    /// Critical hits also reduce the defender's armor.
    RazorClaw,
    ScopeLens,

    // ===== reaction items =====
    /// Heals the holder for part of the damage it deals.
    ShellBell,
    /// Reflects part of the physical damage taken as true damage.
    RockyHelmet,
    /// Survives one lethal hit.
    MaxRevive,
    /// Earns gold on every kill.
    AmuletCoin,
    /// Abilities can critically hit.
    ReaperCloth,
    /// Heals the holder every regeneration interval.
    Leftovers,
}

impl Item {
    /// Share of damage dealt returned as healing by [`Item::ShellBell`].
    pub const SHELL_BELL_LIFESTEAL_PCT: u32 = 33;
    /// Share of physical damage taken reflected by [`Item::RockyHelmet`].
    pub const ROCKY_HELMET_REFLECT_PCT: u32 = 30;
    /// Armor reduction applied by [`Item::RazorClaw`] on a critical hit.
    pub const RAZOR_CLAW_ARMOR_REDUCTION_MS: u32 = 3000;
    /// Gold earned per kill with [`Item::AmuletCoin`].
    pub const AMULET_COIN_GOLD: u32 = 1;
    /// Max HP share healed per regeneration interval by [`Item::Leftovers`].
    pub const LEFTOVERS_HEAL_PCT: u32 = 3;

    /// Flat stat bonuses granted while held.
    pub fn stat_bonuses(self) -> &'static [(StatKind, f32)] {
        match self {
            Self::ChoiceSpecs => &[(StatKind::AbilityPower, 30.0)],
            Self::QuickClaw => &[(StatKind::AttackSpeed, 0.25)],
            Self::AssaultVest => &[(StatKind::SpeDef, 8.0)],
            Self::RazorClaw => &[(StatKind::CritChance, 20.0)],
            Self::ScopeLens => &[(StatKind::CritChance, 25.0), (StatKind::CritDamage, 0.3)],
            Self::RockyHelmet => &[(StatKind::Def, 5.0)],
            Self::ShellBell
            | Self::MaxRevive
            | Self::AmuletCoin
            | Self::ReaperCloth
            | Self::Leftovers => &[],
        }
    }

    /// Tags granted while held.
    pub fn tags(self) -> UnitTags {
        match self {
            Self::MaxRevive => UnitTags::REVIVE,
            Self::ReaperCloth => UnitTags::ABILITY_CRIT,
            _ => UnitTags::empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_names_parse_case_insensitively() {
        assert_eq!("shell_bell".parse::<Item>(), Ok(Item::ShellBell));
        assert_eq!("MAX_REVIVE".parse::<Item>(), Ok(Item::MaxRevive));
        assert_eq!(Item::ReaperCloth.as_ref(), "reaper_cloth");
    }

    #[test]
    fn tag_items_grant_tags() {
        assert!(Item::MaxRevive.tags().contains(UnitTags::REVIVE));
        assert!(Item::QuickClaw.tags().is_empty());
    }
}
