use bitflags::bitflags;

bitflags! {
    /// Transient boolean markers on a unit.
    ///
    /// Tags are not timed. They are set by items, team modifiers and abilities
    /// and read by cross-ability interactions; some are consumed when used
    /// (`DOUBLE_DAMAGE`, `REVIVE`).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitTags: u32 {
        /// Attacks and abilities from this unit cannot be dodged.
        const LOCK_ON       = 1 << 0;
        /// Next basic attack deals double damage, then the tag is consumed.
        const DOUBLE_DAMAGE = 1 << 1;
        /// Statuses applied to this unit fan out to its teammates.
        const SYNCHRONIZE   = 1 << 2;
        /// Incoming critical hits lose part of their bonus.
        const CRIT_GUARD    = 1 << 3;
        /// Gains attack whenever a teammate scores a kill.
        const RALLY         = 1 << 4;
        /// Ability damage may critically hit.
        const ABILITY_CRIT  = 1 << 5;
        /// Hovers over cells: environment tags do not apply.
        const FLYING        = 1 << 6;
        /// Survives the next lethal hit once.
        const REVIVE        = 1 << 7;
        /// Created during the battle rather than deployed from a roster.
        const SUMMONED      = 1 << 8;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_combine_and_consume() {
        let mut tags = UnitTags::LOCK_ON | UnitTags::DOUBLE_DAMAGE;
        assert!(tags.contains(UnitTags::LOCK_ON));
        tags.remove(UnitTags::DOUBLE_DAMAGE);
        assert!(!tags.contains(UnitTags::DOUBLE_DAMAGE));
        assert!(tags.contains(UnitTags::LOCK_ON));
    }
}
