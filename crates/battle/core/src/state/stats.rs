//! Combat statistics shared by base and live stat blocks.

/// One block of combat statistics.
///
/// The same shape is used for the immutable roster values (`base`) and the
/// mutable in-battle values (`live`) of a [`Combatant`](super::Combatant).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Stats {
    /// Basic attack damage.
    pub atk: u32,
    /// Defense against physical damage.
    pub def: u32,
    /// Defense against special damage.
    pub spe_def: u32,
    /// Maximum life.
    pub hp: u32,
    /// Basic attacks per second.
    pub attack_speed: f32,
    /// Attack range in cells (Chebyshev).
    pub range: u32,
    /// Critical hit chance, percent.
    pub crit_chance: u32,
    /// Critical damage multiplier (2.0 doubles the hit).
    pub crit_damage: f32,
    /// Ability damage/heal bonus, percent.
    pub ability_power: i32,
    /// Dodge chance, percent.
    pub dodge: u32,
    /// Resource required to cast the ability.
    pub max_pp: u32,
    /// Resource gained per regeneration interval.
    pub mana_regen: u32,
}

impl Stats {
    /// Slowest attack speed a unit may be reduced to.
    pub const MIN_ATTACK_SPEED: f32 = 0.2;
    /// Fastest attack speed a unit may reach.
    pub const MAX_ATTACK_SPEED: f32 = 5.0;

    pub fn new(atk: u32, def: u32, spe_def: u32, hp: u32) -> Self {
        Self {
            atk,
            def,
            spe_def,
            hp,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_range(mut self, range: u32) -> Self {
        self.range = range;
        self
    }

    #[must_use]
    pub fn with_attack_speed(mut self, attack_speed: f32) -> Self {
        self.attack_speed = attack_speed;
        self
    }

    #[must_use]
    pub fn with_crit(mut self, chance: u32, damage: f32) -> Self {
        self.crit_chance = chance;
        self.crit_damage = damage;
        self
    }

    #[must_use]
    pub fn with_max_pp(mut self, max_pp: u32) -> Self {
        self.max_pp = max_pp;
        self
    }

    #[must_use]
    pub fn with_dodge(mut self, dodge: u32) -> Self {
        self.dodge = dodge;
        self
    }

    #[must_use]
    pub fn with_ability_power(mut self, ability_power: i32) -> Self {
        self.ability_power = ability_power;
        self
    }

    /// Milliseconds between two actions at the current attack speed.
    pub fn attack_delay_ms(&self) -> i32 {
        let speed = self
            .attack_speed
            .clamp(Self::MIN_ATTACK_SPEED, Self::MAX_ATTACK_SPEED);
        (1000.0 / speed).round() as i32
    }

    /// Adds a flat amount to one statistic. Integer stats are rounded and
    /// never drop below zero.
    pub fn add_flat(&mut self, stat: StatKind, amount: f32) {
        fn shift(value: &mut u32, amount: f32) {
            *value = (*value as f32 + amount).round().max(0.0) as u32;
        }

        match stat {
            StatKind::Atk => shift(&mut self.atk, amount),
            StatKind::Def => shift(&mut self.def, amount),
            StatKind::SpeDef => shift(&mut self.spe_def, amount),
            StatKind::Hp => shift(&mut self.hp, amount),
            StatKind::AttackSpeed => {
                self.attack_speed = (self.attack_speed + amount).max(Self::MIN_ATTACK_SPEED);
            }
            StatKind::Range => shift(&mut self.range, amount),
            StatKind::CritChance => shift(&mut self.crit_chance, amount),
            StatKind::CritDamage => self.crit_damage = (self.crit_damage + amount).max(1.0),
            StatKind::AbilityPower => {
                self.ability_power = (self.ability_power as f32 + amount).round() as i32;
            }
            StatKind::Dodge => shift(&mut self.dodge, amount),
            StatKind::MaxPp => shift(&mut self.max_pp, amount),
            StatKind::ManaRegen => shift(&mut self.mana_regen, amount),
        }
    }

    /// Scales one statistic by `percent` (e.g. `20` adds 20% of its current value).
    pub fn add_percent(&mut self, stat: StatKind, percent: i32) {
        let ratio = percent as f32 / 100.0;
        let current = self.get(stat);
        self.add_flat(stat, current * ratio);
    }

    /// Reads a statistic as a float, regardless of its storage type.
    pub fn get(&self, stat: StatKind) -> f32 {
        match stat {
            StatKind::Atk => self.atk as f32,
            StatKind::Def => self.def as f32,
            StatKind::SpeDef => self.spe_def as f32,
            StatKind::Hp => self.hp as f32,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::Range => self.range as f32,
            StatKind::CritChance => self.crit_chance as f32,
            StatKind::CritDamage => self.crit_damage,
            StatKind::AbilityPower => self.ability_power as f32,
            StatKind::Dodge => self.dodge as f32,
            StatKind::MaxPp => self.max_pp as f32,
            StatKind::ManaRegen => self.mana_regen as f32,
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            atk: 10,
            def: 2,
            spe_def: 2,
            hp: 100,
            attack_speed: 0.75,
            range: 1,
            crit_chance: 10,
            crit_damage: 2.0,
            ability_power: 0,
            dodge: 0,
            max_pp: 100,
            mana_regen: 0,
        }
    }
}

/// Names one field of [`Stats`] for modifiers and buffs.
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
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    Atk,
    Def,
    SpeDef,
    Hp,
    AttackSpeed,
    Range,
    CritChance,
    CritDamage,
    AbilityPower,
    Dodge,
    MaxPp,
    ManaRegen,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attack_delay_follows_attack_speed() {
        let stats = Stats::default().with_attack_speed(1.0);
        assert_eq!(stats.attack_delay_ms(), 1000);
        let stats = Stats::default().with_attack_speed(0.8);
        assert_eq!(stats.attack_delay_ms(), 1250);
    }

    #[test]
    fn attack_delay_is_bounded_for_degenerate_speeds() {
        let stats = Stats::default().with_attack_speed(0.0);
        assert_eq!(stats.attack_delay_ms(), 5000);
    }

    #[test]
    fn flat_modifiers_never_underflow() {
        let mut stats = Stats::new(10, 3, 3, 100);
        stats.add_flat(StatKind::Def, -10.0);
        assert_eq!(stats.def, 0);
        stats.add_flat(StatKind::Atk, 4.4);
        assert_eq!(stats.atk, 14);
    }

    #[test]
    fn percent_modifiers_scale_current_value() {
        let mut stats = Stats::new(20, 0, 0, 200);
        stats.add_percent(StatKind::Hp, 25);
        assert_eq!(stats.hp, 250);
        stats.add_percent(StatKind::AttackSpeed, 100);
        assert!((stats.attack_speed - 1.5).abs() < f32::EPSILON);
    }
}
