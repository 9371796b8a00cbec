/// Battle configuration constants and tunable parameters.
///
/// Every field has a default so partial TOML files only override what they
/// name.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BattleConfig {
    /// Number of columns on the board.
    pub board_width: u8,
    /// Number of rows on the board. Each team deploys on its own half.
    pub board_height: u8,

    /// Resource gained by the attacker for every resolved basic attack.
    pub mana_per_attack: u32,
    /// Percentage of damage dealt converted into attacker resource.
    pub mana_dealt_pct: u32,
    /// Percentage of damage taken converted into defender resource.
    pub mana_taken_pct: u32,
    /// Resource granted to the killing unit.
    pub kill_mana_reward: u32,

    /// Delay between two movement steps, in milliseconds.
    pub move_delay_ms: u32,
    /// Period of damage-over-time pulses (burn, poison) and environment pulses.
    pub status_pulse_ms: u32,
    /// Period of passive resource regeneration.
    pub regen_interval_ms: u32,

    /// Burn damage per pulse, as a percentage of the victim's max HP.
    pub burn_hp_pct: u32,
    /// Poison damage per pulse, as a percentage of the victim's max HP.
    pub poison_hp_pct: u32,
    /// Grass heal per pulse, as a percentage of max HP.
    pub grass_heal_pct: u32,
    /// How long a status applied by standing on a hazard lasts.
    pub hazard_status_ms: u32,

    /// Attack gained by RALLY allies when a teammate scores a kill.
    pub rally_attack_bonus: u32,
    /// Protect duration granted after a revive.
    pub revive_protect_ms: u32,
    /// Share of the crit bonus kept against a CRIT_GUARD defender.
    pub crit_guard_pct: u32,

    /// Battles still undecided after this many simulated milliseconds end in a draw.
    pub max_duration_ms: u64,
}

impl BattleConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of units one roster may deploy.
    pub const MAX_UNITS_PER_TEAM: usize = 12;
    /// Maximum number of held items per unit.
    pub const MAX_ITEMS: usize = 3;
    /// Maximum number of pre-battle modifiers per team.
    pub const MAX_TEAM_MODIFIERS: usize = 16;
    /// Dodge chance is capped at this percentage.
    pub const MAX_DODGE_PCT: u32 = 90;
    /// Star levels a unit may have.
    pub const MAX_STARS: u8 = 3;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BOARD_WIDTH: u8 = 8;
    pub const DEFAULT_BOARD_HEIGHT: u8 = 6;
    pub const DEFAULT_MANA_PER_ATTACK: u32 = 5;
    pub const DEFAULT_MAX_DURATION_MS: u64 = 40_000;

    pub fn new() -> Self {
        Self {
            board_width: Self::DEFAULT_BOARD_WIDTH,
            board_height: Self::DEFAULT_BOARD_HEIGHT,
            mana_per_attack: Self::DEFAULT_MANA_PER_ATTACK,
            mana_dealt_pct: 5,
            mana_taken_pct: 10,
            kill_mana_reward: 10,
            move_delay_ms: 500,
            status_pulse_ms: 1000,
            regen_interval_ms: 1000,
            burn_hp_pct: 5,
            poison_hp_pct: 8,
            grass_heal_pct: 5,
            hazard_status_ms: 2000,
            rally_attack_bonus: 3,
            revive_protect_ms: 1000,
            crit_guard_pct: 50,
            max_duration_ms: Self::DEFAULT_MAX_DURATION_MS,
        }
    }

    /// Rows available to one team (its half of the board).
    pub fn deploy_rows(&self) -> u8 {
        self.board_height / 2
    }
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self::new()
    }
}
