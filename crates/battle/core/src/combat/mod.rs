//! Combat resolution: damage pipeline, healing, statuses, attacks and deaths.
//!
//! Every function here takes the tick's [`BattleContext`](crate::engine::BattleContext)
//! and tolerates targets that fainted earlier in the same resolution by
//! returning an empty result.
mod attack;
mod damage;
mod death;
mod heal;
mod status;

pub use attack::basic_attack;
pub use damage::{
    AttackType, DamageOutcome, DamageRequest, apply_damage, crit_multiplier, mitigate, percent_of,
};
pub use death::resolve_lethal;
pub use heal::{add_shield, heal, restore_pp};
pub use status::{apply_status, cleanse, clear_status};
