//! Live battle record of one unit.

use arrayvec::ArrayVec;

use crate::ability::AbilityId;
use crate::combat::AttackType;
use crate::config::BattleConfig;
use crate::env::{Item, UnitSpec};

use super::{ClearedStatuses, Position, StatusEffects, StatusKind, Stats, Team, UnitId, UnitTags};

/// Held items of one combatant.
pub type ItemSlots = ArrayVec<Item, { BattleConfig::MAX_ITEMS }>;

/// State machine branch a combatant is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum UnitState {
    #[default]
    Moving,
    Attacking,
}

/// Percentage adjustments applied before mitigation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageModifiers {
    /// Added to every hit this unit deals.
    pub outgoing_pct: i32,
    /// Added to every hit this unit takes (negative reduces).
    pub incoming_pct: i32,
}

/// Per-unit tallies read by some handlers and by the battle result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Counters {
    pub physical_dealt: u64,
    pub special_dealt: u64,
    pub true_dealt: u64,
    pub damage_taken: u64,
    pub healed: u64,
    pub healing_done: u64,
    pub shielded: u64,
    pub dodges: u32,
    pub crits: u32,
    pub kills: u32,
    pub casts: u32,
    pub gold_earned: u32,
}

impl Counters {
    pub fn record_dealt(&mut self, attack_type: AttackType, amount: u32) {
        let amount = amount as u64;
        match attack_type {
            AttackType::Physical => self.physical_dealt += amount,
            AttackType::Special => self.special_dealt += amount,
            AttackType::True => self.true_dealt += amount,
        }
    }

    pub fn total_dealt(&self) -> u64 {
        self.physical_dealt + self.special_dealt + self.true_dealt
    }
}

/// A unit's live battle state.
///
/// `life` stays within `0..=live.hp`, `pp` within `0..=live.max_pp`. Both
/// invariants are enforced by the mutators below; the damage pipeline and the
/// heal helpers never write the fields directly.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: UnitId,
    pub team: Team,
    pub position: Position,
    pub name: String,
    pub stars: u8,
    /// Roster values, never modified during the battle.
    pub base: Stats,
    /// Values after items, team modifiers and in-battle buffs.
    pub live: Stats,
    life: u32,
    pub shield: u32,
    pp: u32,
    /// Milliseconds before the next action; may go negative within a tick.
    pub cooldown: i32,
    pub ability: AbilityId,
    pub statuses: StatusEffects,
    pub tags: UnitTags,
    pub items: ItemSlots,
    pub counters: Counters,
    pub modifiers: DamageModifiers,
    pub state: UnitState,
    /// Enemy currently engaged in the attacking branch.
    pub target: Option<UnitId>,
    alive: bool,
    /// Milliseconds accumulated toward the next regeneration interval.
    pub regen_elapsed: i32,
    /// Milliseconds accumulated toward the next environment pulse.
    pub environment_elapsed: i32,
    /// Attack speed withheld by paralysis, restored on expiry.
    pub paralysis_debt: f32,
    pub summon_on_death: Option<Box<UnitSpec>>,
}

impl Combatant {
    /// Builds a combatant from its roster entry, folding static item bonuses
    /// into its live stats.
    pub fn from_spec(id: UnitId, team: Team, position: Position, spec: &UnitSpec) -> Self {
        let mut live = spec.stats;
        let mut tags = spec.tags;
        let mut items = ItemSlots::new();
        for item in spec.items.iter().copied() {
            if items.try_push(item).is_err() {
                break;
            }
            for (stat, amount) in item.stat_bonuses() {
                live.add_flat(*stat, *amount);
            }
            tags |= item.tags();
        }
        live.dodge = live.dodge.min(BattleConfig::MAX_DODGE_PCT);

        Self {
            id,
            team,
            position,
            name: spec.name.clone(),
            stars: spec.stars.clamp(1, BattleConfig::MAX_STARS),
            base: spec.stats,
            life: live.hp,
            live,
            shield: 0,
            pp: 0,
            cooldown: 0,
            ability: spec.ability,
            statuses: StatusEffects::empty(),
            tags,
            items,
            counters: Counters::default(),
            modifiers: DamageModifiers::default(),
            state: UnitState::Moving,
            target: None,
            alive: true,
            regen_elapsed: 0,
            environment_elapsed: 0,
            paralysis_debt: 0.0,
            summon_on_death: spec.summon_on_death.clone(),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn mark_dead(&mut self) {
        self.alive = false;
        self.life = 0;
        self.shield = 0;
        self.target = None;
        self.statuses.clear_all();
    }

    pub fn life(&self) -> u32 {
        self.life
    }

    pub fn max_life(&self) -> u32 {
        self.live.hp
    }

    /// Sets life, clamped to `0..=max_life`.
    pub fn set_life(&mut self, life: u32) {
        self.life = life.min(self.live.hp);
    }

    /// Removes up to `amount` life and returns what was actually lost.
    pub(crate) fn lose_life(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.life);
        self.life -= lost;
        lost
    }

    /// Restores up to `amount` life and returns what was actually restored.
    pub(crate) fn restore_life(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.live.hp - self.life.min(self.live.hp));
        self.life += restored;
        restored
    }

    /// Raises max HP (and life by the same amount).
    pub fn grow_max_life(&mut self, amount: u32) {
        self.live.hp = self.live.hp.saturating_add(amount);
        self.life = self.life.saturating_add(amount).min(self.live.hp);
    }

    pub fn life_pct(&self) -> u32 {
        if self.live.hp == 0 {
            return 0;
        }
        ((self.life as u64 * 100) / self.live.hp as u64) as u32
    }

    pub fn pp(&self) -> u32 {
        self.pp
    }

    pub fn max_pp(&self) -> u32 {
        self.live.max_pp
    }

    /// Adds resource, saturating at `max_pp`.
    pub fn gain_pp(&mut self, amount: u32) {
        self.pp = self.pp.saturating_add(amount).min(self.live.max_pp);
    }

    pub fn set_pp(&mut self, pp: u32) {
        self.pp = pp.min(self.live.max_pp);
    }

    /// Full resource meter.
    pub fn can_cast(&self) -> bool {
        self.pp >= self.live.max_pp
    }

    pub fn has_status(&self, kind: StatusKind) -> bool {
        self.statuses.is_active(kind)
    }

    pub fn has_tag(&self, tag: UnitTags) -> bool {
        self.tags.contains(tag)
    }

    pub fn has_item(&self, item: Item) -> bool {
        self.items.contains(&item)
    }

    pub fn in_range_of(&self, other: Position) -> bool {
        self.position.distance(other) <= self.live.range.max(1)
    }

    /// Defense relevant to an attack type, halved under armor reduction.
    pub fn defense_against(&self, attack_type: AttackType) -> u32 {
        let defense = match attack_type {
            AttackType::Physical => self.live.def,
            AttackType::Special => self.live.spe_def,
            AttackType::True => return 0,
        };
        if self.has_status(StatusKind::ArmorReduction) {
            defense / 2
        } else {
            defense
        }
    }

    /// Scales a tuning value by ability power.
    pub fn scale_by_ap(&self, value: u32) -> u32 {
        let ratio = (100 + self.live.ability_power).max(0) as u64;
        ((value as u64 * ratio + 50) / 100) as u32
    }

    /// Reverts what a status took from the unit when it ends.
    pub(crate) fn on_status_end(&mut self, kind: StatusKind) {
        if kind == StatusKind::Paralysis {
            self.live.attack_speed += self.paralysis_debt;
            self.paralysis_debt = 0.0;
        }
    }

    /// Withholds half the attack speed while paralysis runs.
    pub(crate) fn on_status_start(&mut self, kind: StatusKind) {
        if kind == StatusKind::Paralysis {
            let slowed = (self.live.attack_speed / 2.0).max(Stats::MIN_ATTACK_SPEED);
            let debt = (self.live.attack_speed - slowed).max(0.0);
            self.live.attack_speed -= debt;
            self.paralysis_debt += debt;
        }
    }

    /// Resets a resurrected unit to full life with its negative statuses cleared.
    pub(crate) fn revive(&mut self) -> ClearedStatuses {
        self.alive = true;
        self.life = self.live.hp;
        let cleared = self.statuses.cleanse();
        for kind in cleared.iter().copied() {
            self.on_status_end(kind);
        }
        cleared
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> UnitSpec {
        UnitSpec::new("tester", Position::new(1, 1), Stats::new(10, 4, 6, 80))
    }

    #[test]
    fn items_fold_into_live_stats() {
        let spec = spec().with_item(Item::RockyHelmet).with_item(Item::MaxRevive);
        let unit = Combatant::from_spec(UnitId(1), Team::Blue, Position::new(1, 1), &spec);
        assert_eq!(unit.base.def, 4);
        assert_eq!(unit.live.def, 9);
        assert!(unit.has_tag(UnitTags::REVIVE));
        assert_eq!(unit.life(), 80);
    }

    #[test]
    fn life_and_pp_stay_bounded() {
        let mut unit = Combatant::from_spec(UnitId(1), Team::Red, Position::ORIGIN, &spec());
        assert_eq!(unit.lose_life(500), 80);
        assert_eq!(unit.life(), 0);
        assert_eq!(unit.restore_life(500), 80);
        assert_eq!(unit.life(), 80);

        unit.gain_pp(250);
        assert_eq!(unit.pp(), unit.max_pp());
        assert!(unit.can_cast());
    }

    #[test]
    fn armor_reduction_halves_defense() {
        let mut unit = Combatant::from_spec(UnitId(1), Team::Red, Position::ORIGIN, &spec());
        assert_eq!(unit.defense_against(AttackType::Special), 6);
        unit.statuses.trigger(StatusKind::ArmorReduction, 1000, None);
        assert_eq!(unit.defense_against(AttackType::Special), 3);
        assert_eq!(unit.defense_against(AttackType::True), 0);
    }

    #[test]
    fn ability_power_scales_tunings() {
        let mut unit = Combatant::from_spec(UnitId(1), Team::Red, Position::ORIGIN, &spec());
        assert_eq!(unit.scale_by_ap(40), 40);
        unit.live.ability_power = 50;
        assert_eq!(unit.scale_by_ap(40), 60);
    }

    #[test]
    fn paralysis_debt_is_restored() {
        let mut unit = Combatant::from_spec(
            UnitId(1),
            Team::Red,
            Position::ORIGIN,
            &spec().with_item(Item::QuickClaw),
        );
        let before = unit.live.attack_speed;
        unit.on_status_start(StatusKind::Paralysis);
        assert!((unit.live.attack_speed - before / 2.0).abs() < 1e-6);
        unit.on_status_end(StatusKind::Paralysis);
        assert!((unit.live.attack_speed - before).abs() < 1e-6);
        assert_eq!(unit.paralysis_debt, 0.0);
    }
}
