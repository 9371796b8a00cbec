//! Damage calculation and application.
//!
//! Every life loss in a battle goes through [`apply_damage`], which runs the
//! fixed pipeline below. Ordering matters: later stages see the result of the
//! earlier ones, and reactions always observe the final life values.
//!
//! ```text
//! protect → pre-modifiers & crit → mitigation → dodge → shield
//!         → life & resource → defender reactions → attacker reactions → death
//! ```

use tracing::trace;

use crate::config::BattleConfig;
use crate::engine::BattleContext;
use crate::env::{Item, RollPurpose};
use crate::events::{BattleEvent, BoardEventKind};
use crate::state::{StatusKind, UnitId, UnitTags};

use super::{apply_status, heal, resolve_lethal};

// ============================================================================
// Attack Type
// ============================================================================

/// How incoming damage is mitigated.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum AttackType {
    /// Mitigated by defense.
    Physical,
    /// Mitigated by special defense.
    Special,
    /// Never mitigated.
    True,
}

// ============================================================================
// Formulas
// ============================================================================

/// Applies defense mitigation.
///
/// # Formula
///
/// ```text
/// PHYSICAL / SPECIAL: round(raw / (1 + 0.1 × defense))
/// TRUE:               raw
/// ```
pub fn mitigate(raw: u32, defense: u32, attack_type: AttackType) -> u32 {
    match attack_type {
        AttackType::True => raw,
        AttackType::Physical | AttackType::Special => {
            let divisor = 1.0 + 0.1 * defense as f64;
            (raw as f64 / divisor).round().max(0.0) as u32
        }
    }
}

/// Crit multiplier after the defender's crit guard.
///
/// A guarded defender only suffers `guard_pct`% of the bonus above ×1.
pub fn crit_multiplier(crit_damage: f32, guarded: bool, guard_pct: u32) -> f32 {
    let bonus = (crit_damage - 1.0).max(0.0);
    if guarded {
        1.0 + bonus * guard_pct as f32 / 100.0
    } else {
        1.0 + bonus
    }
}

/// Share of `amount` expressed in percent, rounded half up.
pub fn percent_of(amount: u32, pct: u32) -> u32 {
    let scaled = (u64::from(amount) * u64::from(pct) + 50) / 100;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

// ============================================================================
// Request / Outcome
// ============================================================================

/// One damage instance travelling through the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageRequest {
    pub target: UnitId,
    pub amount: u32,
    pub attack_type: AttackType,
    pub attacker: Option<UnitId>,
    pub dodgeable: bool,
    pub crit: bool,
    /// Item reactions (reflect, lifesteal, on-crit procs) run for this hit.
    pub reactions: bool,
}

impl DamageRequest {
    pub fn new(target: UnitId, amount: u32, attack_type: AttackType) -> Self {
        Self {
            target,
            amount,
            attack_type,
            attacker: None,
            dodgeable: false,
            crit: false,
            reactions: true,
        }
    }

    #[must_use]
    pub fn from(mut self, attacker: UnitId) -> Self {
        self.attacker = Some(attacker);
        self
    }

    #[must_use]
    pub fn from_opt(mut self, attacker: Option<UnitId>) -> Self {
        self.attacker = attacker;
        self
    }

    #[must_use]
    pub fn dodgeable(mut self) -> Self {
        self.dodgeable = true;
        self
    }

    #[must_use]
    pub fn crit(mut self, crit: bool) -> Self {
        self.crit = crit;
        self
    }

    #[must_use]
    pub fn without_reactions(mut self) -> Self {
        self.reactions = false;
        self
    }
}

/// What happened to one damage instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct DamageOutcome {
    /// The defender died for good (a revive does not count).
    pub death: bool,
    /// Life actually removed.
    pub taken: u32,
    pub dodged: bool,
    /// Damage soaked by the shield.
    pub absorbed: u32,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Runs the damage pipeline.
///
/// A target that already fainted (for example earlier in the same handler)
/// yields an empty outcome.
pub fn apply_damage(ctx: &mut BattleContext<'_>, request: DamageRequest) -> DamageOutcome {
    let mut outcome = DamageOutcome::default();
    let Some(defender) = ctx.state.live_unit(request.target) else {
        return outcome;
    };
    let defender_id = defender.id;
    let defender_team = defender.team;
    let position = defender.position;
    let protected = defender.has_status(StatusKind::Protect);

    let attacker = request.attacker.and_then(|id| ctx.state.live_unit(id));
    let attacker_id = attacker.map(|unit| unit.id);
    let lock_on = attacker.is_some_and(|unit| unit.has_tag(UnitTags::LOCK_ON));

    // Pre-mitigation modifiers, crit, then defense.
    let mut mitigated = 0;
    if !protected {
        let outgoing = attacker.map_or(0, |unit| unit.modifiers.outgoing_pct);
        let factor = 100i32
            .saturating_add(outgoing)
            .saturating_add(defender.modifiers.incoming_pct)
            .max(0) as f32
            / 100.0;
        let mut amount = request.amount as f32 * factor;
        if request.crit {
            let crit_damage = attacker.map_or(2.0, |unit| unit.live.crit_damage);
            amount *= crit_multiplier(
                crit_damage,
                defender.has_tag(UnitTags::CRIT_GUARD),
                ctx.config.crit_guard_pct,
            );
        }
        let raw = amount.round().max(0.0) as u32;
        mitigated = mitigate(raw, defender.defense_against(request.attack_type), request.attack_type);
    }

    // Dodge.
    if request.dodgeable && mitigated > 0 && !lock_on {
        let dodge = defender.live.dodge.min(BattleConfig::MAX_DODGE_PCT);
        if ctx.rng.chance_pct(dodge, RollPurpose::Dodge) {
            mitigated = 0;
            outcome.dodged = true;
        }
    }

    // Shield, life, resource.
    let Some(defender) = ctx.state.live_unit_mut(defender_id) else {
        return outcome;
    };
    if outcome.dodged {
        defender.counters.dodges += 1;
    }
    let absorbed = defender.shield.min(mitigated);
    defender.shield -= absorbed;
    let taken = defender.lose_life(mitigated - absorbed);
    defender.counters.damage_taken += taken as u64;
    defender.gain_pp(percent_of(taken, ctx.config.mana_taken_pct));
    let lethal = defender.life() == 0;
    outcome.absorbed = absorbed;
    outcome.taken = taken;

    if let Some(attacker) = attacker_id.and_then(|id| ctx.state.live_unit_mut(id)) {
        attacker.counters.record_dealt(request.attack_type, taken);
        attacker.gain_pp(percent_of(taken, ctx.config.mana_dealt_pct));
    }

    if outcome.dodged {
        ctx.emit(BattleEvent::StatusBoard {
            unit: Some(defender_id),
            kind: BoardEventKind::Dodge,
            position,
            magnitude: 0,
        });
    }
    ctx.emit(BattleEvent::DamageApplied {
        source: attacker_id,
        target: defender_id,
        position,
        attack_type: request.attack_type,
        amount: taken,
        absorbed,
    });
    trace!(
        target: "battle::damage",
        defender = %defender_id,
        attacker = ?attacker_id,
        raw = request.amount,
        mitigated,
        absorbed,
        taken,
        "damage applied"
    );

    if request.reactions && taken + absorbed > 0 {
        if let Some(attacker) = attacker_id {
            defender_reactions(ctx, defender_id, attacker, &request, taken + absorbed);
            attacker_reactions(ctx, attacker, defender_id, defender_team, &request, taken);
        }
    }

    if lethal {
        outcome.death = resolve_lethal(ctx, defender_id, attacker_id);
    }
    outcome
}

/// Reactions owned by the unit that was hit.
fn defender_reactions(
    ctx: &mut BattleContext<'_>,
    defender: UnitId,
    attacker: UnitId,
    request: &DamageRequest,
    landed: u32,
) {
    let Some(unit) = ctx.state.unit(defender) else {
        return;
    };
    if request.attack_type == AttackType::Physical && unit.has_item(Item::RockyHelmet) {
        let reflected = percent_of(landed, Item::ROCKY_HELMET_REFLECT_PCT);
        if reflected > 0 {
            apply_damage(
                ctx,
                DamageRequest::new(attacker, reflected, AttackType::True)
                    .from(defender)
                    .without_reactions(),
            );
        }
    }
}

/// Reactions owned by the unit that dealt the hit.
fn attacker_reactions(
    ctx: &mut BattleContext<'_>,
    attacker: UnitId,
    defender: UnitId,
    defender_team: crate::state::Team,
    request: &DamageRequest,
    taken: u32,
) {
    let Some(unit) = ctx.state.live_unit(attacker) else {
        return;
    };
    let lifesteal = unit.has_item(Item::ShellBell);
    let razor = unit.has_item(Item::RazorClaw) && unit.team != defender_team;

    if lifesteal && taken > 0 {
        heal(
            ctx,
            attacker,
            percent_of(taken, Item::SHELL_BELL_LIFESTEAL_PCT),
            Some(attacker),
        );
    }
    if razor && request.crit {
        apply_status(
            ctx,
            defender,
            StatusKind::ArmorReduction,
            Item::RAZOR_CLAW_ARMOR_REDUCTION_MS,
            Some(attacker),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_mitigation_matches_reference_value() {
        assert_eq!(mitigate(100, 10, AttackType::Physical), 50);
        assert_eq!(mitigate(100, 0, AttackType::Special), 100);
        assert_eq!(mitigate(7, 3, AttackType::Physical), 5);
    }

    #[test]
    fn true_damage_ignores_defense() {
        assert_eq!(mitigate(30, 250, AttackType::True), 30);
    }

    #[test]
    fn crit_guard_halves_the_bonus() {
        assert!((crit_multiplier(2.0, false, 50) - 2.0).abs() < f32::EPSILON);
        assert!((crit_multiplier(2.0, true, 50) - 1.5).abs() < f32::EPSILON);
        assert!((crit_multiplier(0.5, false, 50) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(percent_of(10, 5), 1);
        assert_eq!(percent_of(9, 5), 0);
        assert_eq!(percent_of(200, 33), 66);
    }
}
