//! Status effect system for combatants.
//!
//! Each status kind owns one independent timer. Triggering a status that is
//! already running is a no-op: durations never refresh or stack. Side effects
//! that need the rest of the battle (damage pulses, attack speed restoration,
//! events) are reported by [`StatusEffects::update`] and applied by the engine.
//!
//! # Mutual Exclusion
//!
//! - Negative statuses are bulk-cleared by [`StatusEffects::cleanse`]
//! - `RuneProtect` blocks new negative statuses while active
//! - Protective and marker statuses are only cleared individually

use arrayvec::ArrayVec;
use strum::{EnumCount, IntoEnumIterator};

use super::UnitId;

/// Kinds of timed status effects.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::EnumCount,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusKind {
    // ========================================================================
    // Negative (cleansable)
    // ========================================================================
    /// Loses a share of max HP every pulse.
    Burn,
    /// Loses a larger share of max HP every pulse.
    Poison,
    /// Cannot move or act.
    Freeze,
    /// Cannot move or act.
    Sleep,
    /// Picks targets among every unit on the board, itself included.
    Confusion,
    /// Attack speed halved while active.
    Paralysis,
    /// Cannot cast its ability.
    Silence,
    /// Cannot be healed.
    Wound,

    // ========================================================================
    // Individually cleared
    // ========================================================================
    /// Walks toward the charmer and never attacks.
    Charm,
    /// Immune to damage.
    Protect,
    /// Immune to new negative statuses.
    RuneProtect,
    /// Defense halved against mitigated damage.
    ArmorReduction,
}

impl StatusKind {
    /// Returns true for statuses removed by a cleanse.
    pub const fn is_negative(self) -> bool {
        matches!(
            self,
            Self::Burn
                | Self::Poison
                | Self::Freeze
                | Self::Sleep
                | Self::Confusion
                | Self::Paralysis
                | Self::Silence
                | Self::Wound
        )
    }

    /// Returns true for statuses that emit periodic damage pulses.
    pub const fn pulses(self) -> bool {
        matches!(self, Self::Burn | Self::Poison)
    }

    /// Returns true for statuses that skip the unit's movement and attack branch.
    pub const fn disables(self) -> bool {
        matches!(self, Self::Freeze | Self::Sleep)
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Timer state of one status kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusRecord {
    pub active: bool,
    /// Milliseconds left before expiry.
    pub remaining: i32,
    /// Milliseconds accumulated toward the next pulse.
    pub pulse_elapsed: i32,
    /// Unit that applied the status (damage attribution, charm target).
    pub origin: Option<UnitId>,
}

/// Something the engine must resolve after a status timer advanced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusPulse {
    /// A damage-over-time status completed `count` pulse periods.
    Pulse {
        kind: StatusKind,
        origin: Option<UnitId>,
        count: u32,
    },
    /// The status ran out.
    Expired { kind: StatusKind },
}

/// Per-tick outputs of [`StatusEffects::update`].
pub type StatusPulses = ArrayVec<StatusPulse, { StatusKind::COUNT * 2 }>;

/// Kinds cleared by one cleanse.
pub type ClearedStatuses = ArrayVec<StatusKind, { StatusKind::COUNT }>;

/// Active status effects on a combatant, one timer per kind.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    records: [StatusRecord; StatusKind::COUNT],
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            records: [StatusRecord::default(); StatusKind::COUNT],
        }
    }

    /// Checks if a status is active.
    pub fn is_active(&self, kind: StatusKind) -> bool {
        self.records[kind.slot()].active
    }

    /// Milliseconds left on an active status.
    pub fn remaining(&self, kind: StatusKind) -> Option<i32> {
        let record = &self.records[kind.slot()];
        record.active.then_some(record.remaining)
    }

    /// Unit that applied an active status.
    pub fn origin(&self, kind: StatusKind) -> Option<UnitId> {
        let record = &self.records[kind.slot()];
        if record.active { record.origin } else { None }
    }

    pub fn record(&self, kind: StatusKind) -> &StatusRecord {
        &self.records[kind.slot()]
    }

    /// Returns true if the unit skips its movement/attack branch.
    pub fn is_disabled(&self) -> bool {
        StatusKind::iter().any(|kind| kind.disables() && self.is_active(kind))
    }

    /// Starts a status timer.
    ///
    /// Returns `true` when the status became active. Returns `false` (and
    /// leaves the set untouched) when it was already active, when the duration
    /// is zero, or when a negative status is blocked by `RuneProtect`.
    pub fn trigger(&mut self, kind: StatusKind, duration_ms: u32, origin: Option<UnitId>) -> bool {
        if duration_ms == 0 || self.is_active(kind) {
            return false;
        }
        if kind.is_negative() && self.is_active(StatusKind::RuneProtect) {
            return false;
        }

        self.records[kind.slot()] = StatusRecord {
            active: true,
            remaining: duration_ms.min(i32::MAX as u32) as i32,
            pulse_elapsed: 0,
            origin,
        };
        true
    }

    /// Stops a status immediately. Returns `true` if it was active.
    pub fn clear(&mut self, kind: StatusKind) -> bool {
        let was_active = self.is_active(kind);
        self.records[kind.slot()] = StatusRecord::default();
        was_active
    }

    /// Clears every negative status, returning the kinds that were active.
    pub fn cleanse(&mut self) -> ClearedStatuses {
        let mut cleared = ClearedStatuses::new();
        for kind in StatusKind::iter().filter(|kind| kind.is_negative()) {
            if self.clear(kind) {
                cleared.push(kind);
            }
        }
        cleared
    }

    /// Clears every status without reporting side effects.
    pub fn clear_all(&mut self) {
        self.records = [StatusRecord::default(); StatusKind::COUNT];
    }

    /// Advances every active timer by `dt` milliseconds.
    ///
    /// Damage-over-time statuses report one [`StatusPulse::Pulse`] carrying
    /// the number of `pulse_ms` periods completed during `dt`; a status whose remaining time reaches zero
    /// is cleared and reported as [`StatusPulse::Expired`]. Pulses are
    /// reported before the expiry of the same status.
    pub fn update(&mut self, dt: u32, pulse_ms: u32) -> StatusPulses {
        let mut out = StatusPulses::new();
        let dt = dt.min(i32::MAX as u32) as i32;
        let pulse_ms = pulse_ms.max(1).min(i32::MAX as u32) as i32;

        for kind in StatusKind::iter() {
            let record = &mut self.records[kind.slot()];
            if !record.active {
                continue;
            }

            if kind.pulses() {
                record.pulse_elapsed += dt.min(record.remaining);
                let mut count = 0;
                while record.pulse_elapsed >= pulse_ms {
                    record.pulse_elapsed -= pulse_ms;
                    count += 1;
                }
                if count > 0 {
                    let _ = out.try_push(StatusPulse::Pulse {
                        kind,
                        origin: record.origin,
                        count,
                    });
                }
            }

            record.remaining -= dt;
            if record.remaining <= 0 {
                *record = StatusRecord::default();
                let _ = out.try_push(StatusPulse::Expired { kind });
            }
        }

        out
    }

    /// Iterates over the kinds currently active.
    pub fn active(&self) -> impl Iterator<Item = StatusKind> + '_ {
        StatusKind::iter().filter(move |kind| self.is_active(*kind))
    }

    /// Returns true if no status is active.
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }
}

impl Default for StatusEffects {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_is_idempotent_while_active() {
        let mut set = StatusEffects::empty();
        assert!(set.trigger(StatusKind::Burn, 3000, None));
        set.update(1000, 1000);
        assert_eq!(set.remaining(StatusKind::Burn), Some(2000));

        assert!(!set.trigger(StatusKind::Burn, 9000, None));
        assert_eq!(set.remaining(StatusKind::Burn), Some(2000));
    }

    #[test]
    fn update_expires_at_zero() {
        let mut set = StatusEffects::empty();
        set.trigger(StatusKind::Sleep, 500, None);
        assert!(set.is_disabled());

        let pulses = set.update(500, 1000);
        assert!(!set.is_active(StatusKind::Sleep));
        assert_eq!(
            pulses.as_slice(),
            &[StatusPulse::Expired {
                kind: StatusKind::Sleep
            }]
        );
        assert!(!set.is_disabled());
    }

    #[test]
    fn burn_pulses_once_per_period() {
        let mut set = StatusEffects::empty();
        set.trigger(StatusKind::Burn, 5000, Some(UnitId(4)));

        let mut pulses = 0;
        for _ in 0..10 {
            pulses += pulse_count(&set.update(250, 1000));
        }
        assert_eq!(pulses, 2);
        assert_eq!(set.origin(StatusKind::Burn), Some(UnitId(4)));
    }

    fn pulse_count(pulses: &StatusPulses) -> u32 {
        pulses
            .iter()
            .map(|p| match p {
                StatusPulse::Pulse { count, .. } => *count,
                StatusPulse::Expired { .. } => 0,
            })
            .sum()
    }

    #[test]
    fn long_tick_reports_every_elapsed_period() {
        let mut set = StatusEffects::empty();
        set.trigger(StatusKind::Burn, 5000, None);
        let pulses = set.update(5000, 1000);
        assert_eq!(pulse_count(&pulses), 5);
        assert!(!set.is_active(StatusKind::Burn));

        let mut sliced = StatusEffects::empty();
        sliced.trigger(StatusKind::Burn, 5000, None);
        let mut total = 0;
        for _ in 0..100 {
            total += pulse_count(&sliced.update(50, 1000));
        }
        assert_eq!(total, 5);
    }

    #[test]
    fn last_pulse_lands_before_expiry() {
        let mut set = StatusEffects::empty();
        set.trigger(StatusKind::Poison, 1000, None);
        let pulses = set.update(1000, 1000);
        assert_eq!(pulses.len(), 2);
        assert!(matches!(pulses[0], StatusPulse::Pulse { .. }));
        assert!(matches!(pulses[1], StatusPulse::Expired { .. }));
    }

    #[test]
    fn cleanse_only_clears_negative_statuses() {
        let mut set = StatusEffects::empty();
        set.trigger(StatusKind::Poison, 1000, None);
        set.trigger(StatusKind::Wound, 1000, None);
        set.trigger(StatusKind::Protect, 1000, None);
        set.trigger(StatusKind::ArmorReduction, 1000, None);
        set.trigger(StatusKind::Charm, 1000, None);

        let cleared = set.cleanse();
        assert_eq!(cleared.as_slice(), &[StatusKind::Poison, StatusKind::Wound]);
        assert!(set.is_active(StatusKind::Protect));
        assert!(set.is_active(StatusKind::ArmorReduction));
        assert!(set.is_active(StatusKind::Charm));
    }

    #[test]
    fn rune_protect_blocks_negative_statuses_only() {
        let mut set = StatusEffects::empty();
        set.trigger(StatusKind::RuneProtect, 2000, None);
        assert!(!set.trigger(StatusKind::Freeze, 1000, None));
        assert!(set.trigger(StatusKind::Protect, 1000, None));
    }

    #[test]
    fn zero_duration_is_ignored() {
        let mut set = StatusEffects::empty();
        assert!(!set.trigger(StatusKind::Silence, 0, None));
        assert!(set.is_empty());
    }
}
