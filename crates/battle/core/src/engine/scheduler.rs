//! Clock-indexed queue of delayed sub-effects.
//!
//! Handlers never hold callbacks: they enqueue plain [`DeferredAction`] data
//! keyed on the simulated millisecond it becomes due. The queue is part of the
//! battle snapshot and is emptied by `stop()`.

use std::collections::BTreeMap;

use tracing::trace;

use crate::combat::{self, AttackType, DamageRequest};
use crate::state::{Position, StatKind, StatusKind, UnitId, UnitTags};
use crate::targeting;

use super::BattleContext;

/// A sub-effect resolved after a delay.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeferredAction {
    Damage {
        source: UnitId,
        target: UnitId,
        amount: u32,
        attack_type: AttackType,
    },
    /// Hits every enemy of `source` within `radius` of `center`, center included.
    AreaDamage {
        source: UnitId,
        center: Position,
        radius: u32,
        amount: u32,
        attack_type: AttackType,
    },
    Heal {
        source: UnitId,
        target: UnitId,
        amount: u32,
    },
    Status {
        source: Option<UnitId>,
        target: UnitId,
        kind: StatusKind,
        duration_ms: u32,
    },
    ClearTag {
        target: UnitId,
        tag: UnitTags,
    },
    /// Undoes a temporary flat stat change.
    RevertStat {
        target: UnitId,
        stat: StatKind,
        amount: f32,
    },
}

impl DeferredAction {
    /// Units that must still be alive for the action to resolve.
    fn participants(&self) -> [Option<UnitId>; 2] {
        match self {
            Self::Damage { source, target, .. } | Self::Heal { source, target, .. } => {
                [Some(*source), Some(*target)]
            }
            Self::AreaDamage { source, .. } => [Some(*source), None],
            Self::Status { target, .. }
            | Self::ClearTag { target, .. }
            | Self::RevertStat { target, .. } => [Some(*target), None],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Scheduler {
    /// Keyed by (due millisecond, insertion sequence).
    queue: BTreeMap<(u64, u64), DeferredAction>,
    next_seq: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now_ms: u64, delay_ms: u32, action: DeferredAction) {
        let due = now_ms + delay_ms as u64;
        self.queue.insert((due, self.next_seq), action);
        self.next_seq += 1;
    }

    /// Removes and returns every action due at or before `now_ms`, in due
    /// order then insertion order.
    pub fn take_due(&mut self, now_ms: u64) -> Vec<DeferredAction> {
        let pending = self.queue.split_off(&(now_ms.saturating_add(1), 0));
        std::mem::replace(&mut self.queue, pending)
            .into_values()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Drops every pending action.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Due time of the earliest pending action.
    pub fn next_due(&self) -> Option<u64> {
        self.queue.keys().next().map(|(due, _)| *due)
    }
}

/// Resolves one due action, skipping it when a participant has died.
pub fn resolve(ctx: &mut BattleContext<'_>, action: DeferredAction) {
    if action
        .participants()
        .iter()
        .flatten()
        .any(|id| !ctx.state.is_alive(*id))
    {
        trace!(?action, "skipping deferred action with a fainted participant");
        return;
    }

    match action {
        DeferredAction::Damage {
            source,
            target,
            amount,
            attack_type,
        } => {
            combat::apply_damage(
                ctx,
                DamageRequest::new(target, amount, attack_type).from(source),
            );
        }
        DeferredAction::AreaDamage {
            source,
            center,
            radius,
            amount,
            attack_type,
        } => {
            let Some(team) = ctx.state.unit(source).map(|unit| unit.team.opponent()) else {
                return;
            };
            let mut victims = targeting::units_on_cells(ctx.state, &[center], team);
            victims.extend(targeting::units_in_radius(ctx.state, center, radius, team));
            for victim in victims {
                combat::apply_damage(
                    ctx,
                    DamageRequest::new(victim, amount, attack_type).from(source),
                );
            }
        }
        DeferredAction::Heal {
            source,
            target,
            amount,
        } => {
            combat::heal(ctx, target, amount, Some(source));
        }
        DeferredAction::Status {
            source,
            target,
            kind,
            duration_ms,
        } => {
            combat::apply_status(ctx, target, kind, duration_ms, source);
        }
        DeferredAction::ClearTag { target, tag } => {
            if let Some(unit) = ctx.state.live_unit_mut(target) {
                unit.tags.remove(tag);
            }
        }
        DeferredAction::RevertStat {
            target,
            stat,
            amount,
        } => {
            if let Some(unit) = ctx.state.live_unit_mut(target) {
                unit.live.add_flat(stat, -amount);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(target: u32) -> DeferredAction {
        DeferredAction::ClearTag {
            target: UnitId(target),
            tag: UnitTags::LOCK_ON,
        }
    }

    #[test]
    fn due_actions_come_out_in_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0, 500, tag(1));
        scheduler.schedule(0, 200, tag(2));
        scheduler.schedule(100, 100, tag(3));
        scheduler.schedule(0, 900, tag(4));

        assert!(scheduler.take_due(199).is_empty());
        assert_eq!(scheduler.take_due(500), vec![tag(2), tag(3), tag(1)]);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.next_due(), Some(900));
    }

    #[test]
    fn clear_drops_pending_actions() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule(0, 10, tag(1));
        scheduler.clear();
        assert!(scheduler.is_empty());
        assert!(scheduler.take_due(u64::MAX).is_empty());
    }
}
