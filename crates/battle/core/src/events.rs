//! Fire-and-forget battle events.
//!
//! The core emits events synchronously, in resolution order, into the
//! [`EventSink`] owned by the simulation. Nothing in the core reads them back;
//! consumers (renderers, the runtime event bus, tests) drain them after a tick.

use crate::ability::AbilityId;
use crate::combat::AttackType;
use crate::state::{EnvironmentKind, Position, StatusKind, Team, UnitId};

/// What a status-board event reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BoardEventKind {
    StatusApplied(StatusKind),
    StatusExpired(StatusKind),
    StatusCleared(StatusKind),
    EnvironmentPlaced(EnvironmentKind),
    EnvironmentExpired,
    Dodge,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    AttackResolved {
        attacker: UnitId,
        defender: UnitId,
        from: Position,
        to: Position,
        damage: u32,
        crit: bool,
    },
    DamageApplied {
        source: Option<UnitId>,
        target: UnitId,
        position: Position,
        attack_type: AttackType,
        amount: u32,
        absorbed: u32,
    },
    HealApplied {
        source: Option<UnitId>,
        target: UnitId,
        position: Position,
        amount: u32,
    },
    ShieldApplied {
        source: Option<UnitId>,
        target: UnitId,
        position: Position,
        amount: u32,
    },
    AbilityCast {
        caster: UnitId,
        ability: AbilityId,
        position: Position,
        target: Option<Position>,
        crit: bool,
    },
    StatusBoard {
        unit: Option<UnitId>,
        kind: BoardEventKind,
        position: Position,
        magnitude: u32,
    },
    UnitMoved {
        unit: UnitId,
        from: Position,
        to: Position,
    },
    UnitDied {
        unit: UnitId,
        killer: Option<UnitId>,
        position: Position,
    },
    UnitRevived {
        unit: UnitId,
        position: Position,
    },
    UnitSpawned {
        unit: UnitId,
        team: Team,
        position: Position,
    },
    BattleEnded {
        winner: Option<Team>,
        elapsed_ms: u64,
    },
}

impl BattleEvent {
    /// Unit primarily concerned by the event, if any.
    pub fn actor(&self) -> Option<UnitId> {
        match self {
            Self::AttackResolved { attacker, .. } => Some(*attacker),
            Self::DamageApplied { target, .. }
            | Self::HealApplied { target, .. }
            | Self::ShieldApplied { target, .. } => Some(*target),
            Self::AbilityCast { caster, .. } => Some(*caster),
            Self::StatusBoard { unit, .. } => *unit,
            Self::UnitMoved { unit, .. }
            | Self::UnitDied { unit, .. }
            | Self::UnitRevived { unit, .. }
            | Self::UnitSpawned { unit, .. } => Some(*unit),
            Self::BattleEnded { .. } => None,
        }
    }
}

/// Receives events as they are emitted.
pub trait EventSink: Send {
    fn emit(&mut self, event: BattleEvent);
}

impl EventSink for Vec<BattleEvent> {
    fn emit(&mut self, event: BattleEvent) {
        self.push(event);
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: BattleEvent) {}
}
