//! Authoritative battle state representation.
//!
//! The [`Board`] stores occupant ids and [`BattleState`] stores the id→unit
//! arena plus per-team insertion order. Nothing holds a reference to another
//! aggregate: every cross-lookup goes through a [`UnitId`] or a [`Position`],
//! which keeps the whole state trivially serializable for snapshots.
mod board;
mod common;
mod stats;
mod status;
mod tags;
mod unit;

use std::collections::BTreeMap;

pub use board::{Board, BoardError, Cell, EnvironmentKind, EnvironmentTag};
pub use common::{Position, Team, Tick, UnitId};
pub use stats::{StatKind, Stats};
pub use status::{ClearedStatuses, StatusEffects, StatusKind, StatusPulse, StatusPulses, StatusRecord};
pub use tags::UnitTags;
pub use unit::{Combatant, Counters, DamageModifiers, ItemSlots, UnitState};

use crate::env::{UnitSpec, Weather};

/// Canonical snapshot of one battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleState {
    pub board: Board,
    units: BTreeMap<UnitId, Combatant>,
    /// Insertion order per team, indexed by [`Team::index`].
    members: [Vec<UnitId>; 2],
    /// Sequential id allocator, never reused.
    next_id: u32,
    pub weather: Weather,
    /// Simulated milliseconds since the battle started.
    pub elapsed_ms: u64,
    pub tick: Tick,
}

impl BattleState {
    pub fn new(board: Board, weather: Weather) -> Self {
        Self {
            board,
            units: BTreeMap::new(),
            members: [Vec::new(), Vec::new()],
            next_id: 1,
            weather,
            elapsed_ms: 0,
            tick: Tick::ZERO,
        }
    }

    // ------------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------------

    pub fn unit(&self, id: UnitId) -> Option<&Combatant> {
        self.units.get(&id)
    }

    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Combatant> {
        self.units.get_mut(&id)
    }

    /// Unit only if it is still alive.
    pub fn live_unit(&self, id: UnitId) -> Option<&Combatant> {
        self.units.get(&id).filter(|unit| unit.is_alive())
    }

    pub fn live_unit_mut(&mut self, id: UnitId) -> Option<&mut Combatant> {
        self.units.get_mut(&id).filter(|unit| unit.is_alive())
    }

    pub fn is_alive(&self, id: UnitId) -> bool {
        self.live_unit(id).is_some()
    }

    /// Live unit standing on a cell.
    pub fn unit_at(&self, position: Position) -> Option<&Combatant> {
        self.board.get(position).and_then(|id| self.live_unit(id))
    }

    /// Every unit ever deployed on `team`, in insertion order.
    pub fn members(&self, team: Team) -> &[UnitId] {
        &self.members[team.index()]
    }

    /// Live units of `team`, in insertion order.
    pub fn live_units(&self, team: Team) -> impl Iterator<Item = &Combatant> + '_ {
        self.members[team.index()]
            .iter()
            .filter_map(|id| self.live_unit(*id))
    }

    pub fn live_ids(&self, team: Team) -> Vec<UnitId> {
        self.live_units(team).map(|unit| unit.id).collect()
    }

    pub fn live_count(&self, team: Team) -> usize {
        self.live_units(team).count()
    }

    /// All units, live or dead, ordered by id.
    pub fn units(&self) -> impl Iterator<Item = &Combatant> + '_ {
        self.units.values()
    }

    // ------------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------------

    /// Creates a combatant from `spec` on an empty cell.
    pub fn spawn_unit(
        &mut self,
        team: Team,
        position: Position,
        spec: &UnitSpec,
    ) -> Result<UnitId, BoardError> {
        let id = UnitId(self.next_id);
        self.board.place(position, id)?;
        self.next_id += 1;
        self.units
            .insert(id, Combatant::from_spec(id, team, position, spec));
        self.members[team.index()].push(id);
        Ok(id)
    }

    /// Moves a live unit to an empty cell, keeping board and unit in sync.
    pub fn move_unit(&mut self, id: UnitId, to: Position) -> Result<Position, BoardError> {
        let from = self
            .live_unit(id)
            .map(|unit| unit.position)
            .ok_or(BoardError::Vacant { position: to })?;
        if from == to {
            return Ok(from);
        }
        self.board.place(to, id)?;
        self.board.set(from, None)?;
        if let Some(unit) = self.units.get_mut(&id) {
            unit.position = to;
        }
        Ok(from)
    }

    /// Exchanges the cells of two live units.
    pub fn swap_units(&mut self, a: UnitId, b: UnitId) -> Result<(), BoardError> {
        let pa = self
            .live_unit(a)
            .map(|unit| unit.position)
            .ok_or(BoardError::Vacant {
                position: Position::ORIGIN,
            })?;
        let pb = self
            .live_unit(b)
            .map(|unit| unit.position)
            .ok_or(BoardError::Vacant {
                position: Position::ORIGIN,
            })?;
        self.board.swap(pa, pb)?;
        if let Some(unit) = self.units.get_mut(&a) {
            unit.position = pb;
        }
        if let Some(unit) = self.units.get_mut(&b) {
            unit.position = pa;
        }
        Ok(())
    }

    /// Takes a unit off its cell and marks it dead.
    pub fn remove_from_board(&mut self, id: UnitId) {
        let Some(unit) = self.units.get_mut(&id) else {
            return;
        };
        let position = unit.position;
        unit.mark_dead();
        if self.board.get(position) == Some(id) {
            let _ = self.board.set(position, None);
        }
    }

    /// Removes every unit whose life reached zero without passing through
    /// the death resolution. Returns the swept ids.
    pub fn sweep_dead(&mut self) -> Vec<UnitId> {
        let dead: Vec<UnitId> = self
            .units
            .values()
            .filter(|unit| unit.is_alive() && unit.life() == 0)
            .map(|unit| unit.id)
            .collect();
        for id in &dead {
            self.remove_from_board(*id);
        }
        dead
    }

    /// Checks that every live unit sits on the cell the board says it does.
    pub fn is_consistent(&self) -> bool {
        let units_ok = self.units.values().all(|unit| {
            !unit.is_alive() || self.board.get(unit.position) == Some(unit.id)
        });
        let cells_ok = self
            .board
            .occupants()
            .all(|(position, id)| self.live_unit(id).is_some_and(|u| u.position == position));
        units_ok && cells_ok
    }
}
