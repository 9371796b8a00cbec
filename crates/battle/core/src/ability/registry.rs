//! Immutable ability table.
//!
//! Built once with [`build_registry`] (or [`AbilityRegistry::builder`] for
//! tests that need stub handlers) and shared with every simulation through an
//! `Arc`. Lookups never fail: unknown ids resolve to [`AbilityRegistry::FALLBACK`].

use std::collections::BTreeMap;

use crate::engine::BattleContext;

use super::{AbilityError, AbilityId, Cast, handlers};

/// Signature shared by every ability handler.
pub type AbilityFn = fn(&mut BattleContext<'_>, &Cast) -> Result<(), AbilityError>;

/// One registry entry.
#[derive(Clone, Copy, Debug)]
pub struct AbilityEffect {
    pub id: AbilityId,
    /// Reachable from Mimic/Metronome-style handlers.
    pub copyable: bool,
    pub apply: AbilityFn,
}

fn no_op(_ctx: &mut BattleContext<'_>, _cast: &Cast) -> Result<(), AbilityError> {
    Ok(())
}

#[derive(Clone, Debug)]
pub struct AbilityRegistry {
    entries: BTreeMap<AbilityId, AbilityEffect>,
}

impl AbilityRegistry {
    /// Entry returned for ids without a handler.
    pub const FALLBACK: AbilityEffect = AbilityEffect {
        id: AbilityId::Default,
        copyable: false,
        apply: no_op,
    };

    pub fn builder() -> AbilityRegistryBuilder {
        AbilityRegistryBuilder::default()
    }

    pub fn get(&self, id: AbilityId) -> AbilityEffect {
        self.entries.get(&id).copied().unwrap_or(AbilityEffect {
            id,
            ..Self::FALLBACK
        })
    }

    pub fn contains(&self, id: AbilityId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn is_copyable(&self, id: AbilityId) -> bool {
        self.entries.get(&id).is_some_and(|entry| entry.copyable)
    }

    /// Copyable ids in ascending order, the pool for random casts.
    pub fn copyable_ids(&self) -> Vec<AbilityId> {
        self.entries
            .values()
            .filter(|entry| entry.copyable)
            .map(|entry| entry.id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
pub struct AbilityRegistryBuilder {
    entries: BTreeMap<AbilityId, AbilityEffect>,
}

impl AbilityRegistryBuilder {
    /// Registers (or replaces) a handler.
    #[must_use]
    pub fn register(mut self, id: AbilityId, copyable: bool, apply: AbilityFn) -> Self {
        self.entries.insert(
            id,
            AbilityEffect {
                id,
                copyable,
                apply,
            },
        );
        self
    }

    pub fn build(self) -> AbilityRegistry {
        AbilityRegistry {
            entries: self.entries,
        }
    }
}

/// Builds the registry holding every shipped handler.
pub fn build_registry() -> AbilityRegistry {
    handlers::register_all(AbilityRegistry::builder()).build()
}
