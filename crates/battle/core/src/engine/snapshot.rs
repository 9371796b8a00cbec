//! Battle snapshots for replay and determinism checks.
//!
//! A snapshot captures everything that influences future ticks: the battle
//! state (units, statuses, board), the RNG stream position and the pending
//! deferred actions. Restoring it with the same registry and resuming
//! produces the same events as an uninterrupted run.

use std::sync::Arc;

use sha2::{Digest, Sha256};

use crate::ability::AbilityRegistry;
use crate::config::BattleConfig;
use crate::env::BattleRng;
use crate::error::{BattleError, ErrorSeverity};
use crate::state::{BattleState, Team};

use super::{Scheduler, Simulation};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BattleSnapshot {
    pub state: BattleState,
    pub rng: BattleRng,
    pub scheduler: Scheduler,
    pub config: BattleConfig,
    pub finished: bool,
    pub winner: Option<Team>,
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot encoding failed: {0}")]
    Encode(#[source] bincode::Error),

    #[error("snapshot decoding failed: {0}")]
    Decode(#[source] bincode::Error),
}

impl BattleError for SnapshotError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Encode(_) => ErrorSeverity::Internal,
            Self::Decode(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Encode(_) => "SNAPSHOT_ENCODE",
            Self::Decode(_) => "SNAPSHOT_DECODE",
        }
    }
}

impl BattleSnapshot {
    pub fn encode(&self) -> Result<Vec<u8>, SnapshotError> {
        bincode::serialize(self).map_err(SnapshotError::Encode)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, SnapshotError> {
        bincode::deserialize(bytes).map_err(SnapshotError::Decode)
    }
}

impl Simulation {
    /// Captures the full battle state. Buffered events are not included.
    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            state: self.state.clone(),
            rng: self.rng.clone(),
            scheduler: self.scheduler.clone(),
            config: self.config.clone(),
            finished: self.finished,
            winner: self.winner,
        }
    }

    /// Rebuilds a simulation from a snapshot.
    pub fn restore(snapshot: BattleSnapshot, registry: Arc<AbilityRegistry>) -> Self {
        Self {
            state: snapshot.state,
            rng: snapshot.rng,
            scheduler: snapshot.scheduler,
            registry,
            config: snapshot.config,
            events: Vec::new(),
            sink: None,
            finished: snapshot.finished,
            winner: snapshot.winner,
        }
    }

    /// SHA-256 over the encoded state, RNG and scheduler.
    pub fn digest(&self) -> Result<[u8; 32], SnapshotError> {
        let mut hasher = Sha256::new();
        hasher.update(bincode::serialize(&self.state).map_err(SnapshotError::Encode)?);
        hasher.update(bincode::serialize(&self.rng).map_err(SnapshotError::Encode)?);
        hasher.update(bincode::serialize(&self.scheduler).map_err(SnapshotError::Encode)?);
        Ok(hasher.finalize().into())
    }
}
