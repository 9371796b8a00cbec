//! Event payloads published by the battle worker.

use battle_core::{BattleEvent, BattleResult, Team, Weather};
use serde::{Deserialize, Serialize};

/// Combat event stamped with the simulated time of the tick that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleTick {
    pub elapsed_ms: u64,
    pub event: BattleEvent,
}

/// Battle lifecycle transitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Started {
        seed: u64,
        weather: Weather,
        blue_units: usize,
        red_units: usize,
    },
    /// One side was eliminated or the time limit expired.
    Finished { result: BattleResult },
    /// A client stopped the battle early.
    Stopped { result: Option<BattleResult> },
}

impl LifecycleEvent {
    pub fn winner(&self) -> Option<Team> {
        match self {
            Self::Finished { result } => result.winner,
            Self::Stopped { result } => result.as_ref().and_then(|result| result.winner),
            Self::Started { .. } => None,
        }
    }
}
