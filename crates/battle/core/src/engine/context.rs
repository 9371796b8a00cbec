use crate::ability::AbilityRegistry;
use crate::config::BattleConfig;
use crate::env::BattleRng;
use crate::error::ErrorContext;
use crate::events::BattleEvent;
use crate::state::BattleState;

use super::{DeferredAction, Scheduler};

/// Mutable view over one battle handed to every resolution step.
///
/// Borrowed fresh from the [`Simulation`](super::Simulation) for each tick;
/// no step may keep any part of it beyond the call it was passed to.
pub struct BattleContext<'a> {
    pub state: &'a mut BattleState,
    pub rng: &'a mut BattleRng,
    pub scheduler: &'a mut Scheduler,
    pub events: &'a mut Vec<BattleEvent>,
    pub registry: &'a AbilityRegistry,
    pub config: &'a BattleConfig,
}

impl<'a> BattleContext<'a> {
    pub fn new(
        state: &'a mut BattleState,
        rng: &'a mut BattleRng,
        scheduler: &'a mut Scheduler,
        events: &'a mut Vec<BattleEvent>,
        registry: &'a AbilityRegistry,
        config: &'a BattleConfig,
    ) -> Self {
        Self {
            state,
            rng,
            scheduler,
            events,
            registry,
            config,
        }
    }

    pub fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Simulated milliseconds elapsed since the battle started.
    pub fn now(&self) -> u64 {
        self.state.elapsed_ms
    }

    /// Queues an action `delay_ms` simulated milliseconds from now.
    pub fn schedule(&mut self, delay_ms: u32, action: DeferredAction) {
        let now = self.now();
        self.scheduler.schedule(now, delay_ms, action);
    }

    pub fn error_context(&self) -> ErrorContext {
        ErrorContext::at(self.now())
    }
}
