//! High-level runtime orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to drive a battle.

use std::sync::Arc;

use battle_content::{ContentFactory, presets};
use battle_core::{
    AbilityRegistry, BattleConfig, BattleResult, BattleSetup, Simulation, build_registry,
};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::api::{BattleHandle, Result, RuntimeError};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, Topic};
use crate::workers::{BattleWorker, Command};

/// Main runtime that drives one battle on a background task.
///
/// [`BattleHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: BattleHandle,
    worker: JoinHandle<()>,
}

impl Runtime {
    /// Create a new runtime builder
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    /// Subscribe to events from one topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Wait for the battle to end, then shut the worker down.
    pub async fn join(self) -> Result<BattleResult> {
        let result = self.handle.wait_result().await?;
        self.shutdown().await?;
        Ok(result)
    }

    /// Shutdown the runtime gracefully
    pub async fn shutdown(self) -> Result<()> {
        // The worker may already be gone; joining below reports real failures.
        let _ = self.handle.shutdown().await;
        drop(self.handle);
        self.worker.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Runtime`] with flexible configuration.
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    battle_config: BattleConfig,
    setup: Option<BattleSetup>,
    registry: Option<Arc<AbilityRegistry>>,
    autostart: bool,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            battle_config: BattleConfig::default(),
            setup: None,
            registry: None,
            autostart: true,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Override battle rules
    pub fn battle_config(mut self, config: BattleConfig) -> Self {
        self.battle_config = config;
        self
    }

    /// Provide the battle to run
    pub fn setup(mut self, setup: BattleSetup) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Share an ability registry across runtimes. Defaults to the full catalog.
    pub fn registry(mut self, registry: Arc<AbilityRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Whether the worker starts stepping immediately (default: true).
    ///
    /// With autostart off, subscribe first and call [`BattleHandle::start`] so
    /// no event is missed.
    pub fn autostart(mut self, autostart: bool) -> Self {
        self.autostart = autostart;
        self
    }

    /// Load setup and battle rules for a named scenario from a data directory.
    pub fn scenario(mut self, factory: &ContentFactory, name: &str) -> Result<Self> {
        let (setup, config) = factory.load_battle(name)?;
        self.setup = Some(setup);
        self.battle_config = config;
        Ok(self)
    }

    /// Use one of the built-in scenarios.
    pub fn preset(mut self, name: &str) -> Result<Self> {
        self.setup = Some(presets::battle(name)?);
        self.battle_config = presets::default_config()?;
        Ok(self)
    }

    /// Initialize the battle and spawn its worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Result<Runtime> {
        if self.config.tick_ms == 0 {
            return Err(RuntimeError::ZeroTick);
        }
        let setup = self.setup.ok_or(RuntimeError::MissingSetup)?;
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(build_registry()));
        let sim = Simulation::initialize(&setup, registry, self.battle_config)
            .map_err(RuntimeError::Initialize)?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size.max(1));
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = BattleHandle::new(command_tx, event_bus.clone());

        let worker = BattleWorker::new(sim, self.config, command_rx, event_bus);
        let worker = tokio::spawn(worker.run(self.autostart));

        Ok(Runtime { handle, worker })
    }
}
