//! Cloneable façade for issuing commands to the battle worker.
//!
//! [`BattleHandle`] hides channel plumbing and offers async helpers for
//! controlling the battle, querying it, or streaming events from specific
//! topics.
use battle_core::{BattleResult, BattleSnapshot, BattleState};
use tokio::sync::{broadcast, mpsc, oneshot};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with a running battle
#[derive(Clone)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl BattleHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Start stepping the battle. Publishes `LifecycleEvent::Started` once.
    pub async fn start(&self) -> Result<()> {
        self.request(|reply| Command::Start { reply }).await
    }

    /// Hold the simulation clock. Queries keep working.
    pub async fn pause(&self) -> Result<()> {
        self.request(|reply| Command::Pause { reply }).await
    }

    /// End the battle now, dropping pending deferred effects.
    ///
    /// Returns the final result; stopping a finished battle is a no-op.
    pub async fn stop(&self) -> Result<Option<BattleResult>> {
        self.request(|reply| Command::Stop { reply }).await
    }

    /// Result of the battle, `None` while it is still running.
    pub async fn query_result(&self) -> Result<Option<BattleResult>> {
        self.request(|reply| Command::QueryResult { reply }).await
    }

    /// Query the current battle state (read-only copy)
    pub async fn query_state(&self) -> Result<BattleState> {
        self.request(|reply| Command::QueryState { reply }).await
    }

    /// Capture a replayable snapshot of the battle.
    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::QuerySnapshot { reply }).await
    }

    /// Wait until the battle finishes or is stopped.
    pub async fn wait_result(&self) -> Result<BattleResult> {
        self.request(|reply| Command::AwaitResult { reply }).await
    }

    /// Ask the worker to exit. Outstanding waiters are released with an error.
    pub async fn shutdown(&self) -> Result<()> {
        self.command_tx
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Battle` - Combat events stamped with simulated time
    /// - `Topic::Lifecycle` - Start, finish and stop notifications
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use runtime::Topic;
    ///
    /// let mut rx = handle.subscribe(Topic::Lifecycle);
    /// handle.start().await?;
    /// while let Ok(event) = rx.recv().await {
    ///     // Handle lifecycle events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
