//! Battle worker that owns the authoritative [`Simulation`].
//!
//! Receives commands from [`BattleHandle`](crate::BattleHandle), advances the
//! battle at a fixed tick length, and publishes events to the EventBus.

use std::time::Duration;

use battle_core::{BattleResult, BattleSnapshot, BattleState, Simulation, Team};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::config::{Pace, RuntimeConfig};
use crate::events::{BattleTick, Event, EventBus, LifecycleEvent};

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Begin (or resume) stepping.
    Start { reply: oneshot::Sender<()> },
    /// Stop stepping without ending the battle.
    Pause { reply: oneshot::Sender<()> },
    /// End the battle now.
    Stop {
        reply: oneshot::Sender<Option<BattleResult>>,
    },
    QueryResult {
        reply: oneshot::Sender<Option<BattleResult>>,
    },
    QueryState { reply: oneshot::Sender<BattleState> },
    QuerySnapshot {
        reply: oneshot::Sender<BattleSnapshot>,
    },
    /// Replies once the battle has finished or been stopped.
    AwaitResult { reply: oneshot::Sender<BattleResult> },
    /// Exit the worker loop.
    Shutdown,
}

/// Background task that steps one battle.
pub struct BattleWorker {
    sim: Simulation,
    config: RuntimeConfig,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    running: bool,
    announced: bool,
    waiters: Vec<oneshot::Sender<BattleResult>>,
}

impl BattleWorker {
    pub fn new(
        sim: Simulation,
        config: RuntimeConfig,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            sim,
            config,
            command_rx,
            event_bus,
            running: false,
            announced: false,
            waiters: Vec::new(),
        }
    }

    /// Main worker loop.
    pub async fn run(mut self, autostart: bool) {
        let mut ticker = match self.config.pace {
            Pace::RealTime => {
                let mut ticker =
                    tokio::time::interval(Duration::from_millis(self.config.tick_ms as u64));
                ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                Some(ticker)
            }
            Pace::Unthrottled => None,
        };
        if autostart {
            self.start();
        }

        loop {
            let stepping = self.running && !self.sim.finished();
            tokio::select! {
                biased;
                cmd = self.command_rx.recv() => match cmd {
                    Some(Command::Shutdown) | None => break,
                    Some(cmd) => self.handle_command(cmd),
                },
                _ = next_tick(ticker.as_mut()), if stepping => self.step(),
            }
        }
        debug!(elapsed_ms = self.sim.elapsed_ms(), "battle worker exiting");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Start { reply } => {
                self.start();
                if reply.send(()).is_err() {
                    debug!("Start reply channel closed (caller dropped)");
                }
            }
            Command::Pause { reply } => {
                self.running = false;
                if reply.send(()).is_err() {
                    debug!("Pause reply channel closed (caller dropped)");
                }
            }
            Command::Stop { reply } => {
                let result = self.stop();
                if reply.send(result).is_err() {
                    debug!("Stop reply channel closed (caller dropped)");
                }
            }
            Command::QueryResult { reply } => {
                if reply.send(self.sim.result()).is_err() {
                    debug!("QueryResult reply channel closed (caller dropped)");
                }
            }
            Command::QueryState { reply } => {
                if reply.send(self.sim.state().clone()).is_err() {
                    debug!("QueryState reply channel closed (caller dropped)");
                }
            }
            Command::QuerySnapshot { reply } => {
                if reply.send(self.sim.snapshot()).is_err() {
                    debug!("QuerySnapshot reply channel closed (caller dropped)");
                }
            }
            Command::AwaitResult { reply } => match self.sim.result() {
                Some(result) => {
                    if reply.send(result).is_err() {
                        debug!("AwaitResult reply channel closed (caller dropped)");
                    }
                }
                None => self.waiters.push(reply),
            },
            Command::Shutdown => {}
        }
    }

    fn start(&mut self) {
        if !self.announced {
            self.announced = true;
            let state = self.sim.state();
            self.event_bus
                .publish(Event::Lifecycle(LifecycleEvent::Started {
                    seed: self.sim.rng().seed(),
                    weather: state.weather,
                    blue_units: state.live_count(Team::Blue),
                    red_units: state.live_count(Team::Red),
                }));
        }
        self.running = true;
    }

    fn step(&mut self) {
        self.sim.update(self.config.tick_ms);
        self.publish_events();
        if self.sim.finished() {
            if let Some(result) = self.sim.result() {
                info!(
                    winner = ?result.winner,
                    elapsed_ms = result.elapsed_ms,
                    survivors = result.survivors.len(),
                    "battle finished"
                );
                self.event_bus.publish(Event::Lifecycle(LifecycleEvent::Finished {
                    result: result.clone(),
                }));
                self.notify(result);
            }
        }
    }

    fn stop(&mut self) -> Option<BattleResult> {
        if self.sim.finished() {
            return self.sim.result();
        }
        self.sim.stop();
        self.running = false;
        self.publish_events();
        let result = self.sim.result();
        self.event_bus.publish(Event::Lifecycle(LifecycleEvent::Stopped {
            result: result.clone(),
        }));
        if let Some(result) = &result {
            self.notify(result.clone());
        }
        result
    }

    fn publish_events(&mut self) {
        let elapsed_ms = self.sim.elapsed_ms();
        for event in self.sim.drain_events() {
            self.event_bus
                .publish(Event::Battle(BattleTick { elapsed_ms, event }));
        }
    }

    fn notify(&mut self, result: BattleResult) {
        for waiter in self.waiters.drain(..) {
            if waiter.send(result.clone()).is_err() {
                debug!("AwaitResult reply channel closed (caller dropped)");
            }
        }
    }
}

async fn next_tick(ticker: Option<&mut Interval>) {
    match ticker {
        Some(ticker) => {
            ticker.tick().await;
        }
        None => tokio::task::yield_now().await,
    }
}
