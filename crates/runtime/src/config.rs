//! Runtime configuration.

/// How the worker paces simulation ticks against wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pace {
    /// One tick per `tick_ms` of real time.
    #[default]
    RealTime,
    /// Step as fast as commands allow. Used for headless resolution and tests.
    Unthrottled,
}

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Simulated milliseconds advanced per tick.
    pub tick_ms: u32,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
    pub pace: Pace,
}

impl RuntimeConfig {
    pub const DEFAULT_TICK_MS: u32 = 16;

    /// Unthrottled configuration with the default tick length.
    pub fn headless() -> Self {
        Self {
            pace: Pace::Unthrottled,
            ..Self::default()
        }
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            tick_ms: Self::DEFAULT_TICK_MS,
            event_buffer_size: 1024,
            command_buffer_size: 32,
            pace: Pace::RealTime,
        }
    }
}
