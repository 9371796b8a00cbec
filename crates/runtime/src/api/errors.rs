//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from battle setup and worker coordination so clients can
//! bubble them up with consistent context.
use battle_core::{BattleError, ErrorSeverity, SimulationError};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("runtime requires a battle setup before building")]
    MissingSetup,

    #[error("failed to initialize battle")]
    Initialize(#[source] SimulationError),

    #[error("battle worker command channel closed")]
    CommandChannelClosed,

    #[error("battle worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("battle worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error("tick length must be positive")]
    ZeroTick,

    #[error(transparent)]
    Content(#[from] anyhow::Error),
}

impl BattleError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingSetup | Self::ZeroTick | Self::Content(_) => ErrorSeverity::Validation,
            Self::Initialize(err) => err.severity(),
            Self::CommandChannelClosed | Self::ReplyChannelClosed(_) => ErrorSeverity::Recoverable,
            Self::WorkerJoin(_) => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingSetup => "RUNTIME_MISSING_SETUP",
            Self::Initialize(_) => "RUNTIME_INITIALIZE",
            Self::CommandChannelClosed => "RUNTIME_COMMAND_CLOSED",
            Self::ReplyChannelClosed(_) => "RUNTIME_REPLY_CLOSED",
            Self::WorkerJoin(_) => "RUNTIME_WORKER_JOIN",
            Self::ZeroTick => "RUNTIME_ZERO_TICK",
            Self::Content(_) => "RUNTIME_CONTENT",
        }
    }
}
