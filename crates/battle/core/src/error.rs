//! Error classification shared by the battle's error enums.
//!
//! Each concern raises its own enum next to the code that fails (`BoardError`
//! from the grid, `RosterError` from setup validation, `AbilityError` from
//! handlers, `SimulationError` from initialization, `SnapshotError` from
//! persistence). They all implement [`BattleError`], which tells the engine
//! whether a failure is skipped inside the tick or returned to the caller.

use crate::state::Position;

/// How a failure is handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The sub-effect is skipped and the tick goes on (fainted target, taken cell).
    Recoverable,
    /// Bad input rejected before the battle starts (roster, snapshot bytes).
    Validation,
    /// Handler or engine bug such as an off-board coordinate.
    Internal,
    /// The host lost the battle (worker crashed).
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Internal and fatal failures point at a defect and are logged loudly.
    pub const fn is_bug(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Where in the battle a handler fault happened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ErrorContext {
    /// Simulated milliseconds elapsed when the fault was raised.
    pub elapsed_ms: u64,
    /// Cell the failing computation produced, if any.
    pub position: Option<Position>,
}

impl ErrorContext {
    #[must_use]
    pub const fn at(elapsed_ms: u64) -> Self {
        Self {
            elapsed_ms,
            position: None,
        }
    }

    #[must_use]
    pub const fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }
}

/// Common trait for every battle error enum.
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable identifier used in logs, e.g. `BOARD_OUT_OF_BOUNDS`.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_internal_and_fatal_are_bugs() {
        assert!(!ErrorSeverity::Recoverable.is_bug());
        assert!(!ErrorSeverity::Validation.is_bug());
        assert!(ErrorSeverity::Internal.is_bug());
        assert!(ErrorSeverity::Fatal.is_bug());
        assert_eq!(ErrorSeverity::Validation.as_str(), "validation");
    }

    #[test]
    fn context_records_time_and_cell() {
        let ctx = ErrorContext::at(1500).with_position(Position::new(2, 4));
        assert_eq!(ctx.elapsed_ms, 1500);
        assert_eq!(ctx.position, Some(Position::new(2, 4)));
    }
}
