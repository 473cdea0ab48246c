//! Error types for Carbon Box core systems.

/// Timer-specific errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimerError {
    /// The timer ID is invalid or the timer has already fired or been stopped.
    #[error("Invalid or expired timer ID")]
    InvalidTimerId,
}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, TimerError>;
