//! Error types for the select box widget.

use carbon_box_core::TimerError;

/// Result type alias for widget operations.
pub type Result<T> = std::result::Result<T, CarbonError>;

/// Errors that can occur while mounting or configuring a select box.
///
/// None of these are fatal to the host: they are reported through
/// `tracing` and the affected widget instance degrades gracefully.
#[derive(Debug, thiserror::Error)]
pub enum CarbonError {
    /// The source control is not a list control.
    #[error("the selected element is not a select (found `{kind}`)")]
    InvalidSource { kind: String },

    /// A source child is neither an option nor an option group.
    #[error("couldn't render child {position}: `{tag}` is not an `option` or `optgroup`")]
    MalformedEntry { position: usize, tag: String },

    /// A configuration value is out of range.
    #[error("invalid value for option '{field}': {message}")]
    InvalidConfig { field: &'static str, message: String },

    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Timer bookkeeping error.
    #[error("timer error: {0}")]
    Timer(#[from] TimerError),
}

impl CarbonError {
    /// Create an invalid-source error.
    pub fn invalid_source(kind: impl Into<String>) -> Self {
        Self::InvalidSource { kind: kind.into() }
    }

    /// Create a malformed-entry error.
    pub fn malformed_entry(position: usize, tag: impl Into<String>) -> Self {
        Self::MalformedEntry {
            position,
            tag: tag.into(),
        }
    }

    /// Create a configuration error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }
}
