use chrono::{DateTime, Utc};
use thiserror::Error;

/// The unified error type for the aggregation and indicator core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A non-positive bucket duration, indicator window or RSI period.
    #[error("Invalid configuration: {parameter} must be positive, got {value}")]
    InvalidConfiguration {
        /// Name of the offending parameter (e.g. `duration_minutes`).
        parameter: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// An observation arrived with a timestamp earlier than the previous one.
    #[error("Out-of-order input: {got} precedes previously ingested {previous}")]
    OutOfOrderInput {
        /// Timestamp of the last ingested observation.
        previous: DateTime<Utc>,
        /// Timestamp of the rejected observation.
        got: DateTime<Utc>,
    },

    /// An observation failed validation (non-finite price, inverted range, ...).
    #[error("Malformed observation at {time}: {reason}")]
    MalformedObservation {
        /// Timestamp of the rejected observation.
        time: DateTime<Utc>,
        /// What was wrong with it.
        reason: String,
    },
}

impl EngineError {
    pub(crate) fn invalid(parameter: &'static str, value: i64) -> Self {
        Self::InvalidConfiguration { parameter, value }
    }
}

/// Shorthand for results produced by this crate's core.
pub type Result<T, E = EngineError> = std::result::Result<T, E>;
