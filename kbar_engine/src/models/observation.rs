//! Raw price/volume samples as supplied by a data source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single raw price/volume sample for one instrument.
///
/// Observations are consumed once, in time order, by the
/// [`BarAggregator`](crate::aggregator::BarAggregator). Well-formed input keeps
/// `low <= open, close <= high`; see [`crate::validation`] for the checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Sample timestamp (UTC).
    pub time: DateTime<Utc>,

    /// Opening price.
    pub open: f64,

    /// Highest price.
    pub high: f64,

    /// Lowest price.
    pub low: f64,

    /// Closing price.
    pub close: f64,

    /// Traded quantity. Never negative.
    pub volume: f64,

    /// Traded value. Not all sources supply this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl Observation {
    /// Builds an observation without an `amount`.
    pub fn new(
        time: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume,
            amount: None,
        }
    }

    /// Attaches a traded value to the observation.
    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }
}
