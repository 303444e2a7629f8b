//! Canonical in-memory representation of an aggregated OHLCV bar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::observation::Observation;

/// One fixed-duration aggregation bucket.
///
/// A bar covers the half-open interval `[bucket_start, bucket_start + duration)`.
/// The duration itself lives on the owning
/// [`BarSeries`](crate::models::bar_series::BarSeries) or aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Lower bound of the bucket (UTC).
    pub bucket_start: DateTime<Utc>,

    /// Open of the first observation in the bucket.
    pub open: f64,

    /// Highest high of all observations in the bucket.
    pub high: f64,

    /// Lowest low of all observations in the bucket.
    pub low: f64,

    /// Close of the last observation in the bucket.
    pub close: f64,

    /// Sum of observation volumes.
    pub volume: f64,

    /// Sum of observation amounts, if any observation carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    /// Number of observations merged into this bar.
    pub observation_count: u64,
}

impl Bar {
    /// Opens a new bar seeded from its first observation.
    pub fn open_from(bucket_start: DateTime<Utc>, obs: &Observation) -> Self {
        Self {
            bucket_start,
            open: obs.open,
            high: obs.high,
            low: obs.low,
            close: obs.close,
            volume: obs.volume,
            amount: obs.amount,
            observation_count: 1,
        }
    }

    /// Folds a later observation from the same bucket into this bar.
    ///
    /// `open` is left untouched; it was fixed when the bar was opened.
    pub fn merge(&mut self, obs: &Observation) {
        self.high = self.high.max(obs.high);
        self.low = self.low.min(obs.low);
        self.close = obs.close;
        self.volume += obs.volume;
        self.amount = match (self.amount, obs.amount) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };
        self.observation_count += 1;
    }
}
