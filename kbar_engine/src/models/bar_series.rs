//! A finished set of aggregated bars for one instrument.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{bar::Bar, duration::BarDuration};

/// Represents the closed bars of one aggregation run.
///
/// Groups the [`Bar`]s with the symbol, [`BarDuration`] and anchor they were
/// produced with, so the data set is self-describing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    /// The instrument this data represents (e.g., "2330", "AAPL").
    pub symbol: String,
    /// Width of every bucket in the series.
    pub duration: BarDuration,
    /// Timestamp the bucket boundaries are aligned to.
    pub anchor: DateTime<Utc>,
    /// The closed bars, strictly increasing by `bucket_start`.
    pub bars: Vec<Bar>,
}

impl BarSeries {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn total_volume(&self) -> f64 {
        self.bars.iter().map(|b| b.volume).sum()
    }
}
