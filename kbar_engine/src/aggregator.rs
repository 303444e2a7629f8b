//! Fixed-duration OHLCV bar aggregation.
//!
//! ## What this does
//! - Consumes [`Observation`]s in non-decreasing time order.
//! - Assigns each one to the anchor-aligned bucket covering its timestamp
//!   (see [`crate::bucket`]).
//! - Keeps at most one **open** bar; it is **closed** (appended to the closed
//!   sequence) when an observation from a later bucket arrives, or on
//!   [`BarAggregator::finalize`].
//!
//! Buckets without observations produce no bar. Gaps in time are gaps in the output.
//!
//! ## Example
//! ```
//! use chrono::{TimeZone, Utc};
//! use kbar_engine::aggregator::{BarAggregator, Ingest};
//! use kbar_engine::models::observation::Observation;
//!
//! let anchor = Utc.with_ymd_and_hms(2022, 1, 3, 9, 0, 0).unwrap();
//! let mut agg = BarAggregator::new(anchor, 5).unwrap();
//!
//! let obs = Observation::new(anchor, 10.0, 10.0, 10.0, 10.0, 1.0);
//! assert_eq!(agg.add_observation(&obs).unwrap(), Ingest::Opened);
//! agg.finalize();
//! assert_eq!(agg.closed_bars().len(), 1);
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    bucket,
    errors::{EngineError, Result},
    models::{bar::Bar, bar_series::BarSeries, duration::BarDuration, observation::Observation},
};

/// What a call to [`BarAggregator::add_observation`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ingest {
    /// The first bar was opened; nothing was closed.
    Opened,
    /// The previous open bar was closed and a new bar opened for this observation.
    Closed,
    /// The observation was merged into the open bar.
    Merged,
}

impl Ingest {
    /// True when this call made a newly finished bar available.
    pub fn closed_prior_bar(self) -> bool {
        matches!(self, Ingest::Closed)
    }
}

#[derive(Debug, Clone)]
struct OpenBar {
    index: i64,
    bar: Bar,
}

/// Re-buckets a time-ordered observation stream into fixed-duration bars.
///
/// Not thread-safe for concurrent mutation: all ingesting methods take `&mut self`.
#[derive(Debug, Clone)]
pub struct BarAggregator {
    anchor: DateTime<Utc>,
    duration: BarDuration,
    open: Option<OpenBar>,
    closed: Vec<Bar>,
    last_time: Option<DateTime<Utc>>,
}

impl BarAggregator {
    /// Create an aggregator with no open bar and no closed bars.
    ///
    /// Errors:
    /// - [`EngineError::InvalidConfiguration`] if `duration_minutes <= 0`.
    pub fn new(anchor: DateTime<Utc>, duration_minutes: i64) -> Result<Self> {
        Ok(Self::with_duration(anchor, BarDuration::from_minutes(duration_minutes)?))
    }

    /// Create an aggregator from an already validated duration.
    pub fn with_duration(anchor: DateTime<Utc>, duration: BarDuration) -> Self {
        Self {
            anchor,
            duration,
            open: None,
            closed: Vec::new(),
            last_time: None,
        }
    }

    /// Ingest one observation.
    ///
    /// Errors:
    /// - [`EngineError::OutOfOrderInput`] if `obs.time` precedes the previously ingested
    ///   observation. State is left untouched in that case.
    pub fn add_observation(&mut self, obs: &Observation) -> Result<Ingest> {
        if let Some(previous) = self.last_time {
            if obs.time < previous {
                return Err(EngineError::OutOfOrderInput {
                    previous,
                    got: obs.time,
                });
            }
        }
        self.last_time = Some(obs.time);

        let index = bucket::bucket_index(obs.time, self.anchor, self.duration);
        if let Some(open) = self.open.as_mut().filter(|o| o.index == index) {
            open.bar.merge(obs);
            return Ok(Ingest::Merged);
        }

        let closed_any = self.close_open_bar();
        let start = bucket::bucket_start(index, self.anchor, self.duration);
        self.open = Some(OpenBar {
            index,
            bar: Bar::open_from(start, obs),
        });
        Ok(if closed_any { Ingest::Closed } else { Ingest::Opened })
    }

    /// Close the open bar, if any. Calling it again is a no-op.
    pub fn finalize(&mut self) {
        self.close_open_bar();
    }

    /// Bars closed so far, strictly increasing by `bucket_start`.
    ///
    /// Never includes the in-progress bar; see [`BarAggregator::open_bar`].
    pub fn closed_bars(&self) -> &[Bar] {
        &self.closed
    }

    /// The bar still accepting observations, if any.
    pub fn open_bar(&self) -> Option<&Bar> {
        self.open.as_ref().map(|o| &o.bar)
    }

    /// Finalize and package the closed bars as a self-describing series.
    pub fn into_series(mut self, symbol: impl Into<String>) -> BarSeries {
        self.finalize();
        BarSeries {
            symbol: symbol.into(),
            duration: self.duration,
            anchor: self.anchor,
            bars: self.closed,
        }
    }

    fn close_open_bar(&mut self) -> bool {
        match self.open.take() {
            Some(OpenBar { bar, .. }) => {
                debug!(
                    bucket_start = %bar.bucket_start,
                    observations = bar.observation_count,
                    volume = bar.volume,
                    "closed bar"
                );
                self.closed.push(bar);
                true
            }
            None => false,
        }
    }
}

/// One-shot helper: aggregate a complete observation slice and finalize.
///
/// Errors:
/// - [`EngineError::InvalidConfiguration`] for a non-positive duration.
/// - [`EngineError::OutOfOrderInput`] on the first out-of-order observation.
pub fn aggregate(
    observations: &[Observation],
    anchor: DateTime<Utc>,
    duration_minutes: i64,
) -> Result<Vec<Bar>> {
    let mut agg = BarAggregator::new(anchor, duration_minutes)?;
    for obs in observations {
        agg.add_observation(obs)?;
    }
    agg.finalize();
    Ok(agg.closed)
}
