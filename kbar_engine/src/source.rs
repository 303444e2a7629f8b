//! Loading observations from a JSON price-history file.
//!
//! The file is a JSON array of rows:
//!
//! ```json
//! [
//!   {"time": "2022-01-03 09:00:00", "open": 10, "high": 12, "low": 9, "close": 11, "volume": 5},
//!   {"time": "2022-01-03T09:01:00+08:00", "open": 11, "high": 11, "low": 10, "close": 10,
//!    "volume": 3, "amount": 31.5}
//! ]
//! ```
//!
//! Naive timestamps are read in the configured exchange time zone (see [`crate::tz`]).
//! Extra columns are ignored. Rows are validated but never reordered; ordering
//! problems surface from the aggregator as `OutOfOrderInput`.

use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::{info, warn};

use crate::{
    models::observation::Observation,
    tz::{self, DstPolicy},
    validation::validate_observation,
};

/// How to interpret timestamps without an explicit offset.
#[derive(Debug, Clone, Copy)]
pub struct TimeContext {
    pub tz: Tz,
    pub dst_policy: DstPolicy,
}

impl Default for TimeContext {
    fn default() -> Self {
        Self {
            tz: chrono_tz::UTC,
            dst_policy: DstPolicy::Strict,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawObservation {
    time: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
    #[serde(default)]
    amount: Option<f64>,
}

/// Parse and validate observations from a JSON string.
pub fn parse_observations_json(s: &str, ctx: TimeContext) -> anyhow::Result<Vec<Observation>> {
    let rows: Vec<RawObservation> = serde_json::from_str(s).context("observation file is not a JSON array of rows")?;

    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let time = tz::parse_timestamp(&row.time, ctx.tz, ctx.dst_policy)
                .with_context(|| format!("row {i}: bad time"))?;
            let obs = Observation {
                time,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
                amount: row.amount,
            };
            validate_observation(&obs).with_context(|| format!("row {i}"))?;
            Ok(obs)
        })
        .collect()
}

/// Read, parse and validate an observation file.
pub fn load_observations_path(path: impl AsRef<Path>, ctx: TimeContext) -> anyhow::Result<Vec<Observation>> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let observations =
        parse_observations_json(&s, ctx).with_context(|| format!("parsing {}", path.display()))?;
    info!(path = %path.display(), rows = observations.len(), "loaded observations");
    Ok(observations)
}

/// Inclusive time window used to select part of a price history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl DateRange {
    /// Build a range from user strings.
    ///
    /// A date-only `end` covers that whole local day, up to 23:59:59.999999999. A plain
    /// `time <= end` against midnight of that date would drop the last day's intraday
    /// rows; this range deliberately keeps them.
    pub fn parse(start: Option<&str>, end: Option<&str>, ctx: TimeContext) -> anyhow::Result<Self> {
        let start = start
            .map(|s| tz::parse_timestamp(s, ctx.tz, ctx.dst_policy))
            .transpose()
            .context("range start")?;
        let end = end.map(|s| parse_end(s, ctx)).transpose().context("range end")?;
        if let (Some(s), Some(e)) = (start, end) {
            anyhow::ensure!(s <= e, "range start {s} is after end {e}");
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.start.is_none_or(|s| t >= s) && self.end.is_none_or(|e| t <= e)
    }
}

fn parse_end(s: &str, ctx: TimeContext) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(date) = chrono::NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        let last = NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).context("end of day")?;
        return tz::from_local_naive(date.and_time(last), ctx.tz, ctx.dst_policy);
    }
    tz::parse_timestamp(s, ctx.tz, ctx.dst_policy)
}

/// Keep the observations inside `range`, preserving order.
pub fn filter_range(observations: Vec<Observation>, range: DateRange) -> Vec<Observation> {
    let before = observations.len();
    let kept: Vec<Observation> = observations.into_iter().filter(|o| range.contains(o.time)).collect();
    if kept.is_empty() && before > 0 {
        warn!(before, ?range, "date range excludes every observation");
    }
    kept
}
