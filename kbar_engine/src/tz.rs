//! Timestamp parsing at the data-source edge.
//!
//! Observation files and config values carry timestamps either as RFC-3339 strings with
//! an explicit offset, or as naive local wall-clock times (`2022-01-03 09:00:00`,
//! `2022-01-03`) meant in the instrument's exchange time zone. Everything past this
//! module is UTC.
//!
//! - [`parse_timestamp`]: any of the accepted forms -> UTC.
//! - [`from_local_naive`]: naive local time + IANA zone -> UTC under a [`DstPolicy`].
//!
//! Notes:
//! - Ambiguous local times happen during "fall back" when a wall time occurs twice.
//! - Nonexistent local times happen during "spring forward" when a wall time is skipped.
//!
//! Example: "2022-01-03 09:00:00" in Asia/Taipei -> "2022-01-03T01:00:00Z".

use anyhow::{Context, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Policy for handling DST edge cases when converting local naive timestamps to UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DstPolicy {
    /// Error on ambiguous (fall-back) or nonexistent (spring-forward) local times.
    #[default]
    Strict,
    /// For ambiguous local times, pick the earlier instant.
    PreferEarliest,
    /// For ambiguous local times, pick the later instant.
    PreferLatest,
    /// For nonexistent local times, step forward minute by minute (max 2 hours).
    ShiftForward,
}

/// Convert a naive local timestamp to UTC in `tz` under `policy`.
///
/// Errors:
/// - the time is ambiguous or nonexistent and `policy` does not resolve it.
pub fn from_local_naive(naive: NaiveDateTime, tz: Tz, policy: DstPolicy) -> anyhow::Result<DateTime<Utc>> {
    use chrono::offset::LocalResult::*;
    match tz.from_local_datetime(&naive) {
        Single(dt) => Ok(dt.with_timezone(&Utc)),
        Ambiguous(a, b) => match policy {
            DstPolicy::PreferEarliest => Ok(a.with_timezone(&Utc)),
            DstPolicy::PreferLatest => Ok(b.with_timezone(&Utc)),
            _ => Err(anyhow!("ambiguous local time {naive} in {tz}")),
        },
        None => match policy {
            DstPolicy::ShiftForward => {
                let mut t = naive;
                for _ in 0..120 {
                    t += chrono::Duration::minutes(1);
                    if let Single(dt) = tz.from_local_datetime(&t) {
                        return Ok(dt.with_timezone(&Utc));
                    }
                }
                Err(anyhow!("nonexistent local time {naive} in {tz}"))
            }
            _ => Err(anyhow!("nonexistent local time {naive} in {tz}")),
        },
    }
}

/// Parse a naive wall-clock string (date with optional time of day).
pub fn parse_naive(s: &str) -> anyhow::Result<NaiveDateTime> {
    let s = s.trim();
    for fmt in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("unrecognised timestamp: {s:?}"))?;
    Ok(date.and_time(chrono::NaiveTime::MIN))
}

/// Parse an RFC-3339 string, or a naive local time interpreted in `tz`.
pub fn parse_timestamp(s: &str, tz: Tz, policy: DstPolicy) -> anyhow::Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s.trim()) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = parse_naive(s)?;
    from_local_naive(naive, tz, policy)
}

/// Parse an IANA zone name (e.g., "Asia/Taipei").
pub fn parse_tz(name: &str) -> anyhow::Result<Tz> {
    name.trim()
        .parse()
        .map_err(|e| anyhow!("bad tz {name:?}: {e}"))
}

/// Midnight of `ts`'s local date in `tz`, as UTC.
pub fn local_midnight(ts: DateTime<Utc>, tz: Tz, policy: DstPolicy) -> anyhow::Result<DateTime<Utc>> {
    let local_date = ts.with_timezone(&tz).date_naive();
    from_local_naive(local_date.and_time(chrono::NaiveTime::MIN), tz, policy)
}

/// Format a UTC datetime as an RFC-3339 string with second precision.
pub fn to_rfc3339_secs(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
