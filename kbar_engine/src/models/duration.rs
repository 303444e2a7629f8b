//! Bucket durations for bar aggregation.
//!
//! A [`BarDuration`] is a positive whole number of minutes. Callers usually pick one of
//! the presets ([`BarDuration::DAY`], [`BarDuration::WEEK`], [`BarDuration::MONTH`]), but
//! any positive minute count is valid. A "month" is a fixed 30 days; buckets are
//! anchored arithmetically, not on the calendar.
//!
//! Typical usage:
//! ```
//! use kbar_engine::models::duration::BarDuration;
//!
//! let d: BarDuration = "1W".parse().unwrap();
//! assert_eq!(d, BarDuration::WEEK);
//! assert_eq!(d.minutes(), 10080);
//! assert_eq!(BarDuration::from_minutes(90).unwrap().to_string(), "90m");
//! ```

use std::{fmt, num::NonZeroU32, str::FromStr};

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};

use crate::errors::{EngineError, Result};

pub const MINUTES_PER_HOUR: u32 = 60;
pub const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;
pub const MINUTES_PER_WEEK: u32 = 7 * MINUTES_PER_DAY;
pub const MINUTES_PER_MONTH: u32 = 30 * MINUTES_PER_DAY;

const fn nz(n: u32) -> NonZeroU32 {
    match NonZeroU32::new(n) {
        Some(nz) => nz,
        None => panic!("zero duration constant"),
    }
}

/// Width of one aggregation bucket, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DurationRepr", into = "String")]
pub struct BarDuration {
    minutes: NonZeroU32,
}

impl BarDuration {
    /// One calendar day (1440 minutes).
    pub const DAY: Self = Self { minutes: nz(MINUTES_PER_DAY) };
    /// One week (10080 minutes).
    pub const WEEK: Self = Self { minutes: nz(MINUTES_PER_WEEK) };
    /// Thirty days (43200 minutes).
    pub const MONTH: Self = Self { minutes: nz(MINUTES_PER_MONTH) };

    /// Validates a caller-supplied minute count.
    ///
    /// Errors:
    /// - [`EngineError::InvalidConfiguration`] when `minutes <= 0` or it does not fit in `u32`.
    pub fn from_minutes(minutes: i64) -> Result<Self> {
        u32::try_from(minutes)
            .ok()
            .and_then(NonZeroU32::new)
            .map(|minutes| Self { minutes })
            .ok_or(EngineError::InvalidConfiguration {
                parameter: "duration_minutes",
                value: minutes,
            })
    }

    pub const fn minutes(&self) -> u32 {
        self.minutes.get()
    }

    /// Bucket width in seconds.
    pub const fn seconds(&self) -> i64 {
        self.minutes.get() as i64 * 60
    }
}

/// Display/parse for CLI and config ergonomics (`"5m"`, `"4h"`, `"1D"`, `"1W"`, `"1M"`).
///
/// Display picks the largest unit that divides the duration exactly.
impl fmt::Display for BarDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.minutes();
        let (amount, unit) = if m % MINUTES_PER_MONTH == 0 {
            (m / MINUTES_PER_MONTH, "M")
        } else if m % MINUTES_PER_WEEK == 0 {
            (m / MINUTES_PER_WEEK, "W")
        } else if m % MINUTES_PER_DAY == 0 {
            (m / MINUTES_PER_DAY, "D")
        } else if m % MINUTES_PER_HOUR == 0 {
            (m / MINUTES_PER_HOUR, "h")
        } else {
            (m, "m")
        };
        write!(f, "{amount}{unit}")
    }
}

impl FromStr for BarDuration {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_ascii_lowercase().as_str() {
            "" => bail!("empty duration"),
            "day" | "daily" => return Ok(Self::DAY),
            "week" | "weekly" => return Ok(Self::WEEK),
            "month" | "monthly" => return Ok(Self::MONTH),
            _ => {}
        }
        // bare minute count, e.g. "1440"
        if let Ok(minutes) = s.parse::<i64>() {
            return Ok(Self::from_minutes(minutes)?);
        }
        let Some((split, _)) = s.char_indices().last() else {
            bail!("empty duration");
        };
        let (digits, unit) = s.split_at(split);
        let amount: i64 = digits
            .parse()
            .map_err(|_| anyhow!("bad duration amount in {s:?}"))?;
        let per_unit = match unit {
            "m" => 1,
            "h" => MINUTES_PER_HOUR,
            "D" | "d" => MINUTES_PER_DAY,
            "W" | "w" => MINUTES_PER_WEEK,
            "M" => MINUTES_PER_MONTH,
            _ => bail!("unknown duration unit: {unit}"),
        };
        let minutes = amount
            .checked_mul(per_unit as i64)
            .ok_or_else(|| anyhow!("duration {s:?} overflows"))?;
        Ok(Self::from_minutes(minutes)?)
    }
}

/// Wire form accepted in config files: a minute count or a compact string.
#[derive(Deserialize)]
#[serde(untagged)]
enum DurationRepr {
    Minutes(i64),
    Text(String),
}

impl TryFrom<DurationRepr> for BarDuration {
    type Error = String;

    fn try_from(repr: DurationRepr) -> std::result::Result<Self, Self::Error> {
        match repr {
            DurationRepr::Minutes(m) => Self::from_minutes(m).map_err(|e| e.to_string()),
            DurationRepr::Text(s) => s.parse().map_err(|e: anyhow::Error| e.to_string()),
        }
    }
}

impl From<BarDuration> for String {
    fn from(d: BarDuration) -> Self {
        d.to_string()
    }
}
