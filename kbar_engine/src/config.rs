//! Pipeline configuration: parsing, normalization, and loading.
//!
//! A TOML file describes one aggregation run:
//! - which instrument and exchange time zone the observation file belongs to
//! - an optional inclusive date range to keep
//! - the bucket duration and anchor
//! - the indicators to compute over the resulting bars
//!
//! ```toml
//! symbol = "2330"
//! timezone = "Asia/Taipei"
//!
//! [range]
//! start = "2022-01-03"
//! end = "2022-11-18"
//!
//! [aggregation]
//! duration = "1D"
//!
//! [[indicators]]
//! kind = "ma"
//! window = 10
//! ```
//!
//! Entrypoints:
//! - Parse + normalize from a TOML string: [`load_config_str`]
//! - Parse + normalize from a file path: [`load_config_path`]

use std::{collections::HashSet, path::Path};

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    indicators::IndicatorRequest,
    models::duration::BarDuration,
    source::{DateRange, TimeContext},
    tz::{self, DstPolicy},
};

fn default_symbol() -> String {
    "UNKNOWN".to_string()
}

/// Top-level description of one aggregation run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Instrument code carried into the output series.
    #[serde(default = "default_symbol")]
    pub symbol: String,
    /// IANA zone for naive timestamps; UTC when absent.
    #[serde(default)]
    pub timezone: Option<String>,
    /// How naive timestamps falling into DST transitions are resolved.
    #[serde(default)]
    pub dst_policy: DstPolicy,
    /// Inclusive window of observations to keep.
    #[serde(default)]
    pub range: Option<RangeCfg>,
    pub aggregation: AggregationCfg,
    /// Indicators to compute, in output order.
    #[serde(default)]
    pub indicators: Vec<IndicatorRequest>,
}

/// Date filter bounds, as written by the user.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RangeCfg {
    pub start: Option<String>,
    pub end: Option<String>,
}

/// Bucket settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AggregationCfg {
    /// Minutes (integer) or a compact duration string such as `"1D"`.
    pub duration: BarDuration,
    /// Anchor timestamp; defaults to local midnight of the first kept observation.
    #[serde(default)]
    pub anchor: Option<String>,
}

impl PipelineConfig {
    /// Minimal config: given duration, UTC, no indicators.
    pub fn new(duration: BarDuration) -> Self {
        Self {
            symbol: default_symbol(),
            timezone: None,
            dst_policy: DstPolicy::default(),
            range: None,
            aggregation: AggregationCfg {
                duration,
                anchor: None,
            },
            indicators: Vec::new(),
        }
    }

    pub fn time_context(&self) -> anyhow::Result<TimeContext> {
        let tz = match &self.timezone {
            Some(name) => tz::parse_tz(name)?,
            None => chrono_tz::UTC,
        };
        Ok(TimeContext {
            tz,
            dst_policy: self.dst_policy,
        })
    }

    pub fn date_range(&self) -> anyhow::Result<DateRange> {
        let ctx = self.time_context()?;
        match &self.range {
            Some(r) => DateRange::parse(r.start.as_deref(), r.end.as_deref(), ctx),
            None => Ok(DateRange::default()),
        }
    }

    /// Resolve the bucket anchor.
    ///
    /// Uses the configured anchor if any, else local midnight of `first`, else the Unix epoch.
    pub fn anchor(&self, first: Option<DateTime<Utc>>) -> anyhow::Result<DateTime<Utc>> {
        let ctx = self.time_context()?;
        match (&self.aggregation.anchor, first) {
            (Some(s), _) => tz::parse_timestamp(s, ctx.tz, ctx.dst_policy).context("aggregation.anchor"),
            (None, Some(t)) => tz::local_midnight(t, ctx.tz, ctx.dst_policy),
            (None, None) => Ok(DateTime::<Utc>::UNIX_EPOCH),
        }
    }
}

/// Summary of changes performed during normalization.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct NormalizationReport {
    /// Whether the symbol had surrounding whitespace removed.
    pub symbol_trimmed: bool,
    /// Count of removed duplicate indicator requests.
    pub indicators_deduped: usize,
}

/// Normalize and validate a config in place.
///
/// - Trim the symbol; reject an empty one
/// - Check the time zone, range and anchor parse
/// - Reject zero indicator windows/periods
/// - Drop repeated indicator requests, keeping the first occurrence
pub fn normalize_config(cfg: &mut PipelineConfig) -> anyhow::Result<NormalizationReport> {
    let mut report = NormalizationReport::default();

    let trimmed = cfg.symbol.trim();
    if trimmed.is_empty() {
        bail!("symbol cannot be empty after trimming");
    }
    if trimmed != cfg.symbol {
        cfg.symbol = trimmed.to_string();
        report.symbol_trimmed = true;
    }

    cfg.time_context().context("timezone")?;
    cfg.date_range().context("range")?;
    if cfg.aggregation.anchor.is_some() {
        cfg.anchor(None)?;
    }

    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(cfg.indicators.len());
    for req in std::mem::take(&mut cfg.indicators) {
        req.validate().with_context(|| format!("indicator {req}"))?;
        if seen.insert(req) {
            kept.push(req);
        } else {
            report.indicators_deduped += 1;
        }
    }
    cfg.indicators = kept;

    if report.indicators_deduped > 0 {
        warn!(dropped = report.indicators_deduped, "duplicate indicator requests ignored");
    }
    Ok(report)
}

/// Parse + normalize a config from a TOML string.
pub fn load_config_str(s: &str) -> anyhow::Result<PipelineConfig> {
    let mut cfg: PipelineConfig = toml::from_str(s).context("parsing pipeline TOML")?;
    normalize_config(&mut cfg)?;
    Ok(cfg)
}

/// Read + parse + normalize a config file.
pub fn load_config_path(path: impl AsRef<Path>) -> anyhow::Result<PipelineConfig> {
    let path = path.as_ref();
    let s = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    load_config_str(&s).with_context(|| format!("loading {}", path.display()))
}
