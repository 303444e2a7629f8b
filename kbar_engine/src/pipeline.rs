//! End-to-end run: observations -> bars -> indicators.
//!
//! This is the glue a dashboard would otherwise hand-roll: apply the configured date
//! range, resolve the anchor, aggregate, then compute every requested indicator over
//! the closed bars. The result is a [`PipelineReport`] that serializes to JSON or
//! renders as a plain-text table.

use std::{fmt, path::Path};

use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::{
    aggregator::BarAggregator,
    config::PipelineConfig,
    indicators::{IndicatorSeries, WarmUpBoundary, compute_indicators},
    models::{bar_series::BarSeries, observation::Observation},
    source::{filter_range, load_observations_path},
    tz::to_rfc3339_secs,
};

/// Output of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    /// Observations that survived the date filter.
    pub observations_used: usize,
    pub series: BarSeries,
    /// Indicator label (`MA(10)`, `RSI(14)`) -> values aligned with `series.bars`.
    pub indicators: IndexMap<String, IndicatorSeries>,
}

impl PipelineReport {
    /// Per-indicator warm-up boundary, in indicator order.
    pub fn warm_up_boundaries(&self) -> IndexMap<&str, WarmUpBoundary> {
        self.indicators
            .iter()
            .map(|(label, s)| (label.as_str(), s.warm_up_boundary()))
            .collect()
    }
}

/// Run the pipeline over already-loaded observations.
///
/// Errors:
/// - bad time zone / range / anchor in `config`
/// - `OutOfOrderInput` from the aggregator
/// - `InvalidConfiguration` from an indicator request
pub fn run(config: &PipelineConfig, observations: Vec<Observation>) -> anyhow::Result<PipelineReport> {
    let total = observations.len();
    let observations = filter_range(observations, config.date_range()?);
    let anchor = config.anchor(observations.first().map(|o| o.time))?;

    let mut agg = BarAggregator::with_duration(anchor, config.aggregation.duration);
    for obs in &observations {
        agg.add_observation(obs)?;
    }
    let series = agg.into_series(config.symbol.clone());
    let indicators = compute_indicators(&series.bars, &config.indicators)?;

    info!(
        symbol = %series.symbol,
        duration = %series.duration,
        observations = total,
        kept = observations.len(),
        bars = series.len(),
        indicators = indicators.len(),
        "aggregation finished"
    );

    Ok(PipelineReport {
        observations_used: observations.len(),
        series,
        indicators,
    })
}

/// Load an observation file and run the pipeline over it.
pub fn run_path(config: &PipelineConfig, input: impl AsRef<Path>) -> anyhow::Result<PipelineReport> {
    let observations = load_observations_path(input, config.time_context()?)?;
    run(config, observations)
}

fn cell(v: Option<f64>) -> String {
    v.map_or_else(|| "-".to_string(), |v| format!("{v:.2}"))
}

/// Plain-text table: one row per bar, one extra column per indicator.
impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} {} ({} bars from {} observations)",
            self.series.symbol,
            self.series.duration,
            self.series.len(),
            self.observations_used
        )?;

        write!(
            f,
            "{:<20} {:>10} {:>10} {:>10} {:>10} {:>14}",
            "bucket_start", "open", "high", "low", "close", "volume"
        )?;
        for label in self.indicators.keys() {
            write!(f, " {label:>10}")?;
        }
        writeln!(f)?;

        for (i, bar) in self.series.bars.iter().enumerate() {
            write!(
                f,
                "{:<20} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>14.0}",
                to_rfc3339_secs(bar.bucket_start),
                bar.open,
                bar.high,
                bar.low,
                bar.close,
                bar.volume
            )?;
            for series in self.indicators.values() {
                write!(f, " {:>10}", cell(series.get(i)))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
