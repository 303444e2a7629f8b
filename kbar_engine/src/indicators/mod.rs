//! Rolling technical indicators over a bar sequence.
//!
//! Every indicator takes a slice of [`PriceBar`] items, so it works on aggregated
//! [`Bar`]s as well as on raw [`Observation`]s treated as bars. All functions are pure
//! and O(n) in the number of bars.
//!
//! Results are [`IndicatorSeries`]: one value per input bar, `None` during warm-up.

pub mod moving_average;
mod rolling;
pub mod rsi;
pub mod warmup;

use std::{fmt, ops::Range};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub use moving_average::moving_average;
pub use rsi::rsi;
pub use warmup::{WarmUpBoundary, warm_up_boundary};

use crate::{
    errors::Result,
    models::{bar::Bar, observation::Observation},
};

/// Anything with a closing price can feed an indicator.
pub trait PriceBar {
    fn close(&self) -> f64;
}

impl PriceBar for Bar {
    fn close(&self) -> f64 {
        self.close
    }
}

impl PriceBar for Observation {
    fn close(&self) -> f64 {
        self.close
    }
}

impl PriceBar for f64 {
    fn close(&self) -> f64 {
        *self
    }
}

/// Indicator values aligned one-to-one with the bars they were computed over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    values: Vec<Option<f64>>,
    warm_up_index: usize,
}

impl IndicatorSeries {
    /// `warm_up_index` is the arithmetic first-defined index of the indicator.
    pub(crate) fn new(values: Vec<Option<f64>>, warm_up_index: usize) -> Self {
        warmup::check_consistency(&values, warm_up_index);
        Self {
            values,
            warm_up_index,
        }
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Index of the first defined value.
    ///
    /// May be `>= len()` when the series is too short to ever become defined.
    pub fn warm_up_index(&self) -> usize {
        self.warm_up_index
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`, `None` if undefined or out of bounds.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    /// Range of indices holding defined values, for slicing the parallel time axis.
    pub fn defined_range(&self) -> Option<Range<usize>> {
        (self.warm_up_index < self.values.len()).then(|| self.warm_up_index..self.values.len())
    }

    /// `(index, value)` pairs of the defined part of the series.
    pub fn defined(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
    }

    pub fn warm_up_boundary(&self) -> WarmUpBoundary {
        warm_up_boundary(self)
    }
}

/// One indicator a presentation layer asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IndicatorRequest {
    /// Simple moving average of closes over `window` bars.
    Ma { window: usize },
    /// Relative strength index over `period` price changes.
    Rsi { period: usize },
}

impl IndicatorRequest {
    pub fn label(&self) -> String {
        self.to_string()
    }

    pub fn compute<B: PriceBar>(&self, bars: &[B]) -> Result<IndicatorSeries> {
        match *self {
            IndicatorRequest::Ma { window } => moving_average(bars, window),
            IndicatorRequest::Rsi { period } => rsi(bars, period),
        }
    }

    /// Checks the window/period without computing anything.
    pub fn validate(&self) -> Result<()> {
        let empty: [f64; 0] = [];
        self.compute(&empty).map(|_| ())
    }
}

impl fmt::Display for IndicatorRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorRequest::Ma { window } => write!(f, "MA({window})"),
            IndicatorRequest::Rsi { period } => write!(f, "RSI({period})"),
        }
    }
}

/// Compute several indicators over the same bars, keyed by label in request order.
///
/// A repeated request keeps its first position.
pub fn compute_indicators<B: PriceBar>(
    bars: &[B],
    requests: &[IndicatorRequest],
) -> Result<IndexMap<String, IndicatorSeries>> {
    let mut out = IndexMap::with_capacity(requests.len());
    for req in requests {
        out.insert(req.label(), req.compute(bars)?);
    }
    Ok(out)
}
