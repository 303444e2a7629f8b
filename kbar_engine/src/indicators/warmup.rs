//! Warm-up bookkeeping for indicator series.
//!
//! Each indicator knows its warm-up length arithmetically (`window - 1` for a moving
//! average, `period` for RSI). A consumer slicing a chart only needs to know where the
//! leading undefined run ends; [`warm_up_boundary`] answers that without risking an
//! out-of-bounds index on short series.

use serde::Serialize;
use tracing::error;

use crate::indicators::IndicatorSeries;

/// Where the leading undefined run of a series ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "index")]
pub enum WarmUpBoundary {
    /// The first value is already defined.
    NoWarmUp,
    /// Index of the last undefined value; values after it are defined.
    LastUndefined(usize),
    /// The series has no defined value at all (empty, or window >= bar count).
    NoValidRange,
}

/// Index of the last leading undefined value, i.e. `warm_up_index - 1`.
pub fn warm_up_boundary(series: &IndicatorSeries) -> WarmUpBoundary {
    let w = series.warm_up_index();
    if w >= series.len() {
        WarmUpBoundary::NoValidRange
    } else if w == 0 {
        WarmUpBoundary::NoWarmUp
    } else {
        WarmUpBoundary::LastUndefined(w - 1)
    }
}

/// First defined index found by scanning, `values.len()` if none.
pub(crate) fn scan_first_defined(values: &[Option<f64>]) -> usize {
    values
        .iter()
        .position(Option::is_some)
        .unwrap_or(values.len())
}

/// The scanned warm-up must match the arithmetic one; anything else is an indicator bug.
pub(crate) fn check_consistency(values: &[Option<f64>], warm_up_index: usize) {
    let scanned = scan_first_defined(values);
    let expected = warm_up_index.min(values.len());
    if scanned != expected {
        error!(
            scanned,
            warm_up_index,
            len = values.len(),
            "indicator warm-up index disagrees with its values"
        );
        debug_assert_eq!(scanned, expected, "warm-up index mismatch");
    }
}
