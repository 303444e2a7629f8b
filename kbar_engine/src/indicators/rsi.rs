//! Relative strength index with simple (non-Wilder) rolling averages.

use crate::errors::{EngineError, Result};
use crate::indicators::{IndicatorSeries, PriceBar, rolling::RollingSum};

/// Rolling sum of one side (gains or losses) of the price changes in the window.
///
/// `nonzero` counts the strictly positive terms, so an all-zero window is detected
/// exactly even after floating-point add/subtract residue. The sum itself is
/// compensated, so a small move next to a huge one is still counted.
#[derive(Default)]
struct Side {
    sum: RollingSum,
    nonzero: usize,
}

impl Side {
    fn push(&mut self, x: f64) {
        if x > 0.0 {
            self.sum.add(x);
            self.nonzero += 1;
        }
    }

    fn pop(&mut self, x: f64) {
        if x > 0.0 {
            self.sum.sub(x);
            self.nonzero -= 1;
        }
    }

    fn mean(&self, period: usize) -> f64 {
        if self.nonzero == 0 {
            0.0
        } else {
            (self.sum.value() / period as f64).max(0.0)
        }
    }
}

/// `(gain, loss)` of the change into bar `i` (i >= 1).
fn change<B: PriceBar>(bars: &[B], i: usize) -> (f64, f64) {
    let delta = bars[i].close() - bars[i - 1].close();
    (delta.max(0.0), (-delta).max(0.0))
}

/// RSI from average gain/loss, with the zero-denominator cases pinned.
///
/// - no losses, some gains: 100
/// - flat window: 50
pub(crate) fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain == 0.0 { 50.0 } else { 100.0 };
    }
    let rs = avg_gain / avg_loss;
    (100.0 - 100.0 / (1.0 + rs)).clamp(0.0, 100.0)
}

/// RSI over the trailing `period` close-to-close changes.
///
/// The first change is at index 1, so the first defined value is at index `period`
/// (`warm_up_index = period`). Fewer than `period + 1` bars yields an all-undefined
/// series.
///
/// Errors:
/// - [`EngineError::InvalidConfiguration`] if `period == 0`.
pub fn rsi<B: PriceBar>(bars: &[B], period: usize) -> Result<IndicatorSeries> {
    if period == 0 {
        return Err(EngineError::invalid("period", 0));
    }

    let len = bars.len();
    let mut values = vec![None; len];

    if len > period {
        let mut gains = Side::default();
        let mut losses = Side::default();

        for i in 1..len {
            let (g, l) = change(bars, i);
            gains.push(g);
            losses.push(l);

            // window is changes (i-period, i]
            if i > period {
                let (old_g, old_l) = change(bars, i - period);
                gains.pop(old_g);
                losses.pop(old_l);
            }

            if i >= period {
                values[i] = Some(rsi_from_averages(gains.mean(period), losses.mean(period)));
            }
        }
    }

    Ok(IndicatorSeries::new(values, period))
}
