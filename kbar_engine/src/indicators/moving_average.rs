//! Simple moving average (SMA) of closes.

use crate::errors::{EngineError, Result};
use crate::indicators::{IndicatorSeries, PriceBar, rolling::RollingSum};

/// Arithmetic mean of `close` over the trailing `window` bars.
///
/// Indices `0..window-1` are undefined; `warm_up_index = window - 1`. A window longer
/// than the series is not an error: the result is all-undefined with the same length.
///
/// Errors:
/// - [`EngineError::InvalidConfiguration`] if `window == 0`.
pub fn moving_average<B: PriceBar>(bars: &[B], window: usize) -> Result<IndicatorSeries> {
    if window == 0 {
        return Err(EngineError::invalid("window", 0));
    }

    let len = bars.len();
    let mut values = vec![None; len];

    if window <= len {
        let n = window as f64;
        let mut sum = RollingSum::default();
        for bar in &bars[..window] {
            sum.add(bar.close());
        }
        values[window - 1] = Some(sum.value() / n);

        for i in window..len {
            // drop the oldest close before adding the newest: with window 1 this keeps
            // the mean bit-identical to the close
            sum.sub(bars[i - window].close());
            sum.add(bars[i].close());
            values[i] = Some(sum.value() / n);
        }
    }

    Ok(IndicatorSeries::new(values, window - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_basic() {
        let result = moving_average(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();

        assert_eq!(result.get(0), None);
        assert_eq!(result.get(1), None);
        assert!((result.get(2).unwrap() - 2.0).abs() < 1e-10); // (1+2+3)/3
        assert!((result.get(3).unwrap() - 3.0).abs() < 1e-10); // (2+3+4)/3
        assert!((result.get(4).unwrap() - 4.0).abs() < 1e-10); // (3+4+5)/3
        assert_eq!(result.warm_up_index(), 2);
    }

    #[test]
    fn sma_constant_input() {
        let result = moving_average(&[5.0; 10], 3).unwrap();
        for (_, value) in result.defined() {
            assert!((value - 5.0).abs() < 1e-10);
        }
        assert_eq!(result.defined().count(), 8);
    }

    #[test]
    fn sma_insufficient_data_is_all_undefined() {
        let result = moving_average(&[1.0, 2.0], 5).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result.values().iter().all(Option::is_none));
        assert_eq!(result.warm_up_index(), 4);
        assert_eq!(result.defined_range(), None);
    }

    #[test]
    fn sma_window_equal_to_len() {
        let result = moving_average(&[2.0, 4.0, 6.0], 3).unwrap();
        assert_eq!(result.values(), &[None, None, Some(4.0)]);
    }

    #[test]
    fn sma_period_one_matches_close_exactly() {
        let closes = [0.1, 0.7, 0.3, 1e9, 3.3e-7, 2.5];
        let result = moving_average(&closes, 1).unwrap();
        for (close, value) in closes.iter().zip(result.values()) {
            assert_eq!(Some(*close), *value);
        }
    }

    #[test]
    fn sma_recovers_after_huge_close_leaves_window() {
        let result = moving_average(&[1e16, 1.0, 1.0, 1.0], 2).unwrap();
        assert_eq!(result.values(), &[None, Some(5e15), Some(1.0), Some(1.0)]);
    }

    #[test]
    fn sma_zero_window_is_invalid() {
        assert_eq!(
            moving_average(&[1.0, 2.0, 3.0], 0),
            Err(EngineError::InvalidConfiguration {
                parameter: "window",
                value: 0
            })
        );
    }

    #[test]
    fn sma_empty_input() {
        let result = moving_average::<f64>(&[], 3).unwrap();
        assert!(result.is_empty());
    }
}
