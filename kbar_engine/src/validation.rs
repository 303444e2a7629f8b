//! Well-formedness checks for observations coming from a data source.
//!
//! The aggregator trusts its input apart from ordering; loaders run these checks
//! first so a corrupt row is reported instead of silently skewing a bar.

use crate::{
    errors::{EngineError, Result},
    models::observation::Observation,
};

fn malformed(obs: &Observation, reason: String) -> EngineError {
    EngineError::MalformedObservation {
        time: obs.time,
        reason,
    }
}

/// Validates one observation.
///
/// # Errors
/// [`EngineError::MalformedObservation`] when:
/// - any price, the volume or the amount is NaN/Inf
/// - volume or amount is negative
/// - `low > high`, or open/close lies outside `[low, high]`
pub fn validate_observation(obs: &Observation) -> Result<()> {
    let prices = [obs.open, obs.high, obs.low, obs.close, obs.volume];
    if prices.iter().any(|v| !v.is_finite()) || obs.amount.is_some_and(|a| !a.is_finite()) {
        return Err(malformed(obs, "NaN/Inf value".to_string()));
    }

    if obs.volume < 0.0 {
        return Err(malformed(obs, format!("negative volume {}", obs.volume)));
    }
    if let Some(amount) = obs.amount.filter(|a| *a < 0.0) {
        return Err(malformed(obs, format!("negative amount {amount}")));
    }

    if obs.low > obs.high
        || obs.open < obs.low
        || obs.open > obs.high
        || obs.close < obs.low
        || obs.close > obs.high
    {
        return Err(malformed(
            obs,
            format!(
                "invalid OHLC: low={}, high={}, open={}, close={}",
                obs.low, obs.high, obs.open, obs.close
            ),
        ));
    }

    Ok(())
}
