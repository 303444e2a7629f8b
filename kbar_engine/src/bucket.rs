//! bucket.rs: anchor-relative bucket mapping
//!
//! - Buckets are half-open `[start, start + width)` intervals laid end to end from an anchor.
//! - Bucket index = floor(elapsed seconds since anchor / width); negative before the anchor.
//! - Widths are whole minutes, so all math is exact second-based integer arithmetic.
//!
//! All functions assume UTC inputs.

use chrono::{DateTime, Duration, Utc};

use crate::models::duration::BarDuration;

/// Whole seconds from `anchor` to `ts`, rounded towards negative infinity.
fn floor_elapsed_secs(ts: DateTime<Utc>, anchor: DateTime<Utc>) -> i64 {
    let delta = ts.signed_duration_since(anchor);
    let secs = delta.num_seconds();
    // subsec part carries the sign of the delta
    if delta.subsec_nanos() < 0 { secs - 1 } else { secs }
}

/// Compute the bucket index for a UTC timestamp.
pub fn bucket_index(ts: DateTime<Utc>, anchor: DateTime<Utc>, width: BarDuration) -> i64 {
    floor_elapsed_secs(ts, anchor).div_euclid(width.seconds())
}

/// Get the UTC start instant for a bucket index.
pub fn bucket_start(index: i64, anchor: DateTime<Utc>, width: BarDuration) -> DateTime<Utc> {
    anchor + Duration::seconds(index * width.seconds())
}
