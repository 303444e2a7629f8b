#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use kbar_engine::Observation;

/// 2022-01-03 09:00:00Z plus `minutes`.
pub fn at_min(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 1, 3, 9, 0, 0).unwrap() + Duration::minutes(minutes)
}

/// Observation whose open/high/low/close all sit at `close`.
pub fn flat(minutes: i64, close: f64, volume: f64) -> Observation {
    Observation::new(at_min(minutes), close, close, close, close, volume)
}

/// Observation with an explicit range around `open`/`close`.
pub fn ohlc(minutes: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Observation {
    Observation::new(at_min(minutes), open, high, low, close, volume)
}

/// Two intraday rows per trading day, 2022-01-03 .. 2022-01-14 (weekends skipped).
pub fn trading_day_rows() -> String {
    let mut rows = Vec::new();
    let mut price = 600.0;
    for day in 3..=14u32 {
        let weekday = Utc.with_ymd_and_hms(2022, 1, day, 0, 0, 0).unwrap().format("%a").to_string();
        if weekday == "Sat" || weekday == "Sun" {
            continue;
        }
        for (hh, delta) in [("09:00:00", 2.0), ("13:00:00", -1.0)] {
            let open = price;
            price += delta;
            let (hi, lo) = if delta > 0.0 { (price, open) } else { (open, price) };
            rows.push(format!(
                r#"{{"time": "2022-01-{day:02} {hh}", "open": {open}, "high": {hi}, "low": {lo}, "close": {price}, "volume": 100, "amount": {}}}"#,
                price * 100.0
            ));
        }
    }
    format!("[{}]", rows.join(",\n"))
}
