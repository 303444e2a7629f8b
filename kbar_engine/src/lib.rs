//! K-bar aggregation and indicator engine.
//!
//! - [`aggregator`]: re-bucket time-ordered observations into fixed-duration OHLCV bars.
//! - [`indicators`]: moving average and RSI over a bar sequence, with warm-up bookkeeping.
//! - [`source`], [`config`], [`pipeline`]: loading a price-history file and running
//!   both stages from a TOML description.

pub mod aggregator;
pub mod bucket;
pub mod config;
pub mod errors;
pub mod indicators;
pub mod models;
pub mod pipeline;
pub mod source;
pub mod tz;
pub mod validation;

pub use aggregator::{BarAggregator, Ingest};
pub use errors::EngineError;
pub use indicators::{IndicatorRequest, IndicatorSeries, WarmUpBoundary, moving_average, rsi};
pub use models::{bar::Bar, bar_series::BarSeries, duration::BarDuration, observation::Observation};
