//! Core library for the `weather-report` CLI.
//!
//! This crate defines:
//! - The forecast data model (raw API payload and reduced summary)
//! - Normalization and daily aggregation of 3-hourly samples
//! - Major-transition detection
//! - Configuration & credentials handling
//! - The OpenWeather forecast source and JSON persistence
//!
//! The reduction (`normalize`, `aggregate`, `transition`) is pure and does no I/O.

pub mod aggregate;
pub mod config;
pub mod error;
pub mod model;
pub mod normalize;
pub mod persist;
pub mod provider;
pub mod report;
pub mod transition;

pub use aggregate::{DailyAggregator, summarize};
pub use config::{Config, KeySource};
pub use error::ForecastError;
pub use model::{DaySummary, ForecastSummary, LocationQuery, RawForecast, Reading};
pub use provider::{ForecastSource, KeyStatus, OpenWeatherClient};
pub use report::fetch_summary;
pub use transition::count_major_transitions;
