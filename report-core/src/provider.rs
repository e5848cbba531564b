use crate::model::{LocationQuery, RawForecast};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Outcome of probing the forecast API with a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyStatus {
    Valid,
    /// 401: the key is invalid or expired.
    Unauthorized,
    /// 5xx from the API.
    ServerError(u16),
    /// Any other non-success status.
    Rejected(u16),
}

impl KeyStatus {
    pub fn from_status(status: u16) -> Self {
        match status {
            200 => KeyStatus::Valid,
            401 => KeyStatus::Unauthorized,
            500..=599 => KeyStatus::ServerError(status),
            other => KeyStatus::Rejected(other),
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, KeyStatus::Valid)
    }
}

impl std::fmt::Display for KeyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeyStatus::Valid => f.write_str("API key is valid"),
            KeyStatus::Unauthorized => f.write_str("API key is invalid or expired (401)"),
            KeyStatus::ServerError(code) => write!(f, "weather API server error ({code})"),
            KeyStatus::Rejected(code) => write!(f, "weather API rejected the request ({code})"),
        }
    }
}

/// Anything that can hand over a raw multi-day forecast.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn fetch_forecast(&self, query: &LocationQuery) -> anyhow::Result<RawForecast>;

    async fn verify_key(&self) -> anyhow::Result<KeyStatus>;
}
