use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::model::{LocationQuery, RawForecast};

use super::{ForecastSource, KeyStatus};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const FORECAST_PATH: &str = "/data/2.5/forecast";
const VERIFY_LOCATION: &str = "Toulouse,FR";
const VERIFY_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the OpenWeather 5 day / 3 hour forecast endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    lang: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String, lang: impl Into<String>) -> Self {
        Self {
            api_key,
            lang: lang.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the client at another host, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn forecast_url(&self) -> String {
        format!("{}{}", self.base_url, FORECAST_PATH)
    }
}

#[async_trait]
impl ForecastSource for OpenWeatherClient {
    async fn fetch_forecast(&self, query: &LocationQuery) -> Result<RawForecast> {
        let q = query.as_query();
        debug!("Requesting OpenWeather forecast for {q}");

        let res = self
            .http
            .get(self.forecast_url())
            .query(&[
                ("q", q.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .context("Failed to send request to OpenWeather (5-day forecast)")?;

        let status = res.status();
        let body = res
            .text()
            .await
            .context("Failed to read OpenWeather forecast response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather forecast request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: RawForecast =
            serde_json::from_str(&body).context("Failed to parse OpenWeather forecast JSON")?;

        info!("Received {} forecast entries for {q}", parsed.list.len());
        Ok(parsed)
    }

    async fn verify_key(&self) -> Result<KeyStatus> {
        if self.api_key.trim().is_empty() {
            warn!("Key verification attempted with an empty API key");
            return Ok(KeyStatus::Unauthorized);
        }

        info!("Verifying OpenWeather API key");

        let res = self
            .http
            .get(self.forecast_url())
            .query(&[
                ("q", VERIFY_LOCATION),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .timeout(VERIFY_TIMEOUT)
            .send()
            .await
            .context("Failed to reach OpenWeather while verifying the API key")?;

        let status = KeyStatus::from_status(res.status().as_u16());
        if status.is_valid() {
            info!("API key verified");
        } else {
            warn!("API key verification failed: {status}");
        }

        Ok(status)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
