use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// City/country pair a forecast is requested for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery {
    pub city: String,
    pub country: String,
}

impl LocationQuery {
    pub fn new(city: impl Into<String>, country: impl Into<String>) -> Self {
        Self { city: city.into(), country: country.into() }
    }

    /// Value of the `q` parameter understood by OpenWeather, e.g. `Paris,FR`.
    pub fn as_query(&self) -> String {
        format!("{},{}", self.city.trim(), self.country.trim())
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.city, self.country)
    }
}

// ---------------------------------------------------------------------------
// Upstream payload (OpenWeather 5 day / 3 hour forecast)
//
// Every field is optional so that a missing value surfaces as a
// `ForecastError::MalformedInput` for the offending entry instead of a
// decoding failure for the whole payload. The required scalars (`dt_txt`,
// `main.temp`, `main.humidity`) are kept as untyped JSON for the same
// reason: a wrongly typed value is rejected per entry by the normalizer.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawForecast {
    #[serde(default)]
    pub city: Option<RawCity>,
    #[serde(default)]
    pub list: Vec<RawSample>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCity {
    pub name: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSample {
    pub dt_txt: Option<Value>,
    pub main: Option<RawMain>,
    pub rain: Option<RawPrecipitation>,
    pub snow: Option<RawPrecipitation>,
    pub weather: Option<Vec<RawCondition>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMain {
    pub temp: Option<Value>,
    pub humidity: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPrecipitation {
    /// Accumulation over the last 3 hours, in millimetres.
    #[serde(rename = "3h")]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCondition {
    /// Weather group such as `Rain`, `Snow` or `Clouds`.
    pub main: Option<String>,
}

// ---------------------------------------------------------------------------
// Reduced forecast
// ---------------------------------------------------------------------------

/// One forecast entry after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSample {
    pub date: NaiveDate,
    pub temperature: f64,
    pub humidity: u8,
    pub rain: f64,
    pub snow: f64,
    pub category: String,
}

/// Temperature and weather group of a single sample, in the order it was seen.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub temperature: f64,
    pub category: String,
}

impl Reading {
    pub fn new(temperature: f64, category: impl Into<String>) -> Self {
        Self { temperature, category: category.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSummary {
    #[serde(rename = "forecast_location_name")]
    pub location_name: String,
    pub country_code: String,
    #[serde(rename = "total_rain_period_mm")]
    pub total_rain_mm: f64,
    #[serde(rename = "total_snow_period_mm")]
    pub total_snow_mm: f64,
    #[serde(rename = "max_humidity_period")]
    pub max_humidity: u8,
    #[serde(rename = "forecast_details")]
    pub days: Vec<DaySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaySummary {
    #[serde(rename = "date_local")]
    pub date: NaiveDate,
    #[serde(rename = "rain_cumul_mm")]
    pub rain_mm: f64,
    #[serde(rename = "snow_cumul_mm")]
    pub snow_mm: f64,
    #[serde(rename = "major_transitions_count")]
    pub major_transitions: usize,
}
