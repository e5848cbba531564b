//! Daily reduction of a forecast window.
//!
//! Samples are folded in input order into one accumulator per calendar date.
//! Days keep the order in which their date was first seen; nothing is sorted.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{
    error::ForecastError,
    model::{DaySummary, ForecastSummary, NormalizedSample, RawForecast, Reading},
    normalize::normalize,
    transition::count_major_transitions,
};

#[derive(Debug)]
struct DayAccumulator {
    date: NaiveDate,
    rain: f64,
    snow: f64,
    readings: Vec<Reading>,
}

impl DayAccumulator {
    fn new(date: NaiveDate) -> Self {
        Self { date, rain: 0.0, snow: 0.0, readings: Vec::new() }
    }

    fn finish(self) -> DaySummary {
        DaySummary {
            date: self.date,
            rain_mm: round2(self.rain),
            snow_mm: round2(self.snow),
            major_transitions: count_major_transitions(&self.readings),
        }
    }
}

/// Stateful fold over the normalized samples of one forecast window.
#[derive(Debug, Default)]
pub struct DailyAggregator {
    total_rain: f64,
    total_snow: f64,
    max_humidity: u8,
    days: Vec<DayAccumulator>,
    index: HashMap<NaiveDate, usize>,
}

impl DailyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sample: NormalizedSample) {
        self.total_rain += sample.rain;
        self.total_snow += sample.snow;
        self.max_humidity = self.max_humidity.max(sample.humidity);

        let slot = match self.index.get(&sample.date) {
            Some(&slot) => slot,
            None => {
                self.days.push(DayAccumulator::new(sample.date));
                self.index.insert(sample.date, self.days.len() - 1);
                self.days.len() - 1
            }
        };

        let day = &mut self.days[slot];
        day.rain += sample.rain;
        day.snow += sample.snow;
        day.readings.push(Reading { temperature: sample.temperature, category: sample.category });
    }

    /// Close every day and build the summary for the given location.
    pub fn finish(self, location_name: String, country_code: String) -> ForecastSummary {
        ForecastSummary {
            location_name,
            country_code,
            total_rain_mm: self.total_rain,
            total_snow_mm: self.total_snow,
            max_humidity: self.max_humidity,
            days: self.days.into_iter().map(DayAccumulator::finish).collect(),
        }
    }
}

/// Normalize and aggregate a whole forecast payload.
///
/// The first malformed entry aborts the run; no partial summary is returned.
/// A missing city name or country code is reported as an empty string.
pub fn summarize(forecast: &RawForecast) -> Result<ForecastSummary, ForecastError> {
    let mut aggregator = DailyAggregator::new();
    for (index, raw) in forecast.list.iter().enumerate() {
        aggregator.push(normalize(index, raw)?);
    }

    let city = forecast.city.as_ref();
    let name = city.and_then(|c| c.name.clone()).unwrap_or_default();
    let country = city.and_then(|c| c.country.clone()).unwrap_or_default();

    Ok(aggregator.finish(name, country))
}

/// Round to 2 decimals on the exact decimal value of `value`.
///
/// Scaling by 100 first can lift a value stored just below a half
/// (0.015 is 0.01499...) onto the half and round it the wrong way.
fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
