use chrono::NaiveDateTime;
use serde_json::Value;

use crate::{
    error::ForecastError,
    model::{NormalizedSample, RawPrecipitation, RawSample},
};

/// Layout of `dt_txt` in forecast entries. The value is taken as local time.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Turn one forecast entry into a [`NormalizedSample`].
///
/// `index` is the entry's position in the forecast list and is only used
/// to point at the culprit in a [`ForecastError::MalformedInput`].
pub fn normalize(index: usize, raw: &RawSample) -> Result<NormalizedSample, ForecastError> {
    let dt_txt = match &raw.dt_txt {
        None => return Err(ForecastError::malformed(index, "missing `dt_txt` timestamp")),
        Some(Value::String(s)) => s.as_str(),
        Some(other) => {
            return Err(ForecastError::malformed(index, format!("`dt_txt` is not a string: {other}")));
        }
    };

    let timestamp = NaiveDateTime::parse_from_str(dt_txt, TIMESTAMP_FORMAT).map_err(|e| {
        ForecastError::malformed(index, format!("timestamp '{dt_txt}' is not YYYY-MM-DD HH:MM:SS: {e}"))
    })?;

    let main = raw
        .main
        .as_ref()
        .ok_or_else(|| ForecastError::malformed(index, "missing `main` block"))?;
    let temperature = number(index, main.temp.as_ref(), "main.temp")?;
    let humidity = percentage(index, number(index, main.humidity.as_ref(), "main.humidity")?)?;

    let category = raw
        .weather
        .as_deref()
        .and_then(|tags| tags.first())
        .ok_or_else(|| ForecastError::malformed(index, "empty `weather` list"))?
        .main
        .clone()
        .ok_or_else(|| ForecastError::malformed(index, "missing `weather[0].main`"))?;

    Ok(NormalizedSample {
        date: timestamp.date(),
        temperature,
        humidity,
        rain: accumulation(raw.rain.as_ref()),
        snow: accumulation(raw.snow.as_ref()),
        category,
    })
}

fn number(index: usize, value: Option<&Value>, field: &str) -> Result<f64, ForecastError> {
    let value = value.ok_or_else(|| ForecastError::malformed(index, format!("missing `{field}`")))?;
    value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| ForecastError::malformed(index, format!("`{field}` is not a number: {value}")))
}

/// Humidity may arrive as `72` or `72.0`; fractional values are rounded.
fn percentage(index: usize, humidity: f64) -> Result<u8, ForecastError> {
    let rounded = humidity.round();
    if !(0.0..=f64::from(u8::MAX)).contains(&rounded) {
        return Err(ForecastError::malformed(
            index,
            format!("`main.humidity` out of range: {humidity}"),
        ));
    }
    Ok(rounded as u8)
}

/// Absent block or absent `3h` amount both mean no precipitation.
fn accumulation(block: Option<&RawPrecipitation>) -> f64 {
    block.and_then(|b| b.three_hours).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RawCondition, RawMain};
    use chrono::NaiveDate;

    fn sample(dt: &str) -> RawSample {
        RawSample {
            dt_txt: Some(dt.into()),
            main: Some(RawMain { temp: Some(12.5.into()), humidity: Some(70.into()) }),
            rain: None,
            snow: None,
            weather: Some(vec![RawCondition { main: Some("Clouds".into()) }]),
        }
    }

    #[test]
    fn truncates_timestamp_to_date() {
        let s = normalize(0, &sample("2024-01-01 21:00:00")).unwrap();
        assert_eq!(s.date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(s.temperature, 12.5);
        assert_eq!(s.humidity, 70);
        assert_eq!(s.category, "Clouds");
    }

    #[test]
    fn missing_precipitation_is_zero() {
        let s = normalize(0, &sample("2024-01-01 00:00:00")).unwrap();
        assert_eq!(s.rain, 0.0);
        assert_eq!(s.snow, 0.0);

        let mut raw = sample("2024-01-01 00:00:00");
        raw.rain = Some(RawPrecipitation { three_hours: None });
        raw.snow = Some(RawPrecipitation { three_hours: Some(1.25) });
        let s = normalize(0, &raw).unwrap();
        assert_eq!(s.rain, 0.0);
        assert_eq!(s.snow, 1.25);
    }

    #[test]
    fn only_first_weather_tag_counts() {
        let mut raw = sample("2024-01-01 00:00:00");
        raw.weather = Some(vec![
            RawCondition { main: Some("Rain".into()) },
            RawCondition { main: Some("Snow".into()) },
        ]);
        assert_eq!(normalize(0, &raw).unwrap().category, "Rain");
    }

    #[test]
    fn rejects_bad_timestamp() {
        let err = normalize(4, &sample("2024-01-01T00:00:00Z")).unwrap_err();
        let ForecastError::MalformedInput { index, reason } = err;
        assert_eq!(index, 4);
        assert!(reason.contains("2024-01-01T00:00:00Z"));

        let mut raw = sample("");
        raw.dt_txt = None;
        assert!(normalize(0, &raw).is_err());
    }

    #[test]
    fn rejects_missing_required_fields() {
        let mut raw = sample("2024-01-01 00:00:00");
        raw.weather = Some(vec![]);
        assert!(normalize(0, &raw).is_err());

        let mut raw = sample("2024-01-01 00:00:00");
        raw.weather = None;
        assert!(normalize(0, &raw).is_err());

        let mut raw = sample("2024-01-01 00:00:00");
        raw.main = Some(RawMain { temp: None, humidity: Some(50.into()) });
        assert!(normalize(0, &raw).is_err());

        let mut raw = sample("2024-01-01 00:00:00");
        raw.main = Some(RawMain { temp: Some(1.0.into()), humidity: None });
        assert!(normalize(0, &raw).is_err());

        let mut raw = sample("2024-01-01 00:00:00");
        raw.main = None;
        assert!(normalize(0, &raw).is_err());
    }

    #[test]
    fn float_humidity_is_accepted() {
        let mut raw = sample("2024-01-01 00:00:00");
        raw.main = Some(RawMain { temp: Some(7.into()), humidity: Some(72.0.into()) });

        let s = normalize(0, &raw).unwrap();
        assert_eq!(s.humidity, 72);
        assert_eq!(s.temperature, 7.0);
    }

    #[test]
    fn wrongly_typed_fields_are_malformed_entries() {
        let entry = |json: &str| serde_json::from_str::<RawSample>(json).unwrap();

        let err = normalize(
            2,
            &entry(r#"{"dt_txt": "2024-01-01 00:00:00", "main": {"temp": "7", "humidity": 50},
                       "weather": [{"main": "Rain"}]}"#),
        )
        .unwrap_err();
        let ForecastError::MalformedInput { index, reason } = err;
        assert_eq!(index, 2);
        assert!(reason.contains("main.temp"), "{reason}");

        let err = normalize(
            3,
            &entry(r#"{"dt_txt": "2024-01-01 00:00:00", "main": {"temp": 7.0, "humidity": 300},
                       "weather": [{"main": "Rain"}]}"#),
        )
        .unwrap_err();
        let ForecastError::MalformedInput { index, reason } = err;
        assert_eq!(index, 3);
        assert!(reason.contains("out of range"), "{reason}");

        let err = normalize(
            4,
            &entry(r#"{"dt_txt": 1704067200, "main": {"temp": 7.0, "humidity": 50},
                       "weather": [{"main": "Rain"}]}"#),
        )
        .unwrap_err();
        let ForecastError::MalformedInput { index, reason } = err;
        assert_eq!(index, 4);
        assert!(reason.contains("dt_txt"), "{reason}");
    }
}
