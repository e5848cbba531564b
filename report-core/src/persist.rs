use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::model::ForecastSummary;

pub const JSON_EXTENSION: &str = ".json";
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const FALLBACK_CITY_NAME: &str = "weather";

/// Render a summary as JSON indented with four spaces.
pub fn to_pretty_json(summary: &ForecastSummary) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    summary
        .serialize(&mut ser)
        .context("Failed to serialize forecast summary to JSON")?;

    String::from_utf8(buf).context("Serialized forecast summary is not valid UTF-8")
}

/// `{city}_{country}_{YYYYMMDD_HHMMSS}.json`
pub fn default_file_name(summary: &ForecastSummary, now: NaiveDateTime) -> String {
    let city = if summary.location_name.is_empty() {
        FALLBACK_CITY_NAME
    } else {
        summary.location_name.as_str()
    };

    let name = format!(
        "{}_{}_{}{}",
        city,
        summary.country_code,
        now.format(FILE_TIMESTAMP_FORMAT),
        JSON_EXTENSION
    );

    name.replace(['/', '\\'], "_")
}

/// Write `summary` into `dir`, creating it if needed, and return the file path.
///
/// Without an explicit `file_name` one is derived from the location and `now`.
/// A missing `.json` extension is appended.
pub fn save_summary(
    summary: &ForecastSummary,
    dir: &Path,
    file_name: Option<&str>,
    now: NaiveDateTime,
) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
        tracing::info!("Created output directory {}", dir.display());
    }

    let mut name = match file_name {
        Some(name) => name.to_string(),
        None => default_file_name(summary, now),
    };
    if !name.ends_with(JSON_EXTENSION) {
        name.push_str(JSON_EXTENSION);
    }

    let path = dir.join(name);
    let json = to_pretty_json(summary)?;

    tracing::info!("Writing forecast summary to {}", path.display());
    fs::write(&path, json)
        .with_context(|| format!("Failed to write summary file: {}", path.display()))?;

    Ok(path)
}
