use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::{
    fs::{self, OpenOptions},
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::info;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, time::ChronoLocal},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Environment variable holding an `EnvFilter` directive, e.g. `debug`.
pub const LOG_FILTER_ENV: &str = "WEATHER_REPORT_LOG";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn log_file_name(date: NaiveDate) -> String {
    format!("weather_report_{}.log", date.format("%Y%m%d"))
}

/// Send all tracing output to today's log file under `logs_dir`.
///
/// Nothing is written to the terminal: stdout carries the JSON report.
pub fn init(logs_dir: &Path) -> Result<PathBuf> {
    let created = !logs_dir.exists();
    fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create logs directory: {}", logs_dir.display()))?;

    let path = logs_dir.join(log_file_name(Local::now().date_naive()));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))?;

    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .with_timer(ChronoLocal::new(TIME_FORMAT.to_string())),
        )
        .try_init()
        .context("Failed to install log subscriber")?;

    info!("Logging initialised");
    if created {
        info!("Created logs directory {}", logs_dir.display());
    }

    Ok(path)
}
