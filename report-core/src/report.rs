use anyhow::{Context, Result};
use tracing::info;

use crate::{
    aggregate::summarize,
    model::{ForecastSummary, LocationQuery},
    provider::ForecastSource,
};

/// Fetch the forecast for `query` and reduce it to a daily summary.
pub async fn fetch_summary(
    source: &dyn ForecastSource,
    query: &LocationQuery,
) -> Result<ForecastSummary> {
    info!("Sending forecast request for {query}");
    let raw = source
        .fetch_forecast(query)
        .await
        .with_context(|| format!("Could not fetch forecast for {query}"))?;
    info!("Raw forecast retrieved for {query}");

    let summary =
        summarize(&raw).with_context(|| format!("Could not summarize forecast for {query}"))?;
    info!("Summary built for {query}: {} day(s)", summary.days.len());

    Ok(summary)
}
