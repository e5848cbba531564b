use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use weather_report_core::{
    Config, ForecastSource, ForecastSummary, LocationQuery, OpenWeatherClient,
    config::{KEY_FILE_NAME, resolve_api_key},
    fetch_summary, persist,
    provider::openweather::DEFAULT_BASE_URL,
};

use crate::{interactive, logging};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "weather-report",
    version,
    about = "Daily rain, snow, humidity and weather-change summary of a 5-day forecast"
)]
pub struct Cli {
    /// OpenWeather API key; overrides the key file and stored config.
    #[arg(long, short = 'k', global = true)]
    pub api_key: Option<String>,

    /// File holding an `API_KEY=<key>` line.
    #[arg(long, global = true, default_value = KEY_FILE_NAME)]
    pub key_file: PathBuf,

    /// Base URL of the forecast API.
    #[arg(long, global = true, hide = true, default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// Without a command an interactive menu is started.
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch, summarize, print and save the forecast for one location.
    Report(ReportArgs),

    /// Store an OpenWeather API key in the config file.
    Configure,
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// City name, e.g. "Paris".
    #[arg(long, short = 'c')]
    pub city: String,

    /// Country code, e.g. "FR".
    #[arg(long, short = 'C')]
    pub country: String,

    /// Do not print the summary, only save it.
    #[arg(long)]
    pub no_display: bool,

    /// File name for the saved summary; defaults to `<city>_<country>_<timestamp>.json`.
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// Directory for saved summaries; overrides the config file.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,
}

/// Where and how a finished summary goes.
#[derive(Debug, Clone)]
pub struct ReportOutput {
    pub display: bool,
    pub file_name: Option<String>,
    pub output_dir: PathBuf,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        // A broken config file is only fatal when no key was passed on the command line.
        let (config, unreadable) = match Config::load() {
            Ok(config) => (config, None),
            Err(e) if self.api_key.is_some() => (Config::default(), Some(e)),
            Err(e) => return Err(e),
        };

        if let Err(e) = logging::init(&config.logs_dir()) {
            eprintln!("Warning: logging disabled: {e:#}");
        }
        if let Some(e) = unreadable {
            warn!("Ignoring unreadable config: {e:#}");
            eprintln!("Warning: ignoring unreadable config: {e:#}");
        }

        match &self.command {
            Some(Command::Configure) => configure(config, &self.api_url).await,
            Some(Command::Report(args)) => self.report(&config, args).await,
            None => self.interactive(&config).await,
        }
    }

    fn client(&self, config: &Config) -> Result<OpenWeatherClient> {
        let Some((key, source)) = resolve_api_key(self.api_key.as_deref(), &self.key_file, config)?
        else {
            error!("No API key found");
            bail!(
                "No API key found.\n\
                 Hint: pass --api-key, put `API_KEY=<key>` in {}, or run `weather-report configure`.",
                self.key_file.display()
            );
        };

        info!("Using API key from {source}");
        Ok(OpenWeatherClient::new(key, config.lang()).with_base_url(&self.api_url))
    }

    async fn report(&self, config: &Config, args: &ReportArgs) -> Result<()> {
        let client = self.client(config)?;

        let status = client.verify_key().await?;
        if !status.is_valid() {
            info!("Exiting: API key rejected in report mode");
            bail!("The API key is not valid: {status}");
        }

        let output = ReportOutput {
            display: !args.no_display,
            file_name: args.output.clone(),
            output_dir: args.output_dir.clone().unwrap_or_else(|| config.output_dir()),
        };

        let query = LocationQuery::new(&args.city, &args.country);
        execute_report(&client, &query, &output).await?;

        info!("Exiting: report command finished");
        Ok(())
    }

    async fn interactive(&self, config: &Config) -> Result<()> {
        let client = self.client(config)?;

        println!("Checking API key...");
        let status = client.verify_key().await?;
        if !status.is_valid() {
            info!("Exiting: API key rejected in interactive mode");
            bail!(
                "The API key does not work: {status}.\n\
                 Hint: check {} or run `weather-report configure`.",
                self.key_file.display()
            );
        }
        println!("API key is valid.\n");

        interactive::run(&client, config).await
    }
}

/// Fetch and summarize the forecast, then print and save it as requested.
///
/// A failed save is reported but does not fail the report.
pub async fn execute_report(
    source: &dyn ForecastSource,
    query: &LocationQuery,
    output: &ReportOutput,
) -> Result<()> {
    let summary = fetch_summary(source, query).await?;

    if output.display {
        println!("{}", persist::to_pretty_json(&summary)?);
    }

    save(&summary, &output.output_dir, output.file_name.as_deref());
    Ok(())
}

fn save(summary: &ForecastSummary, dir: &Path, file_name: Option<&str>) {
    let now = chrono::Local::now().naive_local();
    match persist::save_summary(summary, dir, file_name, now) {
        Ok(path) => {
            info!("Summary saved to {}", path.display());
            eprintln!("Result saved to {}", path.display());
        }
        Err(e) => {
            error!("Failed to save summary: {e:#}");
            eprintln!("Could not save the result: {e:#}");
        }
    }
}

async fn configure(mut config: Config, api_url: &str) -> Result<()> {
    let key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("API key prompt was aborted")?;

    config.set_api_key(key);
    let Some(key) = config.api_key().map(str::to_string) else {
        bail!("API key cannot be empty");
    };

    let client = OpenWeatherClient::new(key, config.lang()).with_base_url(api_url);
    match client.verify_key().await {
        Ok(status) if status.is_valid() => println!("API key is valid."),
        Ok(status) => {
            warn!("Stored key failed verification: {status}");
            eprintln!("Warning: {status}. The key is stored anyway.");
        }
        Err(e) => {
            warn!("Could not verify stored key: {e:#}");
            eprintln!("Warning: could not verify the key: {e:#}");
        }
    }

    config.save()?;
    let path = Config::config_file_path()?;
    info!("API key stored in {}", path.display());
    println!("API key saved to {}", path.display());

    Ok(())
}
