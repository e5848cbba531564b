//! Menu-driven mode used when no command is given.

use anyhow::{Context, Result};
use inquire::{Confirm, InquireError, Select, Text, required};
use std::fmt;
use tracing::{error, info};
use weather_report_core::{Config, LocationQuery, OpenWeatherClient};

use crate::cli::{ReportOutput, execute_report};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuEntry {
    Report,
    Exit,
}

impl fmt::Display for MenuEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MenuEntry::Report => "Weather report",
            MenuEntry::Exit => "Exit",
        })
    }
}

/// Esc / Ctrl-C on a prompt.
fn is_cancel(err: &InquireError) -> bool {
    matches!(err, InquireError::OperationCanceled | InquireError::OperationInterrupted)
}

pub async fn run(client: &OpenWeatherClient, config: &Config) -> Result<()> {
    loop {
        let choice = match Select::new("Choose an option:", vec![MenuEntry::Report, MenuEntry::Exit])
            .prompt()
        {
            Ok(choice) => choice,
            Err(e) if is_cancel(&e) => break,
            Err(e) => return Err(e).context("Menu prompt failed"),
        };

        match choice {
            MenuEntry::Report => {
                if let Err(e) = report(client, config).await {
                    error!("Interactive report failed: {e:#}");
                    eprintln!("Error: {e:#}\n");
                }
            }
            MenuEntry::Exit => break,
        }
    }

    println!("Closing.");
    info!("Exiting: interactive menu closed");
    Ok(())
}

async fn report(client: &OpenWeatherClient, config: &Config) -> Result<()> {
    let Some((query, display)) = ask_report_details()? else {
        return Ok(());
    };

    let output = ReportOutput { display, file_name: None, output_dir: config.output_dir() };
    execute_report(client, &query, &output).await
}

/// `None` when the user backs out of one of the prompts.
fn ask_report_details() -> Result<Option<(LocationQuery, bool)>> {
    let answers = Text::new("City name:")
        .with_validator(required!("City is required"))
        .prompt()
        .and_then(|city| {
            Text::new("Country code (FR, US, ...):")
                .with_validator(required!("Country code is required"))
                .prompt()
                .map(|country| (city, country))
        })
        .and_then(|(city, country)| {
            Confirm::new("Display the formatted result?")
                .with_default(true)
                .prompt()
                .map(|display| (LocationQuery::new(city, country), display))
        });

    match answers {
        Ok(answers) => Ok(Some(answers)),
        Err(e) if is_cancel(&e) => Ok(None),
        Err(e) => Err(e).context("Report prompt failed"),
    }
}
