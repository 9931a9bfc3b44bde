use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use inquire::{InquireError, Password, Select, Text};
use std::path::PathBuf;
use weather_core::{
    Config, ErrorPolicy, FetchOutcome, HistoryStore, WeatherController, history_from_config,
    repository_from_config,
};

use crate::render;

/// Input that opens the history list from the interactive prompt.
const HISTORY_COMMAND: &str = ":history";
const QUIT_COMMAND: &str = ":quit";

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather with a local lookup history")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, default city and error policy.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name; the configured default city when absent.
        city: Option<String>,
    },

    /// List every successful lookup, oldest first.
    History,

    /// Load the default city, then search repeatedly.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = self.load_config()?;

        match &self.command {
            Command::Configure => self.configure(config),
            Command::Show { city } => show(&config, city.as_deref()).await,
            Command::History => {
                let store = history_from_config(&config)?;
                let records = store.list_all().context("Failed to read weather history")?;
                print!("{}", render::history(&records));
                Ok(())
            }
            Command::Interactive => interactive(&config).await,
        }
    }

    fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path),
            None => Config::load(),
        }
    }

    fn configure(&self, mut config: Config) -> Result<()> {
        let api_key = Password::new("OpenWeather API key:")
            .without_confirmation()
            .with_help_message("Leave empty to keep the current key")
            .prompt()?;
        if !api_key.trim().is_empty() {
            config.api_key = Some(api_key.trim().to_string());
        }

        let city = Text::new("Default city:").with_default(&config.default_city).prompt()?;
        config.default_city = city.trim().to_string();

        let policies = ErrorPolicy::all().to_vec();
        let cursor = policies.iter().position(|p| *p == config.error_policy).unwrap_or(0);
        config.error_policy = Select::new("When a lookup fails:", policies)
            .with_starting_cursor(cursor)
            .prompt()?;

        match &self.config {
            Some(path) => config.save_to(path)?,
            None => config.save()?,
        }

        println!("Configuration saved.");
        Ok(())
    }
}

fn controller(config: &Config) -> Result<WeatherController> {
    let repository = repository_from_config(config)?;
    Ok(WeatherController::new(repository, config.default_city.clone()))
}

async fn show(config: &Config, city: Option<&str>) -> Result<()> {
    let ctl = controller(config)?;

    let outcome = match city {
        Some(city) => ctl.fetch_weather(city).await,
        None => ctl.load_default().await,
    };

    let failed = !outcome.is_displayed();
    // Let the history write finish before the runtime shuts down.
    settle(outcome).await;

    let state = ctl.state();
    if let Some(display) = &state.display {
        print!("{}", render::weather(display, state.theme));
    }

    match state.notice(config.error_policy) {
        Some(message) if failed => Err(anyhow!("{message}")),
        _ => Ok(()),
    }
}

async fn interactive(config: &Config) -> Result<()> {
    let ctl = controller(config)?;

    let mut last = ctl.load_default().await;
    redraw(&ctl, config.error_policy);

    loop {
        let input = match Text::new("Search city:")
            .with_help_message(":history shows past lookups, :quit or Esc leaves")
            .prompt()
        {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => {
                settle(last).await;
                return Err(err.into());
            }
        };

        match input.trim() {
            "" => continue,
            QUIT_COMMAND => break,
            HISTORY_COMMAND => {
                let records = ctl.history().await.context("Failed to read weather history")?;
                print!("{}", render::history(&records));
            }
            _ => {
                // The history write runs in the background; the next prompt doesn't wait for it.
                let outcome = ctl.fetch_weather(&input).await;
                redraw(&ctl, config.error_policy);
                settle(std::mem::replace(&mut last, outcome)).await;
            }
        }
    }

    // The runtime shuts down after this returns; finish the pending write first.
    settle(last).await;
    Ok(())
}

async fn settle(outcome: FetchOutcome) {
    if let Err(err) = outcome.persisted().await {
        tracing::warn!(error = %err, "lookup shown but not saved to history");
    }
}

fn redraw(ctl: &WeatherController, policy: ErrorPolicy) {
    let state = ctl.state();

    if let Some(display) = &state.display {
        println!();
        print!("{}", render::weather(display, state.theme));
    }
    if let Some(message) = state.notice(policy) {
        eprintln!("error: {message}");
    }
}
