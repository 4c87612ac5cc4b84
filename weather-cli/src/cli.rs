use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Text};
use tracing::debug;
use weather_core::{Config, PlaceName, QueryError, QuerySession, WeatherPipeline, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather for a place name")]
pub struct Cli {
    /// Print debug logs to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current weather for a place.
    Show {
        /// City or locality name, e.g. "Paris".
        place: String,

        /// Print the snapshot as JSON instead of the text report.
        #[arg(long)]
        json: bool,
    },

    /// Interactively set search language and request timeout.
    Configure,

    /// Print where the configuration file lives.
    ConfigPath,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Show { place, json } => show(&place, json).await,
            Command::Configure => configure(),
            Command::ConfigPath => {
                println!("{}", Config::config_file_path()?.display());
                Ok(())
            }
        }
    }
}

async fn show(raw_place: &str, json: bool) -> anyhow::Result<()> {
    let place = PlaceName::parse(raw_place).context("Please enter a city name")?;

    let config = Config::load()?;
    debug!(?config, "loaded configuration");
    let session = QuerySession::new(WeatherPipeline::from_config(&config)?);
    let pending = session.submit(place.clone())?;

    match pending.outcome().await {
        Ok(snapshot) if json => {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
            Ok(())
        }
        Ok(snapshot) => {
            println!("{}", render(&snapshot));
            Ok(())
        }
        Err(err) => bail!(user_message(&err, &place)),
    }
}

/// What the user sees for each failure kind.
fn user_message(err: &QueryError, place: &PlaceName) -> String {
    match err {
        QueryError::NotFound { .. } => {
            format!("City '{place}' not found. Check the spelling and try again.")
        }
        QueryError::Network(_) | QueryError::MalformedResponse(_) => {
            "Could not fetch weather data right now. Please try again later.".to_string()
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    config.language = Text::new("Language for place-name search:")
        .with_default(&config.language)
        .prompt()?;

    config.timeout_secs = CustomType::<u64>::new("Timeout per request (seconds):")
        .with_default(config.timeout_secs)
        .with_error_message("Please enter a whole number of seconds")
        .prompt()?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}
