use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use dayweather_core::{
    Config, Coordinates, LabelLocale, LoadState, WeatherSession, source_from_config,
};
use inquire::{
    Confirm, CustomType, CustomUserError, Password, PasswordDisplayMode, Text,
    validator::Validation,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "dayweather", version, about = "Daily weather cards from OpenWeather")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the API key, locale and default location.
    Configure,

    /// Show today's conditions and the coming days.
    Show {
        /// Latitude; overrides the configured location.
        #[arg(long, requires = "lon", allow_negative_numbers = true)]
        lat: Option<f64>,

        /// Longitude; overrides the configured location.
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lon: Option<f64>,

        /// Locale for day labels, e.g. "ko-KR" or "en-US".
        #[arg(long)]
        locale: Option<String>,

        /// Print the session as JSON instead of cards.
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show {
                lat,
                lon,
                locale,
                json,
            } => {
                let explicit = lat
                    .zip(lon)
                    .map(|(latitude, longitude)| Coordinates { latitude, longitude });
                show(explicit, locale, json).await
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let key_prompt = if config.api_key().is_some() {
        "OpenWeather API key (leave empty to keep the current one):"
    } else {
        "OpenWeather API key:"
    };
    let api_key = Password::new(key_prompt)
        .without_confirmation()
        .with_display_mode(PasswordDisplayMode::Masked)
        .prompt()
        .context("API key prompt aborted")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let current_locale = config.locale.clone();
    config.locale = Text::new("Locale for day labels:")
        .with_default(&current_locale)
        .with_validator(|tag: &str| {
            Ok::<_, CustomUserError>(match LabelLocale::parse(tag) {
                Ok(_) => Validation::Valid,
                Err(err) => Validation::Invalid(err.to_string().into()),
            })
        })
        .prompt()
        .context("Locale prompt aborted")?;

    let save_location = Confirm::new("Save a default location?")
        .with_default(config.location.is_some())
        .prompt()
        .context("Location prompt aborted")?;

    if save_location {
        let latitude = CustomType::<f64>::new("Latitude:")
            .with_error_message("Please enter a number, e.g. 37.5665")
            .prompt()
            .context("Latitude prompt aborted")?;
        let longitude = CustomType::<f64>::new("Longitude:")
            .with_error_message("Please enter a number, e.g. 126.978")
            .prompt()
            .context("Longitude prompt aborted")?;
        config.location = Some(Coordinates {
            latitude,
            longitude,
        });
    }

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());

    Ok(())
}

async fn show(
    explicit: Option<Coordinates>,
    locale: Option<String>,
    json: bool,
) -> anyhow::Result<()> {
    let config = Config::load()?.with_env_overrides(|name| std::env::var(name).ok());

    let locale = match locale {
        Some(tag) => LabelLocale::parse(&tag)?,
        None => config.label_locale(),
    };
    let mut session = WeatherSession::new(locale);

    match config.resolve_location(explicit) {
        Some(at) => {
            tracing::debug!(?at, locale = %session.locale(), "refreshing weather");
            let source = source_from_config(&config)?;
            session.refresh(&source, at).await;
        }
        None => session.location_unavailable(),
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        print!(
            "{}",
            render::render_cards(
                session.city(),
                session.days(),
                session.locale(),
                session.utc_offset()
            )
        );
    }

    match session.state() {
        LoadState::LocationUnavailable => bail!(
            "No location to query.\n\
             Hint: pass --lat and --lon, or run `dayweather configure` to save one."
        ),
        LoadState::Loading => bail!("Weather data is unavailable; see the errors above."),
        LoadState::CurrentOnly | LoadState::Complete => Ok(()),
    }
}
