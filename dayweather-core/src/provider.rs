use crate::{
    Config,
    model::{Coordinates, RawCurrentResponse, RawForecastResponse},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// Where raw weather payloads come from.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    async fn fetch_current(&self, at: Coordinates) -> anyhow::Result<RawCurrentResponse>;

    async fn fetch_forecast(&self, at: Coordinates) -> anyhow::Result<RawForecastResponse>;
}

/// Construct the OpenWeather source from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<OpenWeatherProvider> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `dayweather configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    OpenWeatherProvider::builder(api_key.to_owned())
        .units(&config.units)
        .lang(&config.lang)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn source_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = source_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
        assert!(err.to_string().contains("dayweather configure"));
    }

    #[test]
    fn source_from_config_works_when_key_set() {
        let cfg = Config {
            api_key: Some("KEY".into()),
            ..Config::default()
        };

        assert!(source_from_config(&cfg).is_ok());
    }
}
