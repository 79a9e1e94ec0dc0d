use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::model::{Coordinates, RawCurrentResponse, RawForecastResponse};

use super::WeatherSource;

const BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: String,
    lang: String,
    http: Client,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherBuilder {
    api_key: String,
    base_url: String,
    units: String,
    lang: String,
}

impl OpenWeatherBuilder {
    /// Point the provider at another host, e.g. a mock server.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn units(mut self, units: &str) -> Self {
        self.units = units.to_string();
        self
    }

    pub fn lang(mut self, lang: &str) -> Self {
        self.lang = lang.to_string();
        self
    }

    pub fn build(self) -> Result<OpenWeatherProvider> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(OpenWeatherProvider {
            api_key: self.api_key,
            base_url: self.base_url,
            units: self.units,
            lang: self.lang,
            http,
        })
    }
}

impl OpenWeatherProvider {
    pub fn builder(api_key: String) -> OpenWeatherBuilder {
        OpenWeatherBuilder {
            api_key,
            base_url: BASE_URL.to_string(),
            units: "metric".to_string(),
            lang: "kr".to_string(),
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, endpoint: &str, at: Coordinates) -> Result<T> {
        let url = format!("{}/{endpoint}", self.base_url);
        let lat = at.latitude.to_string();
        let lon = at.longitude.to_string();

        tracing::debug!(endpoint, %lat, %lon, "requesting OpenWeather");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {endpoint} JSON"))
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherProvider {
    async fn fetch_current(&self, at: Coordinates) -> Result<RawCurrentResponse> {
        self.fetch("weather", at).await
    }

    async fn fetch_forecast(&self, at: Coordinates) -> Result<RawForecastResponse> {
        self.fetch("forecast", at).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_body_is_untouched() {
        assert_eq!(truncate_body("oops"), "oops");
    }

    #[test]
    fn long_body_is_cut_on_char_boundary() {
        let body = "비".repeat(250);
        let cut = truncate_body(&body);
        assert!(cut.ends_with("..."));
        assert_eq!(cut.chars().count(), 203);
    }

    #[test]
    fn builder_strips_trailing_slash() {
        let provider = OpenWeatherProvider::builder("KEY".into())
            .base_url("http://localhost:1234/")
            .build()
            .unwrap();
        assert_eq!(provider.base_url, "http://localhost:1234");
        assert_eq!(provider.units, "metric");
        assert_eq!(provider.lang, "kr");
    }
}
