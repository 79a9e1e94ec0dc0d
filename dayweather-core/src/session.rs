//! State for one weather display session.
//!
//! The session owns everything the display reads: the city heading, the
//! per-day records and where loading got to. It is filled once by
//! [`WeatherSession::refresh`] and never persisted.

use chrono::FixedOffset;
use serde::Serialize;

use crate::{
    locale::{LabelLocale, offset_from_shift},
    model::{Coordinates, WeatherByDate},
    process::{process_current, process_forecast},
    provider::WeatherSource,
};

pub const LOADING_CITY: &str = "Loading...";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    /// Nothing published yet.
    Loading,
    /// Today's record is published; the forecast is missing.
    CurrentOnly,
    Complete,
    /// No coordinates could be obtained.
    LocationUnavailable,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherSession {
    city: String,
    days: WeatherByDate,
    state: LoadState,
    /// Shift in seconds from UTC at the requested location.
    timezone: i32,
    #[serde(skip)]
    locale: LabelLocale,
}

impl WeatherSession {
    pub fn new(locale: LabelLocale) -> Self {
        Self {
            city: LOADING_CITY.to_string(),
            days: WeatherByDate::new(),
            state: LoadState::Loading,
            timezone: 0,
            locale,
        }
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn days(&self) -> &WeatherByDate {
        &self.days
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn locale(&self) -> &LabelLocale {
        &self.locale
    }

    pub fn utc_offset(&self) -> FixedOffset {
        offset_from_shift(self.timezone)
    }

    pub fn is_loading(&self) -> bool {
        self.days.is_empty()
    }

    pub fn location_unavailable(&mut self) {
        tracing::warn!("no coordinates available, weather will not be requested");
        self.state = LoadState::LocationUnavailable;
    }

    /// Request current conditions, then the forecast, publishing each result
    /// as soon as it is processed.
    ///
    /// Failures are logged and leave the session where it was. Does nothing
    /// once days have been published.
    pub async fn refresh(&mut self, source: &dyn WeatherSource, at: Coordinates) -> LoadState {
        if !self.days.is_empty() {
            tracing::debug!("session already holds weather, skipping refresh");
            return self.state;
        }

        let current = match source.fetch_current(at).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!("current weather request failed: {err:#}");
                return self.state;
            }
        };

        let today = match process_current(&current, &self.locale) {
            Ok(today) => today,
            Err(err) => {
                tracing::error!("current weather payload rejected: {err}");
                return self.state;
            }
        };

        if let Some(name) = current.name.filter(|n| !n.is_empty()) {
            self.city = name;
        }
        self.timezone = current.timezone;
        self.days = today.mapping.clone();
        self.state = LoadState::CurrentOnly;

        let forecast = match source.fetch_forecast(at).await {
            Ok(raw) => raw,
            Err(err) => {
                tracing::error!("forecast request failed: {err:#}");
                return self.state;
            }
        };

        match process_forecast(&forecast, &self.locale, today.mapping) {
            Ok(days) => {
                if self.city == LOADING_CITY {
                    if let Some(name) = forecast.city.name.filter(|n| !n.is_empty()) {
                        self.city = name;
                    }
                }
                self.days = days;
                self.state = LoadState::Complete;
                tracing::debug!(days = self.days.len(), "weather session complete");
            }
            Err(err) => tracing::error!("forecast payload rejected: {err}"),
        }

        self.state
    }
}
