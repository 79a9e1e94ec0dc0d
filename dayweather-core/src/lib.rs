//! Core library for the `dayweather` CLI.
//!
//! This crate defines:
//! - Raw OpenWeather payloads and the per-day view model
//! - The processors that reshape current and forecast payloads into
//!   [`WeatherByDate`]
//! - Locale-aware day labels
//! - The OpenWeather client and the session that sequences its two requests
//! - Configuration & credentials handling
//!
//! It is used by `dayweather-cli`, but the processors are plain functions and
//! can be driven by any other front end.

pub mod config;
pub mod error;
pub mod locale;
pub mod model;
pub mod process;
pub mod provider;
pub mod session;

pub use config::Config;
pub use error::{LocaleError, ProcessError};
pub use locale::LabelLocale;
pub use model::{
    Coordinates, DateKey, DayBucket, ForecastSlot, RawCurrentResponse, RawForecastResponse,
    WeatherByDate, WeatherRecord,
};
pub use process::{CurrentDay, group_by_date, process_current, process_forecast};
pub use provider::{WeatherSource, openweather::OpenWeatherProvider, source_from_config};
pub use session::{LoadState, WeatherSession};
