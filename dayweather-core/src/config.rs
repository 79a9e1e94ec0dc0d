use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{locale::LabelLocale, model::Coordinates};

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// locale = "ko-KR"
///
/// [location]
/// latitude = 37.5665
/// longitude = 126.978
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// OpenWeather `appid`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Locale tag for day labels, e.g. "ko-KR" or "en-US".
    pub locale: String,

    /// Language of the API's weather descriptions (`lang` query parameter).
    pub lang: String,

    /// Unit system requested from the API (`units` query parameter).
    pub units: String,

    /// Coordinates used when none are given on the command line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinates>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            locale: "ko-KR".to_string(),
            lang: "kr".to_string(),
            units: "metric".to_string(),
            location: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "dayweather", "dayweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply overrides from the environment, looked up through `var`.
    pub fn with_env_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = var(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        self
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn label_locale(&self) -> LabelLocale {
        LabelLocale::parse_or_default(&self.locale)
    }

    /// Coordinates to query: explicit ones win over the configured location.
    pub fn resolve_location(&self, explicit: Option<Coordinates>) -> Option<Coordinates> {
        explicit.or(self.location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_korean_metric_setup() {
        let cfg = Config::default();

        assert_eq!(cfg.locale, "ko-KR");
        assert_eq!(cfg.lang, "kr");
        assert_eq!(cfg.units, "metric");
        assert!(cfg.api_key().is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml(
            r#"
            api_key = "OPEN_KEY"

            [location]
            latitude = 37.5665
            longitude = 126.978
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.api_key(), Some("OPEN_KEY"));
        assert_eq!(cfg.locale, "ko-KR");
        assert_eq!(
            cfg.location,
            Some(Coordinates {
                latitude: 37.5665,
                longitude: 126.978
            })
        );
    }

    #[test]
    fn toml_roundtrip_preserves_fields() {
        let cfg = Config {
            api_key: Some("K".into()),
            locale: "en-US".into(),
            location: Some(Coordinates {
                latitude: 1.5,
                longitude: -2.25,
            }),
            ..Config::default()
        };

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();

        assert_eq!(back.api_key(), Some("K"));
        assert_eq!(back.locale, "en-US");
        assert_eq!(back.location, cfg.location);
    }

    #[test]
    fn env_key_overrides_stored_key() {
        let cfg = Config {
            api_key: Some("STORED".into()),
            ..Config::default()
        }
        .with_env_overrides(|name| (name == API_KEY_ENV).then(|| "FROM_ENV".to_string()));

        assert_eq!(cfg.api_key(), Some("FROM_ENV"));
    }

    #[test]
    fn blank_env_key_is_ignored() {
        let cfg = Config {
            api_key: Some("STORED".into()),
            ..Config::default()
        }
        .with_env_overrides(|_| Some("  ".to_string()));

        assert_eq!(cfg.api_key(), Some("STORED"));
    }

    #[test]
    fn explicit_location_wins() {
        let configured = Coordinates {
            latitude: 1.0,
            longitude: 1.0,
        };
        let explicit = Coordinates {
            latitude: 2.0,
            longitude: 2.0,
        };
        let cfg = Config {
            location: Some(configured),
            ..Config::default()
        };

        assert_eq!(cfg.resolve_location(Some(explicit)), Some(explicit));
        assert_eq!(cfg.resolve_location(None), Some(configured));
    }
}
