//! Locale-aware day labels.
//!
//! Weekday and month names come from chrono's locale tables. The ordering of
//! day and month differs per language, so each family carries its own
//! patterns.

use chrono::{DateTime, FixedOffset, Locale, Offset, Utc};
use std::fmt;

use crate::error::LocaleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Korean,
    Japanese,
    Chinese,
    English,
    Other,
}

impl Family {
    fn of(language: &str) -> Self {
        match language {
            "ko" => Family::Korean,
            "ja" => Family::Japanese,
            "zh" => Family::Chinese,
            "en" => Family::English,
            _ => Family::Other,
        }
    }

    /// Pattern for the "day of month + month" label.
    fn month_day(self) -> &'static str {
        match self {
            Family::Korean => "%-m월 %-d일",
            Family::Japanese | Family::Chinese => "%-m月%-d日",
            Family::English => "%B %-d",
            Family::Other => "%-d %B",
        }
    }

    /// Pattern for the card heading: long weekday, short month, numeric day.
    fn heading(self) -> &'static str {
        match self {
            Family::Korean => "%-m월 %-d일 %A",
            Family::Japanese | Family::Chinese => "%-m月%-d日%A",
            Family::English => "%A, %b %-d",
            Family::Other => "%A %-d %b",
        }
    }
}

/// Locale used to render `day`, `md` and card headings.
#[derive(Debug, Clone)]
pub struct LabelLocale {
    tag: String,
    locale: Locale,
    family: Family,
}

impl LabelLocale {
    /// Parse a tag like `ko-KR`, `ko_KR` or a bare language such as `de`.
    pub fn parse(tag: &str) -> Result<Self, LocaleError> {
        let posix = tag.trim().replace('-', "_");
        let (language, region) = match posix.split_once('_') {
            Some((lang, region)) => (lang.to_lowercase(), Some(region.to_uppercase())),
            None => (posix.to_lowercase(), None),
        };

        let candidate = match region {
            Some(region) => format!("{language}_{region}"),
            None => default_region(&language),
        };

        let locale = Locale::try_from(candidate.as_str())
            .map_err(|_| LocaleError::Unknown(tag.to_string()))?;

        Ok(Self {
            tag: tag.to_string(),
            locale,
            family: Family::of(&language),
        })
    }

    /// Like [`LabelLocale::parse`], falling back to English names when the tag
    /// is not recognised.
    pub fn parse_or_default(tag: &str) -> Self {
        Self::parse(tag).unwrap_or_else(|err| {
            tracing::warn!("{err} Falling back to English labels.");
            Self::default()
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Long weekday name, e.g. `화요일` or `Tuesday`.
    pub fn weekday(&self, at: &DateTime<FixedOffset>) -> String {
        at.format_localized("%A", self.locale).to_string()
    }

    /// Day of month with the long month name, e.g. `11월 14일` or `November 14`.
    pub fn month_day(&self, at: &DateTime<FixedOffset>) -> String {
        at.format_localized(self.family.month_day(), self.locale).to_string()
    }

    pub fn heading(&self, at: &DateTime<FixedOffset>) -> String {
        at.format_localized(self.family.heading(), self.locale).to_string()
    }
}

impl Default for LabelLocale {
    fn default() -> Self {
        Self {
            tag: "en-US".to_string(),
            locale: Locale::en_US,
            family: Family::English,
        }
    }
}

impl fmt::Display for LabelLocale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)
    }
}

fn default_region(language: &str) -> String {
    match language {
        "ko" => "ko_KR".to_string(),
        "en" => "en_US".to_string(),
        "ja" => "ja_JP".to_string(),
        "zh" => "zh_CN".to_string(),
        other => format!("{other}_{}", other.to_uppercase()),
    }
}

/// Local offset for a shift in seconds from UTC, as reported by OpenWeather.
pub fn offset_from_shift(shift_seconds: i32) -> FixedOffset {
    FixedOffset::east_opt(shift_seconds).unwrap_or_else(|| {
        tracing::warn!(shift_seconds, "timezone shift out of range, labelling in UTC");
        Utc.fix()
    })
}
