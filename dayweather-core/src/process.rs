//! Reshaping of raw OpenWeather payloads into [`WeatherByDate`].

use chrono::{DateTime, FixedOffset, Utc};

use crate::{
    error::ProcessError,
    locale::{LabelLocale, offset_from_shift},
    model::{
        DateKey, DayBucket, ForecastEntry, ForecastSlot, RawCurrentResponse, RawForecastResponse,
        WeatherByDate, WeatherDescription, WeatherRecord,
    },
};

/// Result of processing the current-conditions payload.
#[derive(Debug, Clone)]
pub struct CurrentDay {
    pub key: DateKey,
    pub record: WeatherRecord,
    /// A mapping holding only `record`, ready to seed forecast processing.
    pub mapping: WeatherByDate,
}

/// Turn the current-conditions response into today's record.
pub fn process_current(
    raw: &RawCurrentResponse,
    locale: &LabelLocale,
) -> Result<CurrentDay, ProcessError> {
    let instant = instant(raw.dt)?;
    let local = instant.with_timezone(&offset_from_shift(raw.timezone));
    let key = DateKey::from_instant(instant);

    let record = WeatherRecord {
        date: instant,
        temp: floor(raw.main.temp),
        temp_min: Some(floor(raw.main.temp_min)),
        temp_max: Some(floor(raw.main.temp_max)),
        wind_speed: raw.wind.speed,
        rainfall: raw.rain.as_ref().and_then(|r| r.one_hour).unwrap_or(0.0),
        day: locale.weekday(&local),
        md: locale.month_day(&local),
        desc: description(&raw.weather, raw.dt)?,
        slots: Vec::new(),
    };

    let mut mapping = WeatherByDate::new();
    mapping.insert(key, record.clone());

    tracing::debug!(%key, temp = record.temp, "processed current conditions");

    Ok(CurrentDay {
        key,
        record,
        mapping,
    })
}

/// Fold the 3-hour forecast into `seed`.
///
/// Dates already in `seed` keep their summary and gain the forecast slots;
/// new dates are summarised from the slot nearest midday.
pub fn process_forecast(
    raw: &RawForecastResponse,
    locale: &LabelLocale,
    seed: WeatherByDate,
) -> Result<WeatherByDate, ProcessError> {
    let offset = offset_from_shift(raw.city.timezone);
    let buckets = group_by_date(&raw.list, locale, offset)?;

    tracing::debug!(
        entries = raw.list.len(),
        days = buckets.len(),
        "grouped forecast entries"
    );

    let mut days = seed;
    for bucket in buckets {
        days.upsert(bucket);
    }

    Ok(days)
}

/// Group forecast entries by date, preserving the order entries and dates
/// are first encountered in.
pub fn group_by_date(
    entries: &[ForecastEntry],
    locale: &LabelLocale,
    offset: FixedOffset,
) -> Result<Vec<DayBucket>, ProcessError> {
    let mut buckets: Vec<DayBucket> = Vec::new();

    for entry in entries {
        let (key, slot) = forecast_slot(entry, locale, offset)?;

        match buckets.iter_mut().find(|b| b.key == key) {
            Some(bucket) => bucket.entries.push(slot),
            None => buckets.push(DayBucket {
                key,
                entries: vec![slot],
            }),
        }
    }

    Ok(buckets)
}

fn forecast_slot(
    entry: &ForecastEntry,
    locale: &LabelLocale,
    offset: FixedOffset,
) -> Result<(DateKey, ForecastSlot), ProcessError> {
    let instant = instant(entry.dt)?;
    let local = instant.with_timezone(&offset);

    let slot = ForecastSlot {
        date: instant,
        temp: floor(entry.main.temp),
        wind_speed: entry.wind.speed,
        rainfall: entry.rain.as_ref().and_then(|r| r.three_hour).unwrap_or(0.0),
        day: locale.weekday(&local),
        md: locale.month_day(&local),
        desc: description(&entry.weather, entry.dt)?,
    };

    Ok((DateKey::from_instant(instant), slot))
}

fn instant(dt: i64) -> Result<DateTime<Utc>, ProcessError> {
    DateTime::from_timestamp(dt, 0).ok_or(ProcessError::TimestampOutOfRange(dt))
}

fn description(weather: &[WeatherDescription], dt: i64) -> Result<String, ProcessError> {
    weather
        .first()
        .map(|w| w.description.clone())
        .ok_or(ProcessError::NoDescription { dt })
}

fn floor(value: f64) -> i32 {
    value.floor() as i32
}
