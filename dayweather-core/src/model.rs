use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, btree_map};
use std::fmt;

/// Geographic position the weather is requested for.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Raw OpenWeather payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct WeatherDescription {
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CurrentMain {
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastMain {
    pub temp: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// Precipitation accumulated over the last hour / three hours, in mm.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Precipitation {
    #[serde(rename = "1h")]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h")]
    pub three_hour: Option<f64>,
}

/// Body of `/data/2.5/weather`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawCurrentResponse {
    pub weather: Vec<WeatherDescription>,
    pub main: CurrentMain,
    pub wind: Wind,
    #[serde(default)]
    pub rain: Option<Precipitation>,
    pub dt: i64,
    #[serde(default)]
    pub name: Option<String>,
    /// Shift in seconds from UTC.
    #[serde(default)]
    pub timezone: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForecastEntry {
    pub weather: Vec<WeatherDescription>,
    pub main: ForecastMain,
    pub wind: Wind,
    #[serde(default)]
    pub rain: Option<Precipitation>,
    pub dt: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastCity {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub timezone: i32,
}

/// Body of `/data/2.5/forecast`: 3-hour slots over several days.
#[derive(Debug, Clone, Deserialize)]
pub struct RawForecastResponse {
    pub list: Vec<ForecastEntry>,
    #[serde(default)]
    pub city: ForecastCity,
}

// ---------------------------------------------------------------------------
// View model
// ---------------------------------------------------------------------------

/// Calendar date (UTC) a reading belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(NaiveDate);

impl DateKey {
    pub fn from_instant(instant: DateTime<Utc>) -> Self {
        Self(instant.date_naive())
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Noon UTC on this date; used to pick the representative forecast slot.
    pub fn midday(&self) -> DateTime<Utc> {
        self.0.and_time(NaiveTime::MIN).and_utc() + Duration::hours(12)
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// One 3-hour forecast reading, already floored and labelled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastSlot {
    pub date: DateTime<Utc>,
    pub temp: i32,
    pub wind_speed: f64,
    pub rainfall: f64,
    pub day: String,
    pub md: String,
    pub desc: String,
}

impl ForecastSlot {
    fn seconds_from_midday(&self) -> i64 {
        let noon = DateKey::from_instant(self.date).midday();
        (self.date - noon).num_seconds().abs()
    }
}

/// Display-ready summary for a single day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    pub date: DateTime<Utc>,
    pub temp: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_max: Option<i32>,
    pub wind_speed: f64,
    pub rainfall: f64,
    pub day: String,
    pub md: String,
    pub desc: String,
    /// Forecast readings that fall on this date, in chronological order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<ForecastSlot>,
}

impl WeatherRecord {
    /// Summarise a forecast-only day from its representative slot.
    fn from_slot(slot: &ForecastSlot, slots: Vec<ForecastSlot>) -> Self {
        Self {
            date: slot.date,
            temp: slot.temp,
            temp_min: None,
            temp_max: None,
            wind_speed: slot.wind_speed,
            rainfall: slot.rainfall,
            day: slot.day.clone(),
            md: slot.md.clone(),
            desc: slot.desc.clone(),
            slots,
        }
    }
}

/// Forecast slots accumulated for one date before being folded into
/// [`WeatherByDate`].
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    pub key: DateKey,
    pub entries: Vec<ForecastSlot>,
}

impl DayBucket {
    /// The slot closest to midday; ties go to the earlier slot.
    pub fn representative(&self) -> Option<&ForecastSlot> {
        self.entries.iter().min_by_key(|s| s.seconds_from_midday())
    }
}

/// Per-day records keyed by date, iterated in date order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeatherByDate(BTreeMap<DateKey, WeatherRecord>);

impl WeatherByDate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, key: &DateKey) -> Option<&WeatherRecord> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &DateKey> {
        self.0.keys()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, DateKey, WeatherRecord> {
        self.0.iter()
    }

    /// Set the record for a date, replacing whatever was there.
    pub fn insert(&mut self, key: DateKey, record: WeatherRecord) -> Option<WeatherRecord> {
        self.0.insert(key, record)
    }

    /// Merge a day's forecast slots.
    ///
    /// An existing record keeps all of its summary fields and only gains the
    /// slots. A new date is summarised from the bucket's representative slot.
    pub fn upsert(&mut self, bucket: DayBucket) {
        match self.0.entry(bucket.key) {
            btree_map::Entry::Occupied(mut existing) => {
                existing.get_mut().slots.extend(bucket.entries);
            }
            btree_map::Entry::Vacant(vacant) => {
                if let Some(rep) = bucket.representative().cloned() {
                    vacant.insert(WeatherRecord::from_slot(&rep, bucket.entries));
                }
            }
        }
    }
}

impl<'a> IntoIterator for &'a WeatherByDate {
    type Item = (&'a DateKey, &'a WeatherRecord);
    type IntoIter = btree_map::Iter<'a, DateKey, WeatherRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
