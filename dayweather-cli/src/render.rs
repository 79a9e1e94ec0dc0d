use chrono::FixedOffset;
use dayweather_core::{LabelLocale, WeatherByDate, WeatherRecord};
use std::fmt::Write;

const RULE: &str = "──────────────────────────────";

struct Captions {
    rainfall: &'static str,
    wind: &'static str,
    loading: &'static str,
}

fn captions(locale: &LabelLocale) -> Captions {
    if locale.tag().to_lowercase().starts_with("ko") {
        Captions {
            rainfall: "강수량",
            wind: "풍속",
            loading: "불러오는 중...",
        }
    } else {
        Captions {
            rainfall: "Rainfall",
            wind: "Wind",
            loading: "Loading...",
        }
    }
}

/// Render the city heading followed by one card per day, in date order.
pub fn render_cards(
    city: &str,
    days: &WeatherByDate,
    locale: &LabelLocale,
    offset: FixedOffset,
) -> String {
    let captions = captions(locale);
    let mut out = String::new();

    let _ = writeln!(out, "{city}");
    let _ = writeln!(out);

    if days.is_empty() {
        let _ = writeln!(out, "{}", captions.loading);
        return out;
    }

    for (_, record) in days {
        render_card(&mut out, record, locale, offset, &captions);
        let _ = writeln!(out);
    }

    out
}

fn render_card(
    out: &mut String,
    record: &WeatherRecord,
    locale: &LabelLocale,
    offset: FixedOffset,
    captions: &Captions,
) {
    let local = record.date.with_timezone(&offset);

    let _ = writeln!(out, "{}", locale.heading(&local));
    let _ = writeln!(out, "{}", record.md);
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}°", record.temp);
    let _ = writeln!(out, "{}", record.desc);
    let _ = writeln!(out, "{RULE}");

    if let (Some(max), Some(min)) = (record.temp_max, record.temp_min) {
        let _ = writeln!(out, "{max} ºC / {min} ºC");
    }
    let _ = writeln!(out, "{} {} mm", captions.rainfall, record.rainfall);
    let _ = writeln!(out, "{} {} m/s", captions.wind, record.wind_speed);

    for slot in &record.slots {
        let at = slot.date.with_timezone(&offset);
        let _ = writeln!(
            out,
            "  {}  {:>3}°  {}",
            at.format("%H:%M"),
            slot.temp,
            slot.desc
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayweather_core::{
        RawCurrentResponse, RawForecastResponse, process_current, process_forecast,
    };
    use serde_json::json;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn days(locale: &LabelLocale) -> WeatherByDate {
        let current: RawCurrentResponse = serde_json::from_value(json!({
            "weather": [{ "description": "clear sky" }],
            "main": { "temp": 21.8, "temp_min": 18.2, "temp_max": 23.9 },
            "wind": { "speed": 3.1 },
            "dt": 1_700_000_000,
        }))
        .unwrap();
        let forecast: RawForecastResponse = serde_json::from_value(json!({
            "list": [{
                "weather": [{ "description": "light rain" }],
                "main": { "temp": 9.6 },
                "wind": { "speed": 4.5 },
                "rain": { "3h": 0.75 },
                "dt": 1_700_049_600,
            }],
        }))
        .unwrap();

        let seed = process_current(&current, locale).unwrap().mapping;
        process_forecast(&forecast, locale, seed).unwrap()
    }

    #[test]
    fn renders_a_card_per_day() {
        let locale = LabelLocale::parse("en-US").unwrap();
        let out = render_cards("Seoul", &days(&locale), &locale, utc());

        assert!(out.starts_with("Seoul\n"));
        assert!(out.contains("Tuesday, Nov 14\nNovember 14\n"));
        assert!(out.contains("21°\nclear sky\n"));
        assert!(out.contains("23 ºC / 18 ºC"));
        assert!(out.contains("Rainfall 0.75 mm"));
        assert!(out.contains("  12:00    9°  light rain"));

        let today = out.find("Tuesday").unwrap();
        let tomorrow = out.find("Wednesday").unwrap();
        assert!(today < tomorrow);
    }

    #[test]
    fn forecast_day_has_no_min_max_line() {
        let locale = LabelLocale::parse("en-US").unwrap();
        let out = render_cards("Seoul", &days(&locale), &locale, utc());
        assert_eq!(out.matches("ºC /").count(), 1);
    }

    #[test]
    fn korean_captions() {
        let locale = LabelLocale::parse("ko-KR").unwrap();
        let out = render_cards("서울", &days(&locale), &locale, utc());

        assert!(out.contains("11월 14일 화요일"));
        assert!(out.contains("강수량 0 mm"));
        assert!(out.contains("풍속 3.1 m/s"));
    }

    #[test]
    fn empty_days_render_loading() {
        let locale = LabelLocale::default();
        let out = render_cards("Loading...", &WeatherByDate::new(), &locale, utc());
        assert!(out.ends_with("Loading...\n"));
    }
}
