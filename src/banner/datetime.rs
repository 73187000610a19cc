//! Datetime overlay - formats the note's datetime property or the current time

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt::Write;
use tracing::debug;

use crate::settings::DeviceSettings;

/// Formatted time and date for the overlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatetimeDisplay {
    pub time: String,
    pub date: String,

    /// Machine-readable value, `YYYY-MM-DDTHH:MM:SS`
    pub iso: String,

    /// Taken from the note rather than the clock
    pub from_property: bool,
}

/// Build the overlay for one note. `value` is the note's datetime property.
/// Returns `None` when the overlay is disabled, prop-only without a property,
/// or the property is not a date.
pub fn datetime_display(
    settings: &DeviceSettings,
    value: Option<&str>,
    now: NaiveDateTime,
) -> Option<DatetimeDisplay> {
    if !settings.datetime_enabled {
        return None;
    }

    let value = value.map(str::trim).filter(|v| !v.is_empty());
    match value {
        Some(value) => {
            let Some(parsed) = parse_datetime(value) else {
                debug!(value, "datetime property is not a date");
                return None;
            };
            let has_time = value.contains('T');
            let mut display = render(settings, parsed, true);
            if !has_time {
                display.time.clear();
            }
            Some(display)
        }
        None if settings.datetime_on_prop_only => None,
        None => Some(render(settings, now, false)),
    }
}

fn render(settings: &DeviceSettings, dt: NaiveDateTime, from_property: bool) -> DatetimeDisplay {
    DatetimeDisplay {
        time: format_with(dt, &settings.datetime_time_format),
        date: format_with(dt, &settings.datetime_date_format),
        iso: dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
        from_property,
    }
}

/// A moment.js token and what it renders
enum Field {
    /// Rendered by chrono with this strftime item
    Chrono(&'static str),
    /// Day of month with English suffix, `1st`
    Ordinal,
    /// Two-letter weekday, `Mo`
    ShortWeekday,
    /// `am` / `pm`
    LowerMeridiem,
    Quarter,
}

/// Longest tokens first so `MMMM` wins over `MM`
const TOKENS: &[(&str, Field)] = &[
    ("YYYY", Field::Chrono("%Y")),
    ("MMMM", Field::Chrono("%B")),
    ("dddd", Field::Chrono("%A")),
    ("DDDD", Field::Chrono("%j")),
    ("MMM", Field::Chrono("%b")),
    ("ddd", Field::Chrono("%a")),
    ("DDD", Field::Chrono("%-j")),
    ("YY", Field::Chrono("%y")),
    ("MM", Field::Chrono("%m")),
    ("Do", Field::Ordinal),
    ("DD", Field::Chrono("%d")),
    ("dd", Field::ShortWeekday),
    ("HH", Field::Chrono("%H")),
    ("hh", Field::Chrono("%I")),
    ("mm", Field::Chrono("%M")),
    ("ss", Field::Chrono("%S")),
    ("WW", Field::Chrono("%V")),
    ("M", Field::Chrono("%-m")),
    ("D", Field::Chrono("%-d")),
    ("d", Field::Chrono("%w")),
    ("H", Field::Chrono("%-H")),
    ("h", Field::Chrono("%-I")),
    ("m", Field::Chrono("%-M")),
    ("s", Field::Chrono("%-S")),
    ("W", Field::Chrono("%-V")),
    ("A", Field::Chrono("%p")),
    ("a", Field::LowerMeridiem),
    ("Q", Field::Quarter),
];

impl Field {
    fn render(&self, dt: NaiveDateTime, out: &mut String) {
        match self {
            Field::Chrono(item) => {
                let _ = write!(out, "{}", dt.format(item));
            }
            Field::Ordinal => {
                let day = dt.day();
                let suffix = match (day % 10, day % 100) {
                    (_, 11..=13) => "th",
                    (1, _) => "st",
                    (2, _) => "nd",
                    (3, _) => "rd",
                    _ => "th",
                };
                let _ = write!(out, "{}{}", day, suffix);
            }
            Field::ShortWeekday => {
                let name = dt.format("%a").to_string();
                out.extend(name.chars().take(2));
            }
            Field::LowerMeridiem => {
                out.push_str(&dt.format("%p").to_string().to_lowercase());
            }
            Field::Quarter => {
                let _ = write!(out, "{}", dt.month0() / 3 + 1);
            }
        }
    }
}

/// Format with a moment.js style pattern. Text in `[...]` is copied as is,
/// and characters that are not tokens pass through.
fn format_with(dt: NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    let mut rest = pattern;

    while let Some(c) = rest.chars().next() {
        if c == '[' {
            if let Some(end) = rest.find(']') {
                out.push_str(&rest[1..end]);
                rest = &rest[end + 1..];
                continue;
            }
        }

        match TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
            Some((token, field)) => {
                field.render(dt, &mut out);
                rest = &rest[token.len()..];
            }
            None => {
                out.push(c);
                rest = &rest[c.len_utf8()..];
            }
        }
    }

    out
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` and `YYYY-MM-DD`
fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    for pattern in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, pattern) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enabled() -> DeviceSettings {
        DeviceSettings {
            datetime_enabled: true,
            datetime_time_format: "HH:mm".to_string(),
            datetime_date_format: "YYYY/MM/DD".to_string(),
            ..DeviceSettings::default()
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_disabled() {
        let settings = DeviceSettings::default();
        assert!(datetime_display(&settings, Some("2024-01-01"), now()).is_none());
    }

    #[test]
    fn test_clock() {
        let display = datetime_display(&enabled(), None, now()).unwrap();
        assert_eq!(display.time, "09:30");
        assert_eq!(display.date, "2024/05/01");
        assert_eq!(display.iso, "2024-05-01T09:30:00");
        assert!(!display.from_property);
    }

    #[test]
    fn test_property_value() {
        let display = datetime_display(&enabled(), Some("2023-12-24T18:05"), now()).unwrap();
        assert_eq!(display.time, "18:05");
        assert_eq!(display.date, "2023/12/24");
        assert!(display.from_property);

        // Date-only values show no time
        let display = datetime_display(&enabled(), Some("2023-12-24"), now()).unwrap();
        assert_eq!(display.time, "");
        assert_eq!(display.date, "2023/12/24");
    }

    #[test]
    fn test_prop_only() {
        let settings = DeviceSettings { datetime_on_prop_only: true, ..enabled() };
        assert!(datetime_display(&settings, None, now()).is_none());
        assert!(datetime_display(&settings, Some("2023-12-24"), now()).is_some());
    }

    #[test]
    fn test_bad_values() {
        assert!(datetime_display(&enabled(), Some("next tuesday"), now()).is_none());

        let settings = DeviceSettings {
            datetime_time_format: String::new(),
            datetime_date_format: String::new(),
            ..enabled()
        };
        let display = datetime_display(&settings, None, now()).unwrap();
        assert_eq!(display.time, "");
        assert_eq!(display.date, "");
    }

    #[test]
    fn test_default_formats() {
        let settings = DeviceSettings {
            datetime_enabled: true,
            ..DeviceSettings::default()
        };
        let display = datetime_display(&settings, None, now()).unwrap();
        assert_eq!(display.time, "09:30");
        assert_eq!(display.date, "Wednesday, May 1st 2024");

        let display = datetime_display(&settings, Some("2023-12-22T18:05"), now()).unwrap();
        assert_eq!(display.time, "18:05");
        assert_eq!(display.date, "Friday, December 22nd 2023");
    }

    #[test]
    fn test_pattern_tokens() {
        let dt = NaiveDate::from_ymd_opt(2024, 11, 13)
            .unwrap()
            .and_hms_opt(15, 4, 5)
            .unwrap();

        assert_eq!(format_with(dt, "h:mm a"), "3:04 pm");
        assert_eq!(format_with(dt, "hh:mm:ss A"), "03:04:05 PM");
        assert_eq!(format_with(dt, "ddd D MMM YY"), "Wed 13 Nov 24");
        assert_eq!(format_with(dt, "dd Do [of] MMMM, [Q]Q"), "We 13th of November, Q4");
        assert_eq!(format_with(dt, "M/D"), "11/13");
        assert_eq!(format_with(dt, "[open"), "[open");
        assert_eq!(format_with(dt, "🦀 HH"), "🦀 15");
    }
}
