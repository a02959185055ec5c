use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::types::{FieldValue, Location};

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(\d{1,4})[-/.](\d{1,2})[-/.](\d{1,4})").expect("date pattern is valid")
    })
}

fn day_countdown_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)^\s*(\d+)\s*dias?\b").expect("countdown pattern is valid"))
}

/// Find the first calendar date inside page text such as `"Sáb, 05-10-2023 20:00"`.
///
/// A four-digit leading group is read as `yyyy-mm-dd`, anything else as `dd-mm-yyyy`.
/// Two-digit years are taken as 20xx. Time-of-day is ignored.
pub fn parse_page_date(text: &str) -> Result<NaiveDate> {
    let bad = || AppError::Parse { what: "date", text: text.to_string() };
    let caps = date_pattern().captures(text).ok_or_else(bad)?;
    let (a, b, c) = (&caps[1], &caps[2], &caps[3]);

    let (year, month, day) = if a.len() == 4 {
        (a.parse::<i32>(), b.parse::<u32>(), c.parse::<u32>())
    } else {
        let year = c.parse::<i32>().map(|y| if c.len() <= 2 { 2000 + y } else { y });
        (year, b.parse::<u32>(), a.parse::<u32>())
    };
    let (year, month, day) = match (year, month, day) {
        (Ok(y), Ok(m), Ok(d)) => (y, m, d),
        _ => return Err(bad()),
    };
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(bad)
}

/// Absolute whole-day distance between two dates.
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (a - b).num_days().abs()
}

/// Absolute day difference between two page date texts.
pub fn days_difference(a: &str, b: &str) -> Result<i64> {
    Ok(days_between(parse_page_date(a)?, parse_page_date(b)?))
}

/// `true` means the fixture is at the team's own ground.
///
/// The team name only labels the log line; it never affects the outcome.
pub fn infer_location(is_home: bool, team_name: &str) -> Location {
    let location = if is_home { Location::Home } else { Location::Away };
    debug!(team = team_name, %location, "inferred fixture location");
    location
}

/// Countdowns counted in days (`"3 dias"`, `"1 dia"`) become `Int(days)`.
/// Any other text (`"Hoje"`, `"12h"`, `"1 semana"`) is kept verbatim.
pub fn parse_countdown(text: &str) -> FieldValue {
    match day_countdown_pattern()
        .captures(text)
        .and_then(|caps| caps[1].parse::<i64>().ok())
    {
        Some(days) => FieldValue::Int(days),
        None => FieldValue::Text(text.trim().to_string()),
    }
}

/// Form figures are plain decimals; a decimal comma is accepted.
pub fn parse_average(text: &str) -> Result<f64> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| AppError::Parse { what: "form average", text: text.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parses_day_first_and_year_first_dates() {
        assert_eq!(parse_page_date("05-10-2023 20:00").unwrap(), date(2023, 10, 5));
        assert_eq!(parse_page_date("Sáb, 5/10/2023").unwrap(), date(2023, 10, 5));
        assert_eq!(parse_page_date("2023-10-05 20:00").unwrap(), date(2023, 10, 5));
        assert_eq!(parse_page_date("05.10.23").unwrap(), date(2023, 10, 5));
    }

    #[test]
    fn rejects_text_without_a_valid_date() {
        assert!(matches!(parse_page_date("amanhã"), Err(AppError::Parse { .. })));
        assert!(matches!(parse_page_date("31-02-2023"), Err(AppError::Parse { .. })));
    }

    #[test]
    fn same_day_is_zero() {
        assert_eq!(days_difference("05-10-2023", "05-10-2023 21:45").unwrap(), 0);
    }

    #[test]
    fn difference_is_symmetric_across_year_boundary() {
        let a = "30-12-2023";
        let b = "02-01-2024 18:00";
        assert_eq!(days_difference(a, b).unwrap(), 3);
        assert_eq!(days_difference(b, a).unwrap(), 3);
    }

    #[test]
    fn difference_across_month_boundary() {
        assert_eq!(days_difference("28-02-2024", "01-03-2024").unwrap(), 2);
        assert_eq!(days_difference("2023-01-31", "2023-02-01").unwrap(), 1);
    }

    #[test]
    fn location_follows_signal_not_name() {
        for name in ["Porto", "", "Home United", "AWAY FC"] {
            assert_eq!(infer_location(true, name), Location::Home);
            assert_eq!(infer_location(false, name), Location::Away);
        }
    }

    #[test]
    fn countdown_in_days_becomes_integer() {
        assert_eq!(parse_countdown("3 dias"), FieldValue::Int(3));
        assert_eq!(parse_countdown(" 1 Dia "), FieldValue::Int(1));
        assert_eq!(parse_countdown("10dias"), FieldValue::Int(10));
    }

    #[test]
    fn countdown_in_other_units_is_kept_as_text() {
        for text in ["12h", "1 semana", "02-01", "12", "Hoje", "3 diasporas"] {
            assert_eq!(parse_countdown(text), FieldValue::Text(text.to_string()), "{text}");
        }
    }

    #[test]
    fn averages_accept_decimal_comma() {
        assert_eq!(parse_average("1.75").unwrap(), 1.75);
        assert_eq!(parse_average(" 0,5 ").unwrap(), 0.5);
        assert!(parse_average("-").is_err());
    }
}
