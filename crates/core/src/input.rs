//! Raw input conversion.
//!
//! Form inputs arrive as text. This module is the single place where that text becomes a
//! typed field value. A value that cannot be converted is reported as an error naming the
//! field; it is never replaced by zero. An empty (or whitespace-only) input means the user
//! cleared the field.

use crate::{FormError, FormResult};
use chrono::{NaiveDate, NaiveTime};

/// Parse a whole, non-negative count such as cigarettes per day or age in years.
///
/// An empty input is the cleared value `0`.
pub fn parse_count(field: &'static str, raw: &str) -> FormResult<u32> {
    Ok(parse_optional_count(field, raw)?.unwrap_or(0))
}

/// Parse an optional count. An empty input is `None`.
pub fn parse_optional_count(field: &'static str, raw: &str) -> FormResult<Option<u32>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| FormError::InvalidNumber {
            field,
            input: raw.to_owned(),
        })
}

/// Parse a finite, non-negative measurement such as hours of sleep or body temperature.
///
/// An empty input is the cleared value `0.0`.
pub fn parse_measure(field: &'static str, raw: &str) -> FormResult<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(FormError::InvalidNumber {
            field,
            input: raw.to_owned(),
        }),
    }
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(field: &'static str, raw: &str) -> FormResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| FormError::InvalidDate {
        field,
        input: raw.to_owned(),
    })
}

/// Parse an `HH:MM` clock time.
pub fn parse_time(field: &'static str, raw: &str) -> FormResult<NaiveTime> {
    census::hhmm::parse(raw).map_err(|_| FormError::InvalidTime {
        field,
        input: raw.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_accepts_digits_and_clears_on_empty() {
        assert_eq!(parse_count("cigarettes_per_day", "20").unwrap(), 20);
        assert_eq!(parse_count("cigarettes_per_day", " 7 ").unwrap(), 7);
        assert_eq!(parse_count("cigarettes_per_day", "").unwrap(), 0);
    }

    #[test]
    fn count_rejects_garbage_instead_of_zeroing() {
        let err = parse_count("cigarettes_per_day", "twenty").expect_err("not a number");
        match err {
            FormError::InvalidNumber { field, input } => {
                assert_eq!(field, "cigarettes_per_day");
                assert_eq!(input, "twenty");
            }
            other => panic!("expected InvalidNumber, got {other:?}"),
        }
        assert!(parse_count("children", "-1").is_err());
        assert!(parse_count("children", "2.5").is_err());
    }

    #[test]
    fn optional_count_maps_empty_to_none() {
        assert_eq!(parse_optional_count("end_age", "  ").unwrap(), None);
        assert_eq!(parse_optional_count("end_age", "50").unwrap(), Some(50));
    }

    #[test]
    fn measure_rejects_negative_and_non_finite() {
        assert_eq!(parse_measure("hours_per_night", "7.5").unwrap(), 7.5);
        assert_eq!(parse_measure("hours_per_night", "").unwrap(), 0.0);
        assert!(parse_measure("hours_per_night", "-1").is_err());
        assert!(parse_measure("hours_per_night", "NaN").is_err());
        assert!(parse_measure("hours_per_night", "inf").is_err());
    }

    #[test]
    fn dates_and_times_use_form_formats() {
        let date = parse_date("record_date", "2025-05-20").unwrap();
        assert_eq!(date.to_string(), "2025-05-20");
        assert!(matches!(
            parse_date("record_date", "20/05/2025"),
            Err(FormError::InvalidDate { .. })
        ));

        let time = parse_time("record_time", "09:05").unwrap();
        assert_eq!(time.format("%H:%M").to_string(), "09:05");
        assert!(matches!(
            parse_time("record_time", "9am"),
            Err(FormError::InvalidTime { .. })
        ));
    }
}
