//! Text encoding conventions for persisted values.
//!
//! Decimals, timestamps, and dates are stored as TEXT in fixed-width formats
//! that sort lexicographically, so range filters can compare strings in SQL.
//! Reads are tolerant: a malformed stored value logs an error and falls back
//! to a sentinel instead of panicking.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use log::error;
use rust_decimal::Decimal;
use uuid::Uuid;

/// `%Y-%m-%d`, lexicographically ordered.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// RFC3339 UTC with fixed six-digit fractional seconds, lexicographically
/// ordered.
pub fn fmt_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp_lossy(raw: &str, context: &str) -> DateTime<Utc> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => ts.with_timezone(&Utc),
        Err(e) => {
            error!("Invalid stored timestamp '{}' for {}: {}", raw, context, e);
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}

pub fn fmt_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date_lossy(raw: &str, context: &str) -> NaiveDate {
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(date) => date,
        Err(e) => {
            error!("Invalid stored date '{}' for {}: {}", raw, context, e);
            NaiveDate::default()
        }
    }
}

pub fn parse_decimal_lossy(raw: &str, context: &str) -> Decimal {
    match raw.parse::<Decimal>() {
        Ok(value) => value,
        Err(e) => {
            error!("Invalid stored decimal '{}' for {}: {}", raw, context, e);
            Decimal::ZERO
        }
    }
}

/// Parses a stored enum discriminant, falling back when the value is not one
/// the current build knows about.
pub fn parse_enum_lossy<T>(raw: &str, context: &str, fallback: T) -> T
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw.parse::<T>() {
        Ok(value) => value,
        Err(e) => {
            error!("Invalid stored value '{}' for {}: {}", raw, context, e);
            fallback
        }
    }
}

pub fn parse_uuid_lossy(raw: &str, context: &str) -> Uuid {
    match Uuid::parse_str(raw) {
        Ok(id) => id,
        Err(e) => {
            error!("Invalid stored id '{}' for {}: {}", raw, context, e);
            Uuid::nil()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_round_trip_and_ordering() {
        let early = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        assert_eq!(parse_timestamp_lossy(&fmt_timestamp(early), "test"), early);
        // fixed-width format keeps string order == time order
        assert!(fmt_timestamp(early) < fmt_timestamp(late));
    }

    #[test]
    fn test_lossy_parses_fall_back() {
        assert_eq!(
            parse_timestamp_lossy("garbage", "test"),
            DateTime::<Utc>::UNIX_EPOCH
        );
        assert_eq!(parse_date_lossy("03/01/2024", "test"), NaiveDate::default());
        assert_eq!(parse_decimal_lossy("NaN-ish", "test"), Decimal::ZERO);
        assert_eq!(parse_uuid_lossy("not-a-uuid", "test"), Uuid::nil());
    }
}
