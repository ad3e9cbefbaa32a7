//! Time helpers
//!
//! Date parsing and day-boundary conversion for the availability query
//! parameters. All instants are UTC; per-location wall-clock rendering is
//! a presentation concern.

use chrono::{DateTime, NaiveDate, Utc};
use shared::{AppError, AppResult};

/// Parse a date string (YYYY-MM-DD).
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| AppError::validation(format!("Invalid date format: {date}")))
}

/// Start of day (00:00:00 UTC).
pub fn day_start(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(0, 0, 0)
        .unwrap_or_default()
        .and_utc()
}

/// Exclusive end of day: next day's 00:00:00 UTC. Callers use `< end`.
pub fn day_end(date: NaiveDate) -> DateTime<Utc> {
    day_start(date.succ_opt().unwrap_or(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates_only() {
        assert!(parse_date("2024-01-15").is_ok());
        assert!(parse_date("15/01/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }

    #[test]
    fn day_bounds_cover_the_whole_day() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let start = day_start(date);
        let end = day_end(date);
        assert_eq!(start.to_rfc3339(), "2024-01-15T00:00:00+00:00");
        assert_eq!((end - start).num_hours(), 24);
    }
}
