// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting and parsing.

use crate::error::AppError;
use chrono::{DateTime, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parse an optional RFC3339 query parameter into UTC.
pub fn parse_rfc3339_param(name: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>, AppError> {
    raw.map(|value| {
        DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| {
                AppError::BadRequest(format!(
                    "Invalid '{name}' parameter: must be RFC3339 datetime"
                ))
            })
    })
    .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_uses_z_suffix() {
        let date = Utc.with_ymd_and_hms(2026, 3, 1, 7, 30, 0).unwrap();
        assert_eq!(format_utc_rfc3339(date), "2026-03-01T07:30:00Z");
    }

    #[test]
    fn test_parse_converts_offset_to_utc() {
        let parsed = parse_rfc3339_param("start_date", Some("2026-03-01T09:30:00+02:00"))
            .unwrap()
            .unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2026, 3, 1, 7, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_rfc3339_param("end_date", Some("yesterday")).unwrap_err();
        assert!(err.to_string().contains("end_date"));
        assert!(parse_rfc3339_param("end_date", None).unwrap().is_none());
    }
}
