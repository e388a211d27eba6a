//! Date conversion between API strings, form state and grid display

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};

static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap()
});

static ISO_DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})?$").unwrap()
});

/// Parse an API date, accepting a plain date or an ISO date-time
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();

    if ISO_DATE_REGEX.is_match(raw) {
        return NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| Error::InvalidDate(raw.to_string()));
    }

    if ISO_DATETIME_REGEX.is_match(raw) {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw.replacen(' ', "T", 1)) {
            return Ok(dt.date_naive());
        }
        // No offset: read it as a local wall-clock time
        let without_zone = raw.replacen('T', " ", 1);
        for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(&without_zone, format) {
                return Ok(dt.date());
            }
        }
    }

    Err(Error::InvalidDate(raw.to_string()))
}

/// Format any accepted API date shape as `YYYY-MM-DD` for a payload
pub fn format_api_date(raw: &str) -> Result<String> {
    parse_date(raw).map(to_api_date)
}

pub fn to_api_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Lenient reader for API responses: anything unparsable becomes `None`
pub fn parse_api_date(value: &Value) -> Option<NaiveDate> {
    value.as_str().and_then(|s| parse_date(s).ok())
}

/// `DD.MM.YYYY`, the format data grids show
pub fn format_display_date(date: NaiveDate) -> String {
    date.format("%d.%m.%Y").to_string()
}
