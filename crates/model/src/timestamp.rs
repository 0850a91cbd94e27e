use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::ValidationError;

// RFC 3339 alone would also accept fractional seconds, lowercase separators and
// a space instead of `T`. Only the strict form with an explicit offset is
// allowed.
static ISO_8601_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}([+-]\d{2}:\d{2}|Z)$")
        .expect("timestamp pattern is valid")
});

/// Parses `YYYY-MM-DDTHH:MM:SS` followed by `±HH:MM` or `Z` into a UTC instant.
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, ValidationError> {
    if !ISO_8601_PATTERN.is_match(s) {
        return Err(ValidationError::InvalidDate);
    }
    DateTime::parse_from_rfc3339(s)
        .map(|date_time| date_time.with_timezone(&Utc))
        .map_err(|_| ValidationError::InvalidDate)
}
