//! Month-precision dates.
//!
//! The wire format is `MM-YYYY`; internally a month is the first day of that
//! month at midnight UTC.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::errors::ModelError;

/// Parse `MM-YYYY` into the first instant of that month (UTC).
pub fn parse_month(raw: &str) -> Result<DateTime<Utc>, ModelError> {
    let invalid = || ModelError::Parse(format!("invalid date {raw:?}, expected MM-YYYY"));

    let (mm, yyyy) = raw.split_once('-').ok_or_else(invalid)?;
    if mm.len() != 2 || yyyy.len() != 4 {
        return Err(invalid());
    }
    if !mm.bytes().chain(yyyy.bytes()).all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let month: u32 = mm.parse().map_err(|_| invalid())?;
    let year: i32 = yyyy.parse().map_err(|_| invalid())?;

    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(invalid)
}

/// Render a timestamp back into `MM-YYYY`.
pub fn format_month(ts: &DateTime<Utc>) -> String {
    format!("{:02}-{:04}", ts.month(), ts.year())
}
