//! Parsing of raw user input into typed values.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CoreError, CoreResult};

/// Date formats accepted at a date prompt, tried in order.
pub const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%d-%m-%Y"];

/// Result of a date prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    Date(NaiveDateTime),
    /// The user typed `cancel`.
    Cancel,
}

/// Parse a date in any accepted format, at midnight.
pub fn parse_date(raw: &str) -> CoreResult<NaiveDateTime> {
    let trimmed = raw.trim();
    DATE_FORMATS
        .iter()
        .filter(|fmt| has_full_year(trimmed, fmt))
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
        .map(|date| date.and_time(NaiveTime::MIN))
        .ok_or_else(|| {
            CoreError::InvalidFormat(format!(
                "'{trimmed}'. Please use YYYY-MM-DD, MM/DD/YYYY, or DD-MM-YYYY"
            ))
        })
}

/// chrono's `%Y` takes 1 to 4 digits; a prompt year must have exactly 4.
fn has_full_year(raw: &str, fmt: &str) -> bool {
    let sep = if fmt.contains('/') { '/' } else { '-' };
    let Some(pos) = fmt.split(sep).position(|field| field == "%Y") else {
        return false;
    };
    raw.split(sep)
        .nth(pos)
        .is_some_and(|year| year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit()))
}

/// Parse a date prompt answer; `cancel` in any case aborts the request.
pub fn parse_date_input(raw: &str) -> CoreResult<DateInput> {
    if raw.trim().eq_ignore_ascii_case("cancel") {
        return Ok(DateInput::Cancel);
    }
    parse_date(raw).map(DateInput::Date)
}

/// Parse a non-negative, finite magnitude.
pub fn parse_magnitude(raw: &str) -> CoreResult<f64> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidFormat(format!("'{}' is not a number", raw.trim())))?;
    if !value.is_finite() {
        return Err(CoreError::InvalidFormat(format!("'{}' is not finite", raw.trim())));
    }
    if value < 0.0 {
        return Err(CoreError::InvalidFormat(
            "Please enter a positive number".to_string(),
        ));
    }
    Ok(value)
}
