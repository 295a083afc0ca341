//! Date difference and date offset arithmetic.
//!
//! All functions here are pure. Calendar scales (years, months) use
//! month-field arithmetic with day-of-month clamping; fixed scales (weeks,
//! days, hours) work on elapsed seconds.

use chrono::{Datelike, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::models::{Duration, Offset, Operation, Scale};

const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Calendar-aware difference between two instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalendarDelta {
    pub years: i64,
    pub months: i64,
    pub days: i64,
}

impl CalendarDelta {
    pub fn total_months(&self) -> i64 {
        self.years * 12 + self.months
    }
}

fn ordered(a: NaiveDateTime, b: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

fn add_months(instant: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let months = u32::try_from(months).ok()?;
    instant.checked_add_months(Months::new(months))
}

/// Whole years, months and days between two instants, in either order.
///
/// The month count is the largest `n` for which `start + n months` does not
/// pass `end`; days are the whole days left after that anchor.
pub fn calendar_delta(start: NaiveDateTime, end: NaiveDateTime) -> CalendarDelta {
    let (start, end) = ordered(start, end);

    let mut months = i64::from(end.year() - start.year()) * 12
        + (i64::from(end.month()) - i64::from(start.month()));
    let mut anchor = add_months(start, months);
    while months > 0 && anchor.map_or(true, |a| a > end) {
        months -= 1;
        anchor = add_months(start, months);
    }
    let anchor = anchor.unwrap_or(start);

    CalendarDelta {
        years: months / 12,
        months: months % 12,
        days: (end - anchor).num_days(),
    }
}

/// Whole seconds elapsed between two instants, in either order.
pub fn elapsed_seconds(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    let (start, end) = ordered(start, end);
    (end - start).num_seconds()
}

/// Decompose the span between `start` and `end` at `scale`.
///
/// Arguments are swapped if `start > end`, so the result is never negative.
pub fn difference(start: NaiveDateTime, end: NaiveDateTime, scale: Scale) -> Duration {
    let result = match scale {
        Scale::Years => {
            let delta = calendar_delta(start, end);
            Duration::Years {
                years: delta.years,
                months: delta.months,
                days: delta.days,
            }
        }
        Scale::Months => {
            let delta = calendar_delta(start, end);
            Duration::Months {
                months: delta.total_months(),
                days: delta.days,
            }
        }
        Scale::Weeks => {
            let days = elapsed_seconds(start, end) / SECONDS_PER_DAY;
            Duration::Weeks {
                weeks: days / 7,
                days: days % 7,
            }
        }
        Scale::Days => {
            let seconds = elapsed_seconds(start, end);
            Duration::Days {
                days: seconds / SECONDS_PER_DAY,
                hours: (seconds % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            }
        }
        Scale::Hours => Duration::Hours {
            hours: elapsed_seconds(start, end) / SECONDS_PER_HOUR,
        },
    };

    debug!(%start, %end, %scale, %result, "computed difference");
    result
}

/// String-keyed variant of [`difference`].
///
/// An unrecognized scale token is reported as [`CoreError::NoResult`].
pub fn difference_for_token(
    start: NaiveDateTime,
    end: NaiveDateTime,
    token: &str,
) -> CoreResult<Duration> {
    let scale: Scale = token
        .parse()
        .map_err(|_| CoreError::NoResult(format!("unrecognized scale '{}'", token.trim())))?;
    Ok(difference(start, end, scale))
}

/// Build an offset from a scale, a non-negative magnitude and an operation token.
pub fn offset(scale: Scale, magnitude: f64, operation: &str) -> CoreResult<Offset> {
    let operation: Operation = operation.parse()?;
    Offset::new(scale, magnitude, operation)
}

/// Move `origin` by `magnitude` units of `scale` in the given direction.
pub fn shift(
    origin: NaiveDateTime,
    scale: Scale,
    magnitude: f64,
    operation: Operation,
) -> CoreResult<NaiveDateTime> {
    let offset = Offset::new(scale, magnitude, operation)?;
    let shifted = offset.apply(origin)?;
    debug!(%origin, %offset, %operation, %shifted, "shifted date");
    Ok(shifted)
}
