use serde::{Deserialize, Serialize};
use std::fmt;

use super::Scale;

/// Elapsed time decomposed at one scale.
///
/// Secondary components are remainders bounded by their natural modulus:
/// months < 12, hours < 24, days < 7 after whole weeks, and days shorter than
/// the month at the anchor point for calendar scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scale", rename_all = "lowercase")]
pub enum Duration {
    Years { years: i64, months: i64, days: i64 },
    Months { months: i64, days: i64 },
    Weeks { weeks: i64, days: i64 },
    Days { days: i64, hours: i64 },
    Hours { hours: i64 },
}

impl Duration {
    pub fn scale(&self) -> Scale {
        match self {
            Duration::Years { .. } => Scale::Years,
            Duration::Months { .. } => Scale::Months,
            Duration::Weeks { .. } => Scale::Weeks,
            Duration::Days { .. } => Scale::Days,
            Duration::Hours { .. } => Scale::Hours,
        }
    }

    /// Leading component in the duration's own unit.
    ///
    /// This is the base magnitude handed to the scaling pipeline.
    pub fn leading(&self) -> i64 {
        match *self {
            Duration::Years { years, .. } => years,
            Duration::Months { months, .. } => months,
            Duration::Weeks { weeks, .. } => weeks,
            Duration::Days { days, .. } => days,
            Duration::Hours { hours } => hours,
        }
    }

    /// True when every component is zero.
    pub fn is_zero(&self) -> bool {
        match *self {
            Duration::Years {
                years,
                months,
                days,
            } => years == 0 && months == 0 && days == 0,
            Duration::Months { months, days } => months == 0 && days == 0,
            Duration::Weeks { weeks, days } => weeks == 0 && days == 0,
            Duration::Days { days, hours } => days == 0 && hours == 0,
            Duration::Hours { hours } => hours == 0,
        }
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Duration::Years {
                years,
                months,
                days,
            } => write!(f, "{years} years, {months} months, {days} days"),
            Duration::Months { months, days } => write!(f, "{months} months, {days} days"),
            Duration::Weeks { weeks, days } => write!(f, "{weeks} weeks, {days} days"),
            Duration::Days { days, hours } => write!(f, "{days} days, {hours} hours"),
            Duration::Hours { hours } => write!(f, "{hours} hours"),
        }
    }
}
