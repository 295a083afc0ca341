use chrono::{Months, NaiveDateTime, TimeDelta};
use std::fmt;
use std::str::FromStr;

use super::Scale;
use crate::error::{CoreError, CoreResult};

/// Direction of an offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Subtract,
}

impl Operation {
    pub const fn as_str(self) -> &'static str {
        match self {
            Operation::Add => "+",
            Operation::Subtract => "-",
        }
    }

    /// Apply the sign to a non-negative magnitude.
    pub fn signed(self, magnitude: f64) -> f64 {
        match self {
            Operation::Add => magnitude,
            Operation::Subtract => -magnitude,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Only the exact tokens `+` and `-` are accepted.
impl FromStr for Operation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Operation::Add),
            "-" => Ok(Operation::Subtract),
            other => Err(CoreError::InvalidOperation(other.to_string())),
        }
    }
}

/// How an offset moves a timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OffsetDelta {
    /// Calendar shift of whole months; the day of month is clamped.
    Months(i64),
    /// Fixed elapsed time.
    Elapsed(TimeDelta),
}

/// A signed delta expressed in exactly one scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Offset {
    scale: Scale,
    magnitude: f64,
    delta: OffsetDelta,
}

impl Offset {
    /// Build an offset from a magnitude and a sign.
    ///
    /// Years and months truncate the signed magnitude toward zero; fixed
    /// scales keep the fraction down to the microsecond.
    pub fn new(scale: Scale, magnitude: f64, operation: Operation) -> CoreResult<Self> {
        if !magnitude.is_finite() {
            return Err(CoreError::InvalidFormat(format!(
                "offset magnitude must be finite, got {magnitude}"
            )));
        }
        let signed = operation.signed(magnitude);
        let out_of_range = || CoreError::DateOutOfRange(format!("offset of {signed} {scale}"));

        let delta = match scale {
            Scale::Years | Scale::Months => {
                let whole = signed.trunc();
                if whole.abs() > f64::from(i32::MAX) {
                    return Err(out_of_range());
                }
                let whole = whole as i64;
                let months = if scale == Scale::Years {
                    whole.checked_mul(12).ok_or_else(out_of_range)?
                } else {
                    whole
                };
                OffsetDelta::Months(months)
            }
            Scale::Weeks | Scale::Days | Scale::Hours => {
                let seconds = scale.seconds_per_unit().unwrap_or(0) as f64;
                let micros = (signed * seconds * 1e6).round();
                if micros.abs() >= i64::MAX as f64 {
                    return Err(out_of_range());
                }
                OffsetDelta::Elapsed(TimeDelta::microseconds(micros as i64))
            }
        };

        Ok(Self {
            scale,
            magnitude: signed,
            delta,
        })
    }

    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Signed magnitude as supplied, before truncation.
    pub fn magnitude(&self) -> f64 {
        self.magnitude
    }

    pub fn delta(&self) -> OffsetDelta {
        self.delta
    }

    /// Shift `instant` by this offset.
    pub fn apply(&self, instant: NaiveDateTime) -> CoreResult<NaiveDateTime> {
        let shifted = match self.delta {
            OffsetDelta::Months(months) => {
                let count = u32::try_from(months.unsigned_abs()).ok().map(Months::new);
                match count {
                    Some(count) if months >= 0 => instant.checked_add_months(count),
                    Some(count) => instant.checked_sub_months(count),
                    None => None,
                }
            }
            OffsetDelta::Elapsed(delta) => instant.checked_add_signed(delta),
        };

        shifted.ok_or_else(|| {
            CoreError::DateOutOfRange(format!(
                "{} {} {} leaves the supported calendar",
                instant.format("%Y-%m-%d"),
                if self.magnitude < 0.0 { "-" } else { "+" },
                self
            ))
        })
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude.abs(), self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_operation_tokens_are_exact() {
        assert_eq!("+".parse::<Operation>().unwrap(), Operation::Add);
        assert_eq!("-".parse::<Operation>().unwrap(), Operation::Subtract);
        for bad in ["", " +", "plus", "*", "--"] {
            assert!(matches!(
                bad.parse::<Operation>(),
                Err(CoreError::InvalidOperation(_))
            ));
        }
    }

    #[test]
    fn test_years_truncate_toward_zero() {
        let offset = Offset::new(Scale::Years, 2.9, Operation::Subtract).unwrap();
        assert_eq!(offset.delta(), OffsetDelta::Months(-24));
        assert_eq!(offset.magnitude(), -2.9);
    }

    #[test]
    fn test_month_shift_clamps_day() {
        let offset = Offset::new(Scale::Months, 1.0, Operation::Add).unwrap();
        assert_eq!(offset.apply(date(2024, 1, 31)).unwrap(), date(2024, 2, 29));
    }

    #[test]
    fn test_leap_day_plus_one_year() {
        let offset = Offset::new(Scale::Years, 1.0, Operation::Add).unwrap();
        assert_eq!(offset.apply(date(2024, 2, 29)).unwrap(), date(2025, 2, 28));
    }

    #[test]
    fn test_fractional_days_keep_precision() {
        let offset = Offset::new(Scale::Days, 1.5, Operation::Add).unwrap();
        assert_eq!(
            offset.apply(date(2024, 1, 1)).unwrap(),
            date(2024, 1, 2) + TimeDelta::hours(12)
        );
    }

    #[test]
    fn test_rejects_non_finite_magnitude() {
        assert!(matches!(
            Offset::new(Scale::Hours, f64::INFINITY, Operation::Add),
            Err(CoreError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_huge_offset_is_out_of_range() {
        let offset = Offset::new(Scale::Years, 500_000.0, Operation::Add).unwrap();
        assert!(matches!(
            offset.apply(date(2024, 1, 1)),
            Err(CoreError::DateOutOfRange(_))
        ));
    }
}
