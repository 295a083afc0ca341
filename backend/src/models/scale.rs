use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Unit granularity of a duration or offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
}

impl Scale {
    /// All scales, in the order they are offered to the user.
    pub const ALL: [Scale; 5] = [
        Scale::Years,
        Scale::Months,
        Scale::Weeks,
        Scale::Days,
        Scale::Hours,
    ];

    /// Canonical lowercase token.
    pub const fn as_str(self) -> &'static str {
        match self {
            Scale::Years => "years",
            Scale::Months => "months",
            Scale::Weeks => "weeks",
            Scale::Days => "days",
            Scale::Hours => "hours",
        }
    }

    /// Fixed scales are applied as elapsed time; calendar scales shift fields.
    pub const fn is_fixed(self) -> bool {
        matches!(self, Scale::Weeks | Scale::Days | Scale::Hours)
    }

    /// Length of one unit in seconds, for fixed scales only.
    pub const fn seconds_per_unit(self) -> Option<i64> {
        match self {
            Scale::Weeks => Some(7 * 86_400),
            Scale::Days => Some(86_400),
            Scale::Hours => Some(3_600),
            Scale::Years | Scale::Months => None,
        }
    }

    /// Comma-separated list of all tokens, for prompts and error messages.
    pub fn choices() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scale {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "years" => Ok(Scale::Years),
            "months" => Ok(Scale::Months),
            "weeks" => Ok(Scale::Weeks),
            "days" => Ok(Scale::Days),
            "hours" => Ok(Scale::Hours),
            _ => Err(CoreError::InvalidScale(s.trim().to_string())),
        }
    }
}
