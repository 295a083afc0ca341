//! Access key gate shown before the shell starts.
//!
//! Keys have the form `<PREFIX>-<YYYY-MM-DD>`. The expiration date is read
//! from the key itself and the key stays valid through that day.

use chrono::{NaiveDate, TimeDelta};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

use crate::error::{CoreError, CoreResult};

/// Prefix used by `generate-key` when none is given.
pub const DEFAULT_PREFIX: &str = "PLATINUM2025";

/// Validity used by `generate-key` when none is given.
pub const DEFAULT_VALID_DAYS: i64 = 30;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_LEN: usize = 10;

/// A parsed access key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LicenseKey {
    prefix: String,
    expires: NaiveDate,
}

impl LicenseKey {
    pub fn new(prefix: impl Into<String>, expires: NaiveDate) -> CoreResult<Self> {
        let prefix = prefix.into();
        if prefix.is_empty() || prefix.chars().any(char::is_whitespace) {
            return Err(CoreError::InvalidFormat(format!(
                "key prefix '{prefix}' must be non-empty and contain no whitespace"
            )));
        }
        Ok(Self { prefix, expires })
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn expires(&self) -> NaiveDate {
        self.expires
    }

    pub fn is_valid_on(&self, today: NaiveDate) -> bool {
        today <= self.expires
    }
}

impl fmt::Display for LicenseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.prefix, self.expires.format(DATE_FORMAT))
    }
}

impl FromStr for LicenseKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed =
            || CoreError::InvalidFormat(format!("'{s}' is not of the form PREFIX-YYYY-MM-DD"));

        let split = s.len().checked_sub(DATE_LEN + 1).ok_or_else(malformed)?;
        if !s.is_char_boundary(split) {
            return Err(malformed());
        }
        let (prefix, rest) = s.split_at(split);
        let date = rest.strip_prefix('-').ok_or_else(malformed)?;
        let expires = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| malformed())?;
        Self::new(prefix, expires)
    }
}

/// Outcome of a key check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseDecision {
    Granted,
    Expired,
    Unknown,
}

/// The set of accepted keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LicenseGate {
    keys: BTreeSet<LicenseKey>,
}

impl LicenseGate {
    pub fn new(keys: impl IntoIterator<Item = LicenseKey>) -> Self {
        Self {
            keys: keys.into_iter().collect(),
        }
    }

    /// Parse configured key strings. Duplicates collapse to one entry.
    pub fn from_strings<S: AsRef<str>>(keys: &[S]) -> CoreResult<Self> {
        let keys = keys
            .iter()
            .map(|k| {
                k.as_ref().trim().parse::<LicenseKey>().map_err(|e| {
                    CoreError::InvalidConfig(format!("license key {}: {}", k.as_ref(), e))
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;
        Ok(Self::new(keys))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn check(&self, key: &str, today: NaiveDate) -> LicenseDecision {
        let Ok(parsed) = key.trim().parse::<LicenseKey>() else {
            return LicenseDecision::Unknown;
        };
        if !self.keys.contains(&parsed) {
            return LicenseDecision::Unknown;
        }
        if parsed.is_valid_on(today) {
            LicenseDecision::Granted
        } else {
            LicenseDecision::Expired
        }
    }

    /// Whether the shell may start.
    pub fn proceed(&self, key: &str, today: NaiveDate) -> bool {
        match self.check(key, today) {
            LicenseDecision::Granted => {
                info!("Access key accepted");
                true
            }
            LicenseDecision::Expired => {
                warn!("Access key has expired");
                false
            }
            LicenseDecision::Unknown => {
                warn!("Unknown access key");
                false
            }
        }
    }
}

/// A new key expiring `days` after `today`.
pub fn generate_key(prefix: &str, today: NaiveDate, days: i64) -> CoreResult<LicenseKey> {
    let expires = TimeDelta::try_days(days)
        .and_then(|delta| today.checked_add_signed(delta))
        .ok_or_else(|| CoreError::DateOutOfRange(format!("{today} + {days} days")))?;
    LicenseKey::new(prefix, expires)
}
