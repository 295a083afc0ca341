//! Error types for the calculator core.
//!
//! Every fallible core operation returns [`CoreResult`]. Errors are returned at
//! the point of failure; the interactive shell decides whether to re-prompt or
//! report them.

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Error type for core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A date, number or ratio string did not match any accepted pattern.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Operation token other than `+` or `-`.
    #[error("Invalid operation '{0}'. Use '+' or '-'.")]
    InvalidOperation(String),

    /// Scale token other than years, months, weeks, days or hours.
    #[error("Invalid scale '{0}'. Choose from years, months, weeks, days, hours")]
    InvalidScale(String),

    /// Scaling mode not known to the registry.
    #[error("Invalid scaling mode: {0}")]
    InvalidMode(String),

    /// Preset selection outside `0..count`.
    #[error("Invalid choice {index}. Please enter 0-{max}", max = .count.saturating_sub(1))]
    IndexOutOfRange { index: i64, count: usize },

    /// Nothing to compute (zero base duration, unknown scale at decomposition,
    /// or an empty ratio sequence).
    #[error("No result: {0}")]
    NoResult(String),

    /// A shifted date fell outside the representable calendar range.
    #[error("Date out of range: {0}")]
    DateOutOfRange(String),

    /// Invalid configuration values (preset tables, license keys).
    #[error("Configuration error: {0}")]
    InvalidConfig(String),

    /// Ephemeris lookup failed.
    #[error("Ephemeris error: {0}")]
    Ephemeris(String),

    /// Cache read or write failed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// File system error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CoreError {
    /// Whether the caller can recover by supplying different input.
    ///
    /// Input validation failures are recoverable; file system and CSV errors
    /// are reported but not re-prompted.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CoreError::InvalidFormat(_)
                | CoreError::InvalidOperation(_)
                | CoreError::InvalidScale(_)
                | CoreError::InvalidMode(_)
                | CoreError::IndexOutOfRange { .. }
                | CoreError::NoResult(_)
                | CoreError::DateOutOfRange(_)
        )
    }
}

impl From<ephem_core::Error> for CoreError {
    fn from(err: ephem_core::Error) -> Self {
        CoreError::Ephemeris(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_out_of_range_message() {
        let err = CoreError::IndexOutOfRange { index: 7, count: 5 };
        assert_eq!(err.to_string(), "Invalid choice 7. Please enter 0-4");
    }

    #[test]
    fn test_invalid_operation_message() {
        let err = CoreError::InvalidOperation("*".to_string());
        assert!(err.to_string().contains("'+' or '-'"));
    }

    #[test]
    fn test_recoverable_classification() {
        assert!(CoreError::InvalidFormat("x".into()).is_recoverable());
        assert!(CoreError::NoResult("zero".into()).is_recoverable());
        assert!(!CoreError::Cache("disk".into()).is_recoverable());
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");
        assert!(!CoreError::from(io).is_recoverable());
    }
}
