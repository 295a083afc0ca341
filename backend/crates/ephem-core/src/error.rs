//! Error types for ephem-core

use thiserror::Error;

/// Result type for ephem-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when evaluating planet positions
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Body name not present in the element table
    #[error("Unknown body: {0}")]
    UnknownBody(String),

    /// Julian day is NaN or infinite
    #[error("Invalid epoch: JD {0}")]
    InvalidEpoch(f64),

    /// Epoch outside the span the element table is allowed to extrapolate to
    #[error("Epoch out of range: JD {jd} (supported {min}..{max})")]
    EpochOutOfRange { jd: f64, min: f64, max: f64 },

    /// Kepler's equation did not converge
    #[error("Kepler solver did not converge for mean anomaly {mean_anomaly_deg} deg")]
    NoConvergence { mean_anomaly_deg: f64 },
}
