//! # ephem-core
//!
//! Analytic heliocentric positions for the planets and Pluto.
//!
//! This crate is the ephemeris data source of the calculator: given a body
//! and an instant it returns a heliocentric ecliptic position, propagated from
//! the JPL approximate Keplerian element set.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ephem_core::{heliocentric_longitude, julian_day, Body};
//!
//! let noon = NaiveDate::from_ymd_opt(2000, 1, 1)
//!     .unwrap()
//!     .and_hms_opt(12, 0, 0)
//!     .unwrap();
//! let lon = heliocentric_longitude(Body::Earth, julian_day(noon)).unwrap();
//! assert!((lon.value() - 100.4).abs() < 1.0);
//! ```

mod elements;
mod error;
mod types;

pub use elements::{Element, KeplerElements, OrbitState};
pub use error::{Error, Result};
pub use types::Body;

use chrono::NaiveDateTime;
use qtty::Degrees;

/// Julian day of J2000.0 (2000-01-01 12:00 TT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Days per Julian century.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Julian day of the Unix epoch.
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Earliest accepted epoch: 3000 BC January 1.
pub const MIN_JD: f64 = 625_673.5;

/// Latest accepted epoch: 3000 AD January 1.
pub const MAX_JD: f64 = 2_816_787.5;

/// Julian day for a naive (UTC-like) calendar instant.
///
/// The calculator does not model time scales, so the difference between UTC
/// and TT is ignored.
pub fn julian_day(instant: NaiveDateTime) -> f64 {
    let utc = instant.and_utc();
    let seconds = utc.timestamp() as f64 + f64::from(utc.timestamp_subsec_nanos()) / 1e9;
    UNIX_EPOCH_JD + seconds / 86_400.0
}

/// Reject epochs the element table cannot be extrapolated to.
pub fn check_epoch(jd: f64) -> Result<()> {
    if !jd.is_finite() {
        return Err(Error::InvalidEpoch(jd));
    }
    if !(MIN_JD..=MAX_JD).contains(&jd) {
        return Err(Error::EpochOutOfRange {
            jd,
            min: MIN_JD,
            max: MAX_JD,
        });
    }
    Ok(())
}

/// Heliocentric position of `body` at `jd`, J2000 ecliptic frame, in AU.
pub fn heliocentric_position(body: Body, jd: f64) -> Result<[f64; 3]> {
    check_epoch(jd)?;
    let centuries = (jd - J2000_JD) / DAYS_PER_CENTURY;
    KeplerElements::for_body(body).at(centuries).position()
}

/// Heliocentric ecliptic longitude of `body` at `jd`, in [0, 360).
pub fn heliocentric_longitude(body: Body, jd: f64) -> Result<Degrees> {
    let [x, y, _] = heliocentric_position(body, jd)?;
    Ok(Degrees::new(y.atan2(x).to_degrees()).wrap_pos())
}
