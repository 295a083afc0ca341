//! Position sources: where heliocentric longitudes come from.

use chrono::NaiveDateTime;
use qtty::Degrees;
use tracing::{error, warn};

use ephem_core::{julian_day, Body};

/// Failure of a single longitude lookup.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EphemerisError {
    #[error("Unknown body '{0}'")]
    UnknownBody(String),

    #[error("{provider} could not place {body} at {instant}: {reason}")]
    Unavailable {
        provider: String,
        body: String,
        instant: NaiveDateTime,
        reason: String,
    },

    #[error("No ephemeris sources configured")]
    NoSources,
}

/// Narrow lookup interface over an ephemeris.
pub trait PositionSource: Send + Sync {
    /// Short name used in log messages.
    fn name(&self) -> &str;

    /// Heliocentric ecliptic longitude of `body` at `instant`, in [0, 360).
    fn heliocentric_longitude(
        &self,
        body: &str,
        instant: NaiveDateTime,
    ) -> Result<Degrees, EphemerisError>;
}

/// Analytic Keplerian positions from `ephem-core`.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeplerSource;

impl PositionSource for KeplerSource {
    fn name(&self) -> &str {
        "kepler"
    }

    fn heliocentric_longitude(
        &self,
        body: &str,
        instant: NaiveDateTime,
    ) -> Result<Degrees, EphemerisError> {
        let parsed: Body = body
            .parse()
            .map_err(|_| EphemerisError::UnknownBody(body.to_string()))?;
        ephem_core::heliocentric_longitude(parsed, julian_day(instant)).map_err(|e| {
            EphemerisError::Unavailable {
                provider: self.name().to_string(),
                body: body.to_string(),
                instant,
                reason: e.to_string(),
            }
        })
    }
}

/// Tries each source in order until one answers.
pub struct FallbackSource {
    sources: Vec<Box<dyn PositionSource>>,
}

impl FallbackSource {
    pub fn new(sources: Vec<Box<dyn PositionSource>>) -> Self {
        Self { sources }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl PositionSource for FallbackSource {
    fn name(&self) -> &str {
        "fallback"
    }

    fn heliocentric_longitude(
        &self,
        body: &str,
        instant: NaiveDateTime,
    ) -> Result<Degrees, EphemerisError> {
        let mut last_err = EphemerisError::NoSources;
        for (i, source) in self.sources.iter().enumerate() {
            match source.heliocentric_longitude(body, instant) {
                Ok(lon) => return Ok(lon),
                Err(e) => {
                    if i + 1 < self.sources.len() {
                        warn!(
                            "Failed with {} for {} on {} due to {}. Trying next fallback.",
                            source.name(),
                            body,
                            instant,
                            e
                        );
                    } else {
                        error!("Failed to get longitudes for {} with all sources.", body);
                    }
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    struct Broken;

    impl PositionSource for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn heliocentric_longitude(
            &self,
            body: &str,
            instant: NaiveDateTime,
        ) -> Result<Degrees, EphemerisError> {
            Err(EphemerisError::Unavailable {
                provider: "broken".to_string(),
                body: body.to_string(),
                instant,
                reason: "offline".to_string(),
            })
        }
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_kepler_source_known_body() {
        let lon = KeplerSource.heliocentric_longitude("Earth", noon()).unwrap();
        assert!((lon.value() - 100.4).abs() < 0.5);
    }

    #[test]
    fn test_kepler_source_unknown_body() {
        assert_eq!(
            KeplerSource.heliocentric_longitude("vulcan", noon()),
            Err(EphemerisError::UnknownBody("vulcan".to_string()))
        );
    }

    #[test]
    fn test_fallback_uses_next_source() {
        let chain = FallbackSource::new(vec![Box::new(Broken), Box::new(KeplerSource)]);
        assert!(chain.heliocentric_longitude("mars", noon()).is_ok());
    }

    #[test]
    fn test_fallback_reports_last_error() {
        let chain = FallbackSource::new(vec![Box::new(KeplerSource), Box::new(Broken)]);
        let err = chain.heliocentric_longitude("vulcan", noon()).unwrap_err();
        assert!(matches!(err, EphemerisError::Unavailable { ref provider, .. } if provider == "broken"));
    }

    #[test]
    fn test_empty_chain() {
        let chain = FallbackSource::new(Vec::new());
        assert!(chain.is_empty());
        assert_eq!(
            chain.heliocentric_longitude("mars", noon()),
            Err(EphemerisError::NoSources)
        );
    }
}
