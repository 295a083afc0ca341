mod support;

use chrono::NaiveDateTime;
use qtty::Degrees;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use platinum_tool::cache::{FileCache, MemoryCache};
use platinum_tool::services::astro::{
    Ephemeris, EphemerisError, FallbackSource, PositionSource, SynodicTarget,
};
use support::date;

/// Bodies moving at a constant rate from 0 deg on 2024-01-01.
struct Linear {
    calls: Arc<AtomicUsize>,
}

impl Linear {
    fn new() -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        (
            Self {
                calls: Arc::clone(&calls),
            },
            calls,
        )
    }
}

impl PositionSource for Linear {
    fn name(&self) -> &str {
        "linear"
    }

    fn heliocentric_longitude(
        &self,
        body: &str,
        instant: NaiveDateTime,
    ) -> Result<Degrees, EphemerisError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let rate = match body {
            "fast" => 10.0,
            "slow" => 1.0,
            "still" => 0.0,
            _ => return Err(EphemerisError::UnknownBody(body.to_string())),
        };
        let days = (instant - date(2024, 1, 1)).num_days() as f64;
        Ok(Degrees::new(rate * days).wrap_pos())
    }
}

/// Source that never answers.
struct Offline;

impl PositionSource for Offline {
    fn name(&self) -> &str {
        "offline"
    }

    fn heliocentric_longitude(
        &self,
        body: &str,
        instant: NaiveDateTime,
    ) -> Result<Degrees, EphemerisError> {
        Err(EphemerisError::Unavailable {
            provider: "offline".to_string(),
            body: body.to_string(),
            instant,
            reason: "no connection".to_string(),
        })
    }
}

#[test]
fn test_longitudes_and_angles_columns() {
    let (source, _) = Linear::new();
    let ephemeris = Ephemeris::new(source);
    let table =
        ephemeris.longitudes_and_angles(date(2024, 1, 1), date(2024, 1, 15), &["fast", "slow"], 7.0);

    assert_eq!(table.columns, vec!["fast", "slow", "slow-fast_synodic"]);
    assert_eq!(table.len(), 3);
    assert_eq!(table.column("fast").unwrap(), vec![0.0, 70.0, 140.0]);
    assert_eq!(table.column("slow-fast_synodic").unwrap(), vec![0.0, 63.0, 126.0]);
}

#[test]
fn test_synodic_angles_use_shortest_arc() {
    let (source, _) = Linear::new();
    let ephemeris = Ephemeris::new(source);
    let table = ephemeris.synodic_period(
        date(2024, 1, 1),
        date(2024, 2, 10),
        &SynodicTarget::Pair("slow".into(), "fast".into()),
        20.0,
    );

    assert_eq!(table.columns, vec!["slow", "fast", "fast-slow"]);
    // fast: 0, 200, 40; slow: 0, 20, 40
    assert_eq!(table.column("fast-slow").unwrap(), vec![0.0, 180.0, 0.0]);
}

#[test]
fn test_three_bodies_get_every_pair() {
    let (source, _) = Linear::new();
    let ephemeris = Ephemeris::new(source);
    let target = SynodicTarget::from_list(vec!["fast".into(), "slow".into(), "still".into()]);
    let table = ephemeris.synodic_period(date(2024, 1, 1), date(2024, 1, 2), &target, 1.0);

    assert_eq!(
        table.columns,
        vec![
            "fast",
            "slow",
            "still",
            "slow-fast_synodic",
            "still-fast_synodic",
            "still-slow_synodic",
        ]
    );
    assert_eq!(table.column("still-fast_synodic").unwrap(), vec![0.0, 10.0]);
}

#[test]
fn test_single_body_synodic_is_empty() {
    let (source, calls) = Linear::new();
    let ephemeris = Ephemeris::new(source);
    let target = SynodicTarget::from_list(vec!["fast".into()]);
    let table = ephemeris.synodic_period(date(2024, 1, 1), date(2024, 2, 1), &target, 7.0);
    assert!(table.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_unknown_body_is_dropped() {
    let (source, _) = Linear::new();
    let ephemeris = Ephemeris::new(source);
    let table = ephemeris.longitudes_and_angles(
        date(2024, 1, 1),
        date(2024, 1, 8),
        &["fast", "vulcan", "slow"],
        7.0,
    );
    assert_eq!(table.columns, vec!["fast", "slow", "slow-fast_synodic"]);
    assert_eq!(table.len(), 2);
}

#[test]
fn test_pair_with_unknown_body_is_empty() {
    let (source, _) = Linear::new();
    let ephemeris = Ephemeris::new(source);
    let table = ephemeris.synodic_period(
        date(2024, 1, 1),
        date(2024, 1, 8),
        &SynodicTarget::Pair("fast".into(), "vulcan".into()),
        7.0,
    );
    assert!(table.is_empty());
}

#[test]
fn test_reversed_range_is_empty() {
    let (source, calls) = Linear::new();
    let ephemeris = Ephemeris::new(source);
    let table = ephemeris.longitudes_and_angles(date(2024, 2, 1), date(2024, 1, 1), &["fast"], 7.0);
    assert!(table.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_fallback_uses_next_source() {
    let (linear, calls) = Linear::new();
    let sources: Vec<Box<dyn PositionSource>> = vec![Box::new(Offline), Box::new(linear)];
    let ephemeris = Ephemeris::new(FallbackSource::new(sources));

    let table = ephemeris.longitudes_and_angles(date(2024, 1, 1), date(2024, 1, 3), &["slow"], 1.0);
    assert_eq!(table.column("slow").unwrap(), vec![0.0, 1.0, 2.0]);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_all_sources_failing_gives_empty_table() {
    let sources: Vec<Box<dyn PositionSource>> = vec![Box::new(Offline), Box::new(Offline)];
    let ephemeris = Ephemeris::new(FallbackSource::new(sources));
    let table = ephemeris.longitudes_and_angles(date(2024, 1, 1), date(2024, 1, 3), &["mars"], 1.0);
    assert!(table.is_empty());
}

#[test]
fn test_memory_cache_skips_recomputation() {
    let (source, calls) = Linear::new();
    let ephemeris = Ephemeris::new(source).with_cache(MemoryCache::new());

    let first =
        ephemeris.longitudes_and_angles(date(2024, 1, 1), date(2024, 3, 1), &["fast", "slow"], 7.0);
    let after_first = calls.load(Ordering::SeqCst);
    assert!(after_first > 0);

    let second =
        ephemeris.longitudes_and_angles(date(2024, 1, 1), date(2024, 3, 1), &["fast", "slow"], 7.0);
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), after_first);

    // A different step is a different table.
    ephemeris.longitudes_and_angles(date(2024, 1, 1), date(2024, 3, 1), &["fast", "slow"], 14.0);
    assert!(calls.load(Ordering::SeqCst) > after_first);
}

#[test]
fn test_file_cache_survives_a_new_ephemeris() {
    let dir = tempfile::tempdir().unwrap();

    let (source, _) = Linear::new();
    let first = Ephemeris::new(source)
        .with_cache(FileCache::new(dir.path()).unwrap())
        .synodic_period(
            date(2024, 1, 1),
            date(2024, 1, 29),
            &SynodicTarget::Pair("fast".into(), "slow".into()),
            7.0,
        );
    assert_eq!(first.len(), 5);

    let (source, calls) = Linear::new();
    let second = Ephemeris::new(source)
        .with_cache(FileCache::new(dir.path()).unwrap())
        .synodic_period(
            date(2024, 1, 1),
            date(2024, 1, 29),
            &SynodicTarget::Pair("fast".into(), "slow".into()),
            7.0,
        );
    assert_eq!(first, second);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_kepler_longitudes_are_normalized() {
    let table = Ephemeris::kepler().longitudes_and_angles(
        date(2000, 1, 1),
        date(2030, 1, 1),
        &["mercury", "earth"],
        365.0,
    );
    assert!(!table.is_empty());
    for value in table.column("mercury").unwrap() {
        assert!((0.0..360.0).contains(&value));
    }
    for value in table.column("earth-mercury_synodic").unwrap() {
        assert!((0.0..=180.0).contains(&value));
    }
}
