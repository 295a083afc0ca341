//! Heliocentric longitude and synodic angle tables.
//!
//! [`Ephemeris`] samples a [`PositionSource`] over a date range and derives
//! pairwise synodic angles. Whole tables are memoized through an injected
//! [`LookupCache`], keyed by every parameter of the call.

mod source;
mod table;

pub use source::{EphemerisError, FallbackSource, KeplerSource, PositionSource};
pub use table::{AstroRow, AstroTable};

use chrono::{NaiveDateTime, TimeDelta};
use qtty::Degrees;
use tracing::{debug, warn};

use crate::cache::{CacheKey, LookupCache, NoCache};

/// Default sampling step, in days.
pub const DEFAULT_STEP_DAYS: f64 = 7.0;

/// Bodies listed by [`Ephemeris::planet_positions`].
pub const PLANETS: [&str; 8] = [
    "mercury", "venus", "earth", "mars", "jupiter", "saturn", "uranus", "neptune",
];

/// What to compute synodic angles for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynodicTarget {
    /// Longitudes of every body plus an angle column for every pair.
    Bodies(Vec<String>),
    /// Exactly two bodies: columns `b1`, `b2` and `"{b2}-{b1}"`.
    Pair(String, String),
}

impl SynodicTarget {
    /// Target for a user-supplied list: two names form a pair table.
    pub fn from_list(bodies: Vec<String>) -> Self {
        match <[String; 2]>::try_from(bodies) {
            Ok([b1, b2]) => SynodicTarget::Pair(b1, b2),
            Err(bodies) => SynodicTarget::Bodies(bodies),
        }
    }
}

/// Smallest angle between two longitudes, in [0, 180].
pub fn synodic_angle(lon1: f64, lon2: f64) -> f64 {
    Degrees::new(lon2).abs_separation(Degrees::new(lon1)).value()
}

/// Sample instants `start, start + step, ...` up to and including `end`.
///
/// Empty when `start > end` or the step is not a positive finite number of
/// days.
pub fn sample_dates(
    start: NaiveDateTime,
    end: NaiveDateTime,
    step_days: f64,
) -> Vec<NaiveDateTime> {
    if start > end || !step_days.is_finite() || step_days <= 0.0 {
        return Vec::new();
    }
    let micros = (step_days * 86_400e6).round();
    if micros < 1.0 || micros >= i64::MAX as f64 {
        return Vec::new();
    }
    let step = TimeDelta::microseconds(micros as i64);

    let mut dates = Vec::new();
    let mut current = Some(start);
    while let Some(date) = current.filter(|d| *d <= end) {
        dates.push(date);
        current = date.checked_add_signed(step);
    }
    dates
}

/// Astro calculator over a position source with an optional table cache.
pub struct Ephemeris {
    source: Box<dyn PositionSource>,
    cache: Box<dyn LookupCache<AstroTable>>,
}

impl Ephemeris {
    pub fn new(source: impl PositionSource + 'static) -> Self {
        Self {
            source: Box::new(source),
            cache: Box::new(NoCache),
        }
    }

    /// Analytic Kepler positions, no cache.
    pub fn kepler() -> Self {
        Self::new(KeplerSource)
    }

    pub fn with_cache(mut self, cache: impl LookupCache<AstroTable> + 'static) -> Self {
        self.cache = Box::new(cache);
        self
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Longitude of each body at each sample date, plus a
    /// `"{b2}-{b1}_synodic"` column for every pair of bodies in input order.
    ///
    /// Bodies the source cannot place at any date are left out. Dates where a
    /// remaining body has no value are dropped.
    pub fn longitudes_and_angles<S: AsRef<str>>(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        bodies: &[S],
        step_days: f64,
    ) -> AstroTable {
        let bodies: Vec<&str> = bodies.iter().map(|b| b.as_ref().trim()).collect();
        let dates = sample_dates(start, end, step_days);
        if dates.is_empty() || bodies.is_empty() {
            debug!("Empty date range or body list, nothing to compute");
            return AstroTable::empty();
        }

        let key = table_key("longitudes", &bodies, start, end, step_days);
        self.cached(&key, || {
            let series = self.sample_bodies(&bodies, &dates);
            let mut table = align(&series, &dates);
            if table.is_empty() {
                return table;
            }

            let count = series.len();
            for i in 0..count {
                for j in (i + 1)..count {
                    let (b1, b2) = (series[i].0, series[j].0);
                    table.columns.push(format!("{b2}-{b1}_synodic"));
                    for row in &mut table.rows {
                        let angle = synodic_angle(row.values[i], row.values[j]);
                        row.values.push(angle);
                    }
                }
            }
            table
        })
    }

    /// Synodic angles over a date range.
    pub fn synodic_period(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        target: &SynodicTarget,
        step_days: f64,
    ) -> AstroTable {
        match target {
            SynodicTarget::Bodies(bodies) => {
                if bodies.len() < 2 {
                    warn!("Synodic angles need at least two bodies, got {}", bodies.len());
                    return AstroTable::empty();
                }
                self.longitudes_and_angles(start, end, bodies.as_slice(), step_days)
            }
            SynodicTarget::Pair(b1, b2) => {
                self.pair_angles(start, end, b1.trim(), b2.trim(), step_days)
            }
        }
    }

    /// Longitudes of the eight planets and all their synodic angles at `date`.
    pub fn planet_positions(&self, date: NaiveDateTime) -> AstroTable {
        self.longitudes_and_angles(date, date, &PLANETS[..], 1.0)
    }

    fn pair_angles(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        b1: &str,
        b2: &str,
        step_days: f64,
    ) -> AstroTable {
        let dates = sample_dates(start, end, step_days);
        if dates.is_empty() {
            return AstroTable::empty();
        }

        let key = table_key("pair", &[b1, b2], start, end, step_days);
        self.cached(&key, || {
            let series = self.sample_bodies(&[b1, b2], &dates);
            if series.len() < 2 {
                return AstroTable::empty();
            }
            let mut table = align(&series, &dates);
            table.columns.push(format!("{b2}-{b1}"));
            for row in &mut table.rows {
                let angle = synodic_angle(row.values[0], row.values[1]);
                row.values.push(angle);
            }
            table
        })
    }

    /// Look `key` up, or compute and store the table.
    fn cached(&self, key: &CacheKey, compute: impl FnOnce() -> AstroTable) -> AstroTable {
        if let Some(table) = self.cache.lookup(key) {
            debug!("Using cached table for {}", key);
            return table;
        }
        let table = compute();
        if let Err(e) = self.cache.store(key, &table) {
            warn!("Failed to cache table {}: {}", key, e);
        }
        table
    }

    /// Longitude series for each body that has at least one value.
    fn sample_bodies<'a>(
        &self,
        bodies: &[&'a str],
        dates: &[NaiveDateTime],
    ) -> Vec<(&'a str, Vec<f64>)> {
        let mut series = Vec::with_capacity(bodies.len());
        for &body in bodies {
            let mut last_err = None;
            let values: Vec<f64> = dates
                .iter()
                .map(|&date| {
                    debug!("Calculating longitude for {} on {}", body, date);
                    match self.source.heliocentric_longitude(body, date) {
                        Ok(lon) => lon.value(),
                        Err(e) => {
                            last_err = Some(e);
                            f64::NAN
                        }
                    }
                })
                .collect();

            if values.iter().all(|v| v.is_nan()) {
                if let Some(e) = last_err {
                    warn!("Failed to get longitude for {}: {}", body, e);
                }
                continue;
            }
            series.push((body, values));
        }
        series
    }
}

/// Build a table from per-body series, dropping dates with a missing value.
fn align(series: &[(&str, Vec<f64>)], dates: &[NaiveDateTime]) -> AstroTable {
    if series.is_empty() {
        return AstroTable::empty();
    }
    let rows = dates
        .iter()
        .enumerate()
        .filter_map(|(i, &date)| {
            let values: Vec<f64> = series.iter().map(|(_, v)| v[i]).collect();
            if values.iter().any(|v| v.is_nan()) {
                None
            } else {
                Some(AstroRow { date, values })
            }
        })
        .collect();

    AstroTable {
        columns: series.iter().map(|(name, _)| name.to_string()).collect(),
        rows,
    }
}

fn table_key(
    kind: &str,
    bodies: &[&str],
    start: NaiveDateTime,
    end: NaiveDateTime,
    step_days: f64,
) -> CacheKey {
    CacheKey::new(kind)
        .with_part(bodies.join(","))
        .with_part(start)
        .with_part(end)
        .with_part(step_days)
}
