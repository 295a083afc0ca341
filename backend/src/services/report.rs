//! Turn scaled magnitudes back into calendar dates.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt::Write as _;

use crate::error::CoreResult;
use crate::models::{Offset, Operation, Scale, ScalingMode};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// One scaled value projected from the origin date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub origin: NaiveDateTime,
    pub resulting: NaiveDateTime,
    /// Full precision scaled magnitude.
    pub magnitude: f64,
    /// Magnitude rounded for display.
    pub duration: i64,
    pub ratio: f64,
}

impl ReportRow {
    /// `"YYYY-MM-DD - YYYY-MM-DD"`
    pub fn cycle_range(&self) -> String {
        format!(
            "{} - {}",
            self.origin.format(DATE_FORMAT),
            self.resulting.format(DATE_FORMAT)
        )
    }
}

/// A scaling run ready for display or export.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScalingReport {
    pub origin: NaiveDateTime,
    pub terminal: NaiveDateTime,
    pub scale: Scale,
    pub base: i64,
    pub mode: ScalingMode,
    pub rows: Vec<ReportRow>,
}

impl ScalingReport {
    /// `"<base> <scale>"`, e.g. `"2 years"`.
    pub fn original_difference(&self) -> String {
        format!("{} {}", self.base, self.scale)
    }
}

/// Project each scaled magnitude from `origin` and pair it with its ratio.
///
/// Rows follow the input order. If the two slices differ in length the
/// extra entries of the longer one are ignored.
pub fn build_report(
    ratios: &[f64],
    scaled: &[f64],
    scale: Scale,
    base: i64,
    mode: ScalingMode,
    origin: NaiveDateTime,
    terminal: NaiveDateTime,
) -> CoreResult<ScalingReport> {
    let rows = scaled
        .iter()
        .zip(ratios)
        .map(|(&magnitude, &ratio)| {
            let offset = Offset::new(scale, magnitude, Operation::Add)?;
            Ok(ReportRow {
                origin,
                resulting: offset.apply(origin)?,
                magnitude,
                duration: magnitude.round() as i64,
                ratio,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(ScalingReport {
        origin,
        terminal,
        scale,
        base,
        mode,
        rows,
    })
}

/// Terminal rendering of a report.
pub fn render_report(report: &ScalingReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Start Date: {}", report.origin.format(DATE_FORMAT));
    let _ = writeln!(out, "End Date: {}", report.terminal.format(DATE_FORMAT));
    let _ = writeln!(out, "Original Time Difference: {}", report.original_difference());
    let _ = writeln!(out, "Scaling Mode: {}", report.mode);
    let _ = writeln!(out);
    let _ = writeln!(out, "Cycle Date | Duration | Scaling Factor");
    let _ = writeln!(out, "{}", "-".repeat(50));
    for row in &report.rows {
        let _ = writeln!(out, "{} | {} | {}", row.cycle_range(), row.duration, row.ratio);
    }
    out
}
