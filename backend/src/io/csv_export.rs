//! CSV files for scaling reports and astro tables.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::CoreResult;
use crate::services::astro::AstroTable;
use crate::services::report::ScalingReport;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Create `dir` if needed and return `dir/file_name`.
pub fn export_dir_file<P: AsRef<Path>>(dir: P, file_name: &str) -> CoreResult<PathBuf> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    Ok(dir.join(file_name))
}

/// Write a scaling report to `path`.
pub fn write_report<P: AsRef<Path>>(path: P, report: &ScalingReport) -> CoreResult<()> {
    let file = fs::File::create(path.as_ref())?;
    write_report_to(file, report)?;
    info!("Scaling report saved to {}", path.as_ref().display());
    Ok(())
}

/// Write a scaling report: a header block, a blank row, then one row per
/// scaled value.
pub fn write_report_to<W: Write>(writer: W, report: &ScalingReport) -> CoreResult<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(writer);

    wtr.write_record(["Start Date", &report.origin.format(DATE_FORMAT).to_string()])?;
    wtr.write_record(["End Date", &report.terminal.format(DATE_FORMAT).to_string()])?;
    wtr.write_record(["Original Time Difference", &report.original_difference()])?;
    wtr.write_record(["Scaling Mode", report.mode.as_str()])?;
    wtr.flush()?;
    let mut inner = wtr.into_inner().map_err(|e| e.into_error())?;
    inner.write_all(b"\n")?;
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(inner);

    wtr.write_record(["cycle_date_range", "duration", "scaling_factor"])?;
    for row in &report.rows {
        wtr.write_record([
            row.cycle_range(),
            row.duration.to_string(),
            row.ratio.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write an astro table to `path`.
pub fn write_astro_table<P: AsRef<Path>>(path: P, table: &AstroTable) -> CoreResult<()> {
    let file = fs::File::create(path.as_ref())?;
    write_astro_table_to(file, table)?;
    info!("Results saved to {}", path.as_ref().display());
    Ok(())
}

/// Write an astro table: a `date` column followed by the table columns.
pub fn write_astro_table_to<W: Write>(writer: W, table: &AstroTable) -> CoreResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let header = std::iter::once("date").chain(table.columns.iter().map(String::as_str));
    wtr.write_record(header)?;
    for row in &table.rows {
        let fields =
            std::iter::once(row.date_label()).chain(row.values.iter().map(|v| v.to_string()));
        wtr.write_record(fields)?;
    }
    wtr.flush()?;
    Ok(())
}
