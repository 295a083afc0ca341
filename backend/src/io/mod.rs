//! File output.

pub mod csv_export;

pub use csv_export::{export_dir_file, write_astro_table, write_report};
