//! # Platinum-tool
//!
//! Menu-driven calculator for calendar differences, proportional scaling of
//! durations and heliocentric planetary longitudes.
//!
//! ## Features
//!
//! - **Date arithmetic**: calendar-aware differences and offsets in years,
//!   months, weeks, days or hours
//! - **Scaling**: project a duration through preset or custom ratio sequences
//!   and turn each result back into a date
//! - **Astro tables**: longitudes and synodic angles sampled over a date range,
//!   with an optional on-disk cache
//! - **Export**: reports and tables written as CSV
//! - **Access keys**: a dated key check before the shell starts
//!
//! ## Architecture
//!
//! - [`models`]: value types for scales, durations, offsets and ratios
//! - [`services`]: the calculations, free of any terminal I/O
//! - [`scales`]: the preset ratio registry
//! - [`cache`]: lookup caches used by the ephemeris
//! - [`io`]: CSV export
//! - [`config`]: TOML configuration with environment overrides
//! - [`shell`]: the interactive menus

pub mod cache;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod scales;
pub mod services;
pub mod shell;

pub use error::{CoreError, CoreResult};
