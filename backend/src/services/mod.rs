//! Service layer for the calculations behind the menus.
//!
//! Services are pure: they take parsed values, return results or a
//! [`CoreError`](crate::error::CoreError), and never prompt or print.

pub mod astro;
pub mod duration;
pub mod license;
pub mod report;
pub mod scaling;

pub use duration::{difference, difference_for_token, offset, shift};
pub use license::{generate_key, LicenseDecision, LicenseGate, LicenseKey};
pub use report::{build_report, render_report, ReportRow, ScalingReport};
pub use scaling::{parse_custom_ratios, scale_duration, ScalingPlan};
