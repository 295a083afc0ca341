//! Registry of named scaling ratio presets.
//!
//! The registry is built once at startup and passed by reference to whatever
//! needs it. It is never mutated afterwards.

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::models::{RatioSequence, ScalingMode};

/// Immutable preset table for the two registry-backed scaling modes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaleRegistry {
    internal_division: Vec<RatioSequence>,
    extension: Vec<RatioSequence>,
}

impl ScaleRegistry {
    /// Build a registry, validating every preset.
    ///
    /// Internal division ratios must lie strictly inside (0, 1) and extension
    /// ratios must be strictly greater than 1.
    pub fn new(
        internal_division: Vec<RatioSequence>,
        extension: Vec<RatioSequence>,
    ) -> CoreResult<Self> {
        validate(ScalingMode::InternalDivision, &internal_division, |r| {
            r > 0.0 && r < 1.0
        })?;
        validate(ScalingMode::Extension, &extension, |r| r > 1.0)?;
        Ok(Self {
            internal_division,
            extension,
        })
    }

    /// The presets shipped with the tool.
    pub fn builtin() -> Self {
        Self {
            internal_division: vec![
                RatioSequence::new("Fibonacci Ratio", vec![0.382, 0.5, 0.618]),
                RatioSequence::new(
                    "Octave Scale",
                    vec![0.125, 0.25, 0.375, 0.5, 0.625, 0.75, 0.875],
                ),
                RatioSequence::new("Even Thirds", vec![0.333, 0.5, 0.6667]),
                RatioSequence::new("Fifths", vec![0.2, 0.4, 0.6, 0.8]),
                RatioSequence::new(
                    "Diatonic",
                    vec![0.25, 0.333, 0.375, 0.5, 0.6667, 0.7071, 0.72],
                ),
            ],
            extension: vec![
                RatioSequence::new("Golden Expansion", vec![1.618, 2.0, 2.618, 4.236]),
                RatioSequence::new(
                    "Geometric Expansion",
                    vec![1.4142, 1.618, 1.7071, 1.7321, 2.0, 2.236, 3.1623],
                ),
            ],
        }
    }

    /// Presets for `mode`, in presentation order.
    ///
    /// `Custom` has no presets and is rejected with [`CoreError::InvalidMode`].
    pub fn ratios_for(&self, mode: ScalingMode) -> CoreResult<&[RatioSequence]> {
        match mode {
            ScalingMode::InternalDivision => Ok(&self.internal_division),
            ScalingMode::Extension => Ok(&self.extension),
            ScalingMode::Custom => Err(CoreError::InvalidMode(format!(
                "{mode} has no registry presets"
            ))),
        }
    }

    /// Presets for a mode token such as `"extension"`.
    pub fn ratios_for_token(&self, token: &str) -> CoreResult<&[RatioSequence]> {
        self.ratios_for(token.parse()?)
    }

    /// Select one preset by its position in [`ratios_for`](Self::ratios_for).
    pub fn select(&self, mode: ScalingMode, index: i64) -> CoreResult<&RatioSequence> {
        let presets = self.ratios_for(mode)?;
        usize::try_from(index)
            .ok()
            .and_then(|i| presets.get(i))
            .ok_or(CoreError::IndexOutOfRange {
                index,
                count: presets.len(),
            })
    }
}

impl Default for ScaleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate(
    mode: ScalingMode,
    presets: &[RatioSequence],
    in_range: impl Fn(f64) -> bool,
) -> CoreResult<()> {
    if presets.is_empty() {
        return Err(CoreError::InvalidConfig(format!("no {mode} presets defined")));
    }
    for preset in presets {
        if preset.name().trim().is_empty() {
            return Err(CoreError::InvalidConfig(format!(
                "{mode} preset with an empty name"
            )));
        }
        if preset.is_empty() {
            return Err(CoreError::InvalidConfig(format!(
                "{mode} preset '{}' has no ratios",
                preset.name()
            )));
        }
        if let Some(bad) = preset
            .values()
            .iter()
            .find(|r| !r.is_finite() || !in_range(**r))
        {
            return Err(CoreError::InvalidConfig(format!(
                "{mode} preset '{}' has out-of-range ratio {bad}",
                preset.name()
            )));
        }
    }
    Ok(())
}
