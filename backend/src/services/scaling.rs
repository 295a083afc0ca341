//! Scaling pipeline: project a base duration through a ratio sequence.

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::models::{RatioSequence, ScalingMode, ScalingPolicy};
use crate::scales::ScaleRegistry;

/// Scale `base` by every ratio in `ratios`.
///
/// With [`ScalingPolicy::Direct`] each output is `base * r[i]`. With
/// [`ScalingPolicy::Compounding`] each output multiplies the previous output,
/// so `[r0, r1, r2]` yields `[B*r0, B*r0*r1, B*r0*r1*r2]`.
///
/// A zero base or an empty ratio list is [`CoreError::NoResult`].
pub fn scale_duration(base: f64, ratios: &[f64], policy: ScalingPolicy) -> CoreResult<Vec<f64>> {
    if base == 0.0 {
        return Err(CoreError::NoResult("No time difference".to_string()));
    }
    if ratios.is_empty() {
        return Err(CoreError::NoResult("no scaling ratios given".to_string()));
    }

    let scaled = match policy {
        ScalingPolicy::Direct => ratios.iter().map(|r| base * r).collect(),
        ScalingPolicy::Compounding => ratios
            .iter()
            .scan(base, |current, r| {
                *current *= r;
                Some(*current)
            })
            .collect(),
    };

    Ok(scaled)
}

/// Parse comma-separated ad hoc ratios such as `"0.5, 0.75"`.
///
/// Negative values are accepted; empty items are not.
pub fn parse_custom_ratios(raw: &str) -> CoreResult<RatioSequence> {
    let values = raw
        .split(',')
        .map(|item| {
            let item = item.trim();
            item.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| CoreError::InvalidFormat(format!("'{item}' is not a ratio")))
        })
        .collect::<CoreResult<Vec<f64>>>()?;

    Ok(RatioSequence::new("Custom", values))
}

/// A chosen mode together with the ratios it will apply.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingPlan {
    mode: ScalingMode,
    sequence: RatioSequence,
}

impl ScalingPlan {
    /// Plan using preset `index` of `mode` from the registry.
    pub fn from_registry(
        registry: &ScaleRegistry,
        mode: ScalingMode,
        index: i64,
    ) -> CoreResult<Self> {
        let sequence = registry.select(mode, index)?.clone();
        debug!(%mode, preset = sequence.name(), "selected scaling preset");
        Ok(Self { mode, sequence })
    }

    /// Plan for user-supplied ratios.
    pub fn custom(sequence: RatioSequence) -> Self {
        Self {
            mode: ScalingMode::Custom,
            sequence,
        }
    }

    pub fn mode(&self) -> ScalingMode {
        self.mode
    }

    pub fn sequence(&self) -> &RatioSequence {
        &self.sequence
    }

    /// Run the pipeline on `base` with the mode's policy.
    pub fn apply(&self, base: f64) -> CoreResult<Vec<f64>> {
        scale_duration(base, self.sequence.values(), self.mode.policy())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_direct_scenario() {
        assert_eq!(
            scale_duration(10.0, &[0.5, 0.25], ScalingPolicy::Direct).unwrap(),
            vec![5.0, 2.5]
        );
    }

    #[test]
    fn test_compounding_scenario() {
        assert_eq!(
            scale_duration(10.0, &[2.0, 3.0], ScalingPolicy::Compounding).unwrap(),
            vec![20.0, 60.0]
        );
    }

    #[test]
    fn test_compounding_multiplies_previous_output() {
        let out = scale_duration(12.0, &[1.618, 2.0, 2.618], ScalingPolicy::Compounding).unwrap();
        assert_relative_eq!(out[0], 12.0 * 1.618);
        assert_relative_eq!(out[1], 12.0 * 1.618 * 2.0);
        assert_relative_eq!(out[2], 12.0 * 1.618 * 2.0 * 2.618);
    }

    #[test]
    fn test_zero_base_is_no_result() {
        for policy in [ScalingPolicy::Direct, ScalingPolicy::Compounding] {
            assert!(matches!(
                scale_duration(0.0, &[0.5], policy),
                Err(CoreError::NoResult(_))
            ));
        }
    }

    #[test]
    fn test_empty_ratios_is_no_result() {
        assert!(matches!(
            scale_duration(3.0, &[], ScalingPolicy::Direct),
            Err(CoreError::NoResult(_))
        ));
    }

    #[test]
    fn test_parse_custom_ratios() {
        let seq = parse_custom_ratios("0.5, 0.75,-2").unwrap();
        assert_eq!(seq.name(), "Custom");
        assert_eq!(seq.values(), &[0.5, 0.75, -2.0]);
    }

    #[test]
    fn test_parse_custom_ratios_rejects_bad_items() {
        for bad in ["", "0.5,,0.7", "half", "0.5, inf"] {
            assert!(
                matches!(parse_custom_ratios(bad), Err(CoreError::InvalidFormat(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_plan_uses_mode_policy() {
        let registry = ScaleRegistry::builtin();
        let plan = ScalingPlan::from_registry(&registry, ScalingMode::Extension, 0).unwrap();
        let out = plan.apply(1.0).unwrap();
        assert_relative_eq!(out[1], 1.618 * 2.0);

        let plan = ScalingPlan::from_registry(&registry, ScalingMode::InternalDivision, 3).unwrap();
        assert_eq!(plan.sequence().name(), "Fifths");
        assert_eq!(plan.apply(10.0).unwrap(), vec![2.0, 4.0, 6.0, 8.0]);
    }

    #[test]
    fn test_custom_plan_is_direct() {
        let plan = ScalingPlan::custom(RatioSequence::new("Custom", vec![2.0, 3.0]));
        assert_eq!(plan.mode(), ScalingMode::Custom);
        assert_eq!(plan.apply(10.0).unwrap(), vec![20.0, 30.0]);
    }
}
