use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// How a base duration is redistributed over a ratio sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingMode {
    /// Registry presets with ratios in (0, 1).
    InternalDivision,
    /// Registry presets with ratios above 1, compounded.
    Extension,
    /// Ad hoc ratios typed by the user.
    Custom,
}

impl ScalingMode {
    /// Modes in menu order.
    pub const ALL: [ScalingMode; 3] = [
        ScalingMode::InternalDivision,
        ScalingMode::Extension,
        ScalingMode::Custom,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            ScalingMode::InternalDivision => "internal_division",
            ScalingMode::Extension => "extension",
            ScalingMode::Custom => "custom",
        }
    }

    pub const fn policy(self) -> ScalingPolicy {
        match self {
            ScalingMode::InternalDivision | ScalingMode::Custom => ScalingPolicy::Direct,
            ScalingMode::Extension => ScalingPolicy::Compounding,
        }
    }

    /// Title used in the preset listing ("Internal_Division", "Extension").
    pub fn title(self) -> String {
        self.as_str()
            .split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join("_")
    }
}

impl fmt::Display for ScalingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScalingMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "internal_division" => Ok(ScalingMode::InternalDivision),
            "extension" => Ok(ScalingMode::Extension),
            "custom" => Ok(ScalingMode::Custom),
            _ => Err(CoreError::InvalidMode(s.trim().to_string())),
        }
    }
}

/// Composition rule for scaled outputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalingPolicy {
    /// `out[i] = base * r[i]`
    Direct,
    /// `out[i] = out[i - 1] * r[i]`, starting from `base * r[0]`
    Compounding,
}

/// A named, ordered list of scaling factors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioSequence {
    name: String,
    values: Vec<f64>,
}

impl RatioSequence {
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for RatioSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let values = self
            .values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}: [{}]", self.name, values)
    }
}
