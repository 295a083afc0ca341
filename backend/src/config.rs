//! Application configuration file support.
//!
//! Settings are read from a TOML file (`platinum.toml`) and may be overridden
//! by environment variables and command-line flags.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{CoreError, CoreResult};
use crate::models::{RatioSequence, ScalingMode};
use crate::scales::ScaleRegistry;
use crate::services::astro::DEFAULT_STEP_DAYS;
use crate::services::license::LicenseGate;

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG: &str = "PLATINUM_CONFIG";
/// Environment variable overriding `astro.cache_dir`.
pub const ENV_CACHE_DIR: &str = "PLATINUM_CACHE_DIR";
/// Environment variable supplying the access key non-interactively.
pub const ENV_LICENSE_KEY: &str = "PLATINUM_LICENSE_KEY";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub license: LicenseSettings,
    #[serde(default)]
    pub astro: AstroSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub scales: ScaleSettings,
}

/// Accepted access keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseSettings {
    #[serde(default = "default_license_keys")]
    pub keys: Vec<String>,
    /// Key to use instead of prompting.
    #[serde(default)]
    pub key: Option<String>,
}

/// Ephemeris settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AstroSettings {
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    #[serde(default = "default_step_days")]
    pub default_step_days: f64,
    #[serde(default = "default_use_cache")]
    pub use_cache: bool,
}

/// Export settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportSettings {
    /// Directory offered as the default at export prompts.
    #[serde(default)]
    pub directory: Option<PathBuf>,
}

/// Preset overrides. An empty table keeps the built-in presets for that mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleSettings {
    #[serde(default)]
    pub internal_division: Vec<RatioSequence>,
    #[serde(default)]
    pub extension: Vec<RatioSequence>,
}

fn default_license_keys() -> Vec<String> {
    vec!["PLATINUM2025-2025-10-30".to_string()]
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

fn default_step_days() -> f64 {
    DEFAULT_STEP_DAYS
}

fn default_use_cache() -> bool {
    true
}

impl Default for LicenseSettings {
    fn default() -> Self {
        Self {
            keys: default_license_keys(),
            key: None,
        }
    }
}

impl Default for AstroSettings {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            default_step_days: default_step_days(),
            use_cache: default_use_cache(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(AppConfig)` if successful
    /// * `Err(CoreError::InvalidConfig)` if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> CoreResult<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            CoreError::InvalidConfig(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> CoreResult<Self> {
        let config: AppConfig = toml::from_str(content).map_err(|e| {
            CoreError::InvalidConfig(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches for `platinum.toml` in:
    /// 1. Current directory
    /// 2. `backend/` directory
    /// 3. Parent directory
    ///
    /// Returns `Ok(None)` when no file exists.
    pub fn from_default_location() -> CoreResult<Option<Self>> {
        let search_paths = [
            PathBuf::from("platinum.toml"),
            PathBuf::from("backend/platinum.toml"),
            PathBuf::from("../platinum.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path).map(Some);
            }
        }
        Ok(None)
    }

    /// Resolve the configuration for a run: an explicit path wins, then
    /// `PLATINUM_CONFIG`, then the default search, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> CoreResult<Self> {
        let from_env = std::env::var_os(ENV_CONFIG).map(PathBuf::from);
        let mut config = match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(path)?,
            None => Self::from_default_location()?.unwrap_or_default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Apply `PLATINUM_CACHE_DIR` and `PLATINUM_LICENSE_KEY` overrides.
    pub fn apply_env(&mut self) {
        if let Some(dir) = std::env::var_os(ENV_CACHE_DIR).filter(|d| !d.is_empty()) {
            self.astro.cache_dir = PathBuf::from(dir);
        }
        if let Ok(key) = std::env::var(ENV_LICENSE_KEY) {
            if !key.trim().is_empty() {
                self.license.key = Some(key);
            }
        }
    }

    fn validate(&self) -> CoreResult<()> {
        let step = self.astro.default_step_days;
        if !step.is_finite() || step <= 0.0 {
            return Err(CoreError::InvalidConfig(format!(
                "astro.default_step_days must be positive, got {step}"
            )));
        }
        self.scale_registry()?;
        self.license_gate()?;
        Ok(())
    }

    /// Registry from the configured presets, falling back to the built-in
    /// table for any mode left empty.
    pub fn scale_registry(&self) -> CoreResult<ScaleRegistry> {
        let builtin = ScaleRegistry::builtin();
        let pick = |configured: &[RatioSequence], mode| -> CoreResult<Vec<RatioSequence>> {
            if configured.is_empty() {
                Ok(builtin.ratios_for(mode)?.to_vec())
            } else {
                Ok(configured.to_vec())
            }
        };
        ScaleRegistry::new(
            pick(&self.scales.internal_division, ScalingMode::InternalDivision)?,
            pick(&self.scales.extension, ScalingMode::Extension)?,
        )
    }

    pub fn license_gate(&self) -> CoreResult<LicenseGate> {
        LicenseGate::from_strings(self.license.keys.as_slice())
    }
}

impl FromStr for AppConfig {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_toml(s)
    }
}
