//! Engine configuration.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Model units (centimeters) to scene units.
pub const DEFAULT_UNIT_SCALE: f64 = 0.1;

/// Gap between synthesized memory modules, in scene units.
pub const DEFAULT_RAM_SPACING: f64 = 0.15;

/// Upper bound on placed memory modules, whatever quantity a build asks for.
pub const DEFAULT_MAX_RAM_MODULES: usize = 32;

/// Tunables for the placement composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Factor applied uniformly to anchor positions. Rotations are not scaled.
    pub unit_scale: f64,
    /// Spacing along X between memory modules that have no slot.
    pub ram_spacing: f64,
    /// Memory quantities above this are clamped.
    pub max_ram_modules: usize,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            unit_scale: DEFAULT_UNIT_SCALE,
            ram_spacing: DEFAULT_RAM_SPACING,
            max_ram_modules: DEFAULT_MAX_RAM_MODULES,
        }
    }
}

impl PlacementConfig {
    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Serialization(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| {
            ConfigError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded placement config from {}", path.display());
        Ok(config)
    }

    /// Scale and spacing must be finite and positive; the module cap non-zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.unit_scale.is_finite() || self.unit_scale <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "unit_scale must be positive, got {}",
                self.unit_scale
            )));
        }
        if !self.ram_spacing.is_finite() || self.ram_spacing <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "ram_spacing must be positive, got {}",
                self.ram_spacing
            )));
        }
        if self.max_ram_modules == 0 {
            return Err(ConfigError::Invalid(
                "max_ram_modules must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
