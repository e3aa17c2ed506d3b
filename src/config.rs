//! Configuration for the event display pipeline
//!
//! Every tunable constant of the window finder and mapper lives here. Values
//! can be loaded from a TOML file; missing keys take their defaults.
//!
//! # Example
//! ```
//! use eventview::config::EventViewConfig;
//!
//! let config = EventViewConfig::default();
//! assert_eq!(config.coverage_fraction, 0.9);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{EventViewError, Result};
use crate::palette::Palette;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when no module in an event has positive total charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroChargePolicy {
    /// Draw every module with `base_radius`
    #[default]
    MinimumRadius,
    /// Fail the event with a degenerate-charge error
    Fail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventViewConfig {
    /// Fraction of hits the color window must span
    ///
    /// Must be in `(0, 1]`. Default: 0.9
    pub coverage_fraction: f64,

    /// Radius of a module with zero charge
    ///
    /// Default: 1.5 (sized for geometry in meters)
    pub base_radius: f64,

    /// Extra radius of the module with the largest charge in the event
    ///
    /// Default: 4.5
    pub radius_span: f64,

    pub zero_charge_policy: ZeroChargePolicy,

    /// Anchor colors from earliest to latest time
    pub palette: Palette,

    /// Minimum number of hit modules for automatic event selection
    ///
    /// Default: 25
    pub min_modules: usize,
}

impl Default for EventViewConfig {
    fn default() -> Self {
        Self {
            coverage_fraction: 0.9,
            // 3 * (0.5 + r * 1.5)
            base_radius: 1.5,
            radius_span: 4.5,
            zero_charge_policy: ZeroChargePolicy::default(),
            palette: Palette::default(),
            min_modules: 25,
        }
    }
}

impl EventViewConfig {
    /// Parse a TOML document, then validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EventViewConfig =
            toml::from_str(content).map_err(|e| EventViewError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Check value ranges the pipeline relies on
    pub fn validate(&self) -> Result<()> {
        if !(self.coverage_fraction > 0.0 && self.coverage_fraction <= 1.0) {
            return Err(EventViewError::InvalidConfig(format!(
                "coverage_fraction must be in (0, 1], got {}",
                self.coverage_fraction
            )));
        }

        for (name, value) in [
            ("base_radius", self.base_radius),
            ("radius_span", self.radius_span),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EventViewError::InvalidConfig(format!(
                    "{} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
