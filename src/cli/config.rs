//! TOML configuration file support.
//!
//! Every section is optional; anything left out falls back to the built-in
//! presets and default processing settings:
//!
//! ```toml
//! # icpms-reduce.toml
//! [processing]
//! intensity_metric = "208Pb"
//! min_signal_intensity = 1.0
//! max_blank_intensity = 0.01
//! low_cycles_warning_frac = 0.8
//! blank_cycles = 28
//! signal_cycles = { start = 32, end = 60 }
//!
//! [reference]
//! preset = "NIST610"
//!
//! [isotope_system]
//! preset = "Pb-Pb"
//! hg204_hg202_ratio = 0.2299
//!
//! [demo]
//! run_length = 50
//! ```

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use icpms_reduce::model::{IsotopeSystem, ReferenceMaterial};
use icpms_reduce::presets;
use icpms_reduce::settings::ProcessingSettings;

/// Reference material used when the config names none
pub const DEFAULT_REFERENCE: &str = "NIST610";

/// Root configuration structure for icpms-reduce.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Thresholds and cycle windows.
    #[serde(default)]
    pub processing: ProcessingSettings,

    /// Reference material for mass-bias correction.
    #[serde(default)]
    pub reference: ReferenceConfig,

    /// Isotope system the samples are reduced under.
    #[serde(default)]
    pub isotope_system: IsotopeSystemConfig,

    /// Settings for the demo command.
    #[serde(default)]
    pub demo: DemoConfig,
}

/// Reference material selection: a built-in preset or a full table.
#[derive(Debug, Default, Deserialize)]
pub struct ReferenceConfig {
    /// Built-in material name ("NIST610", "NIST612").
    pub preset: Option<String>,

    /// Custom material; takes precedence over `preset`.
    pub material: Option<ReferenceMaterial>,
}

/// Isotope system selection.
#[derive(Debug, Default, Deserialize)]
pub struct IsotopeSystemConfig {
    /// Built-in system name ("Pb-Pb").
    pub preset: Option<String>,

    /// Override of the 204Hg/202Hg ratio used for peak stripping.
    pub hg204_hg202_ratio: Option<f64>,
}

/// Configuration for the demo command.
#[derive(Debug, Default, Deserialize)]
pub struct DemoConfig {
    /// Number of samples in the synthetic session.
    pub run_length: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Load `path` if given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Validated processing settings.
    pub fn settings(&self) -> Result<&ProcessingSettings> {
        self.processing
            .validate()
            .context("Invalid [processing] section")?;
        Ok(&self.processing)
    }
}

impl ReferenceConfig {
    /// Resolve to a reference material.
    pub fn resolve(&self) -> Result<ReferenceMaterial> {
        if let Some(material) = &self.material {
            if material.values.is_empty() {
                bail!("Reference material '{}' defines no values", material.name);
            }
            return Ok(material.clone());
        }
        let name = self.preset.as_deref().unwrap_or(DEFAULT_REFERENCE);
        presets::reference_material(name)
            .ok_or_else(|| anyhow!("Unknown reference material preset: {}", name))
    }
}

impl IsotopeSystemConfig {
    /// Resolve to an isotope system, applying the peak-strip override.
    pub fn resolve(&self) -> Result<IsotopeSystem> {
        let name = self.preset.as_deref().unwrap_or(presets::PB_PB);
        let mut system = presets::isotope_system(name)
            .ok_or_else(|| anyhow!("Unknown isotope system preset: {}", name))?;

        if let Some(ratio) = self.hg204_hg202_ratio {
            if !ratio.is_finite() || ratio < 0.0 {
                bail!("hg204_hg202_ratio must be a non-negative number, got {}", ratio);
            }
            match system.peak_strip.as_mut() {
                Some(strip) => strip.known_isotope_ratio_value = ratio,
                None => bail!("Isotope system '{}' has no peak stripping to override", system.name),
            }
        }
        system.validate().context("Invalid isotope system")?;
        Ok(system)
    }
}
