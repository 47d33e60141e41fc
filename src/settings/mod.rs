//! # Processing Settings
//!
//! Thresholds and cycle windows for one processing run. A settings value is
//! passed explicitly to the components that need it and is immutable for the
//! lifetime of the run.
//!
//! ```
//! use icpms_reduce::settings::{CycleRange, ProcessingSettings};
//!
//! let settings = ProcessingSettings {
//!     blank_cycles: 25,
//!     signal_cycles: CycleRange::new(30, 60),
//!     ..Default::default()
//! };
//! settings.validate()?;
//! # Ok::<(), icpms_reduce::settings::SettingsError>(())
//! ```

mod error;

use serde::{Deserialize, Serialize};

pub use error::SettingsError;

/// Inclusive range of cycle numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRange {
    /// First cycle (inclusive)
    pub start: u32,
    /// Last cycle (inclusive)
    pub end: u32,
}

impl CycleRange {
    /// Create a range `start..=end`
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Whether `cycle` lies within the range
    pub fn contains(&self, cycle: u32) -> bool {
        cycle >= self.start && cycle <= self.end
    }
}

/// Settings for cycle rejection and window selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    /// Column judged against the intensity limits (e.g. "208Pb")
    pub intensity_metric: String,
    /// Signal cycles with a metric below this are rejected
    pub min_signal_intensity: f64,
    /// Blank cycles with a metric above this are rejected
    pub max_blank_intensity: f64,
    /// Warn when fewer than this fraction of a window's cycles survive
    pub low_cycles_warning_frac: f64,
    /// Blank window is cycles `1..=blank_cycles`
    pub blank_cycles: u32,
    /// Signal window
    pub signal_cycles: CycleRange,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            intensity_metric: "208Pb".to_string(),
            min_signal_intensity: 1.0,
            max_blank_intensity: 0.01,
            low_cycles_warning_frac: 0.8,
            blank_cycles: 28,
            signal_cycles: CycleRange::new(32, 60),
        }
    }
}

impl ProcessingSettings {
    /// Blank window as a cycle range
    pub fn blank_window(&self) -> CycleRange {
        CycleRange::new(1, self.blank_cycles)
    }

    /// Check the settings describe a usable run.
    ///
    /// An overlap between blank and signal windows is allowed but logged.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.intensity_metric.trim().is_empty() {
            return Err(SettingsError::MissingMetric);
        }
        if !self.min_signal_intensity.is_finite() {
            return Err(SettingsError::NonFinite("min_signal_intensity"));
        }
        if !self.max_blank_intensity.is_finite() {
            return Err(SettingsError::NonFinite("max_blank_intensity"));
        }
        if !(0.0..=1.0).contains(&self.low_cycles_warning_frac) {
            return Err(SettingsError::WarningFraction(self.low_cycles_warning_frac));
        }
        if self.blank_cycles == 0 {
            return Err(SettingsError::EmptyBlankWindow);
        }
        let signal = self.signal_cycles;
        if signal.start == 0 || signal.start > signal.end {
            return Err(SettingsError::InvalidSignalWindow {
                start: signal.start,
                end: signal.end,
            });
        }
        if signal.start <= self.blank_cycles {
            log::warn!(
                "Blank window 1..={} overlaps signal window {}..={}",
                self.blank_cycles,
                signal.start,
                signal.end
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings_valid() {
        ProcessingSettings::default().validate().unwrap();
    }

    #[test]
    fn test_warning_fraction_bounds() {
        let settings = ProcessingSettings {
            low_cycles_warning_frac: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::WarningFraction(f)) if f == 1.5
        ));
    }

    #[test]
    fn test_reversed_signal_window() {
        let settings = ProcessingSettings {
            signal_cycles: CycleRange::new(50, 40),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidSignalWindow { start: 50, end: 40 })
        ));
    }

    #[test]
    fn test_zero_blank_cycles() {
        let settings = ProcessingSettings {
            blank_cycles: 0,
            ..Default::default()
        };
        assert!(matches!(settings.validate(), Err(SettingsError::EmptyBlankWindow)));
    }

    #[test]
    fn test_non_finite_threshold() {
        let settings = ProcessingSettings {
            max_blank_intensity: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::NonFinite("max_blank_intensity"))
        ));
    }

    #[test]
    fn test_overlap_is_allowed() {
        let settings = ProcessingSettings {
            blank_cycles: 40,
            signal_cycles: CycleRange::new(30, 60),
            ..Default::default()
        };
        assert!(settings.validate().is_ok());
        assert!(settings.blank_window().contains(35));
    }
}
