use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ModelError, TimeSeries};

/// A ratio between two isotopes, e.g. 206Pb/204Pb.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IsotopeRatio {
    /// Numerator isotope label (e.g. "206Pb")
    pub numerator: String,
    /// Denominator isotope label (e.g. "204Pb")
    pub denominator: String,
}

impl IsotopeRatio {
    /// Create a ratio from its two isotope labels
    pub fn new(numerator: impl Into<String>, denominator: impl Into<String>) -> Self {
        Self {
            numerator: numerator.into(),
            denominator: denominator.into(),
        }
    }

    /// Ratio name as used for reduced-data keys and result columns: `{numerator}_{denominator}`
    pub fn name(&self) -> String {
        format!("{}_{}", self.numerator, self.denominator)
    }
}

impl fmt::Display for IsotopeRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Settings for correcting isobaric interference by peak stripping.
///
/// The interfering contribution on `target_isotope` is estimated as
/// `known_isotope_ratio_value * intensity(known_isotope_ratio.denominator)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeakStripSettings {
    /// Column that receives the correction (e.g. "204Pb")
    pub target_isotope: String,
    /// Ratio of the interfering element (e.g. 204Hg/202Hg)
    pub known_isotope_ratio: IsotopeRatio,
    /// Accepted value of `known_isotope_ratio`
    pub known_isotope_ratio_value: f64,
}

/// An isotope system: the ratios to compute and an optional peak-strip correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IsotopeSystem {
    /// System name (e.g. "Pb-Pb")
    pub name: String,
    /// Ratios in output order
    pub ratios: Vec<IsotopeRatio>,
    /// Interference correction applied before ratios are computed
    #[serde(default)]
    pub peak_strip: Option<PeakStripSettings>,
}

impl IsotopeSystem {
    /// Create an isotope system. Fails if `ratios` is empty.
    pub fn new(
        name: impl Into<String>,
        ratios: Vec<IsotopeRatio>,
        peak_strip: Option<PeakStripSettings>,
    ) -> Result<Self, ModelError> {
        let system = Self {
            name: name.into(),
            ratios,
            peak_strip,
        };
        system.validate()?;
        Ok(system)
    }

    /// Check the ratio list is non-empty
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.ratios.is_empty() {
            return Err(ModelError::EmptyIsotopeSystem(self.name.clone()));
        }
        Ok(())
    }

    /// Names of all ratios, in definition order
    pub fn ratio_names(&self) -> Vec<String> {
        self.ratios.iter().map(IsotopeRatio::name).collect()
    }

    /// Isotope columns referenced by the ratios, deduplicated in first-use order.
    pub fn intensity_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for ratio in &self.ratios {
            for isotope in [&ratio.numerator, &ratio.denominator] {
                if !columns.contains(isotope) {
                    columns.push(isotope.clone());
                }
            }
        }
        columns
    }

    /// Every column a sample needs under this system, including the peak-strip inputs
    pub fn required_columns(&self) -> Vec<String> {
        let mut columns = self.intensity_columns();
        if let Some(strip) = &self.peak_strip {
            for isotope in [&strip.target_isotope, &strip.known_isotope_ratio.denominator] {
                if !columns.contains(isotope) {
                    columns.push(isotope.clone());
                }
            }
        }
        columns
    }

    /// Verify `timeseries` carries every required column.
    pub fn check_columns(&self, sample: &str, timeseries: &TimeSeries) -> Result<(), ModelError> {
        match self
            .required_columns()
            .into_iter()
            .find(|column| !timeseries.has_column(column))
        {
            Some(column) => Err(ModelError::MissingIsotopeColumn {
                sample: sample.to_string(),
                column,
            }),
            None => Ok(()),
        }
    }
}
