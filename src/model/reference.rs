use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::ModelError;

/// An accepted value with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceValue {
    /// Accepted numeric value
    pub value: f64,
    /// Source citation
    pub source: String,
    /// Units (empty for dimensionless ratios)
    #[serde(default)]
    pub units: String,
    /// Uncertainty of the accepted value, when published
    #[serde(default)]
    pub uncertainty: Option<f64>,
}

impl ReferenceValue {
    /// Create a dimensionless value without uncertainty
    pub fn new(value: f64, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
            units: String::new(),
            uncertainty: None,
        }
    }
}

/// Reference material used to calibrate mass bias, keyed by ratio name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceMaterial {
    /// Material name (e.g. "NIST SRM 610")
    pub name: String,
    /// Accepted values by ratio name (e.g. "206Pb_204Pb")
    pub values: BTreeMap<String, ReferenceValue>,
}

impl ReferenceMaterial {
    /// Create an empty reference material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insertion of an accepted value
    pub fn with_value(mut self, key: impl Into<String>, value: ReferenceValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Accepted value for `key`. Absent keys are an error, never a default.
    pub fn get_value(&self, key: &str) -> Result<&ReferenceValue, ModelError> {
        self.values
            .get(key)
            .ok_or_else(|| ModelError::MissingReferenceValue {
                material: self.name.clone(),
                key: key.to_string(),
            })
    }
}
