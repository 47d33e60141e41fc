use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Data processing history for audit trail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessingHistory {
    /// List of processing steps applied
    pub steps: Vec<ProcessingStep>,
}

/// A single data processing step in the processing history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingStep {
    /// Step order (1-indexed)
    pub order: i32,

    /// Software name
    pub software: String,

    /// Software version
    pub version: Option<String>,

    /// Processing type (e.g., "internal correction", "mass bias correction")
    pub processing_type: String,

    /// Timestamp when processing was performed
    pub timestamp: Option<String>,

    /// Processing parameters
    pub parameters: BTreeMap<String, String>,
}

impl ProcessingStep {
    /// A step performed now by this crate
    pub fn new(processing_type: impl Into<String>) -> Self {
        Self {
            order: 0,
            software: env!("CARGO_PKG_NAME").to_string(),
            version: Some(env!("CARGO_PKG_VERSION").to_string()),
            processing_type: processing_type.into(),
            timestamp: Some(chrono::Utc::now().to_rfc3339()),
            parameters: BTreeMap::new(),
        }
    }

    /// Record a parameter
    pub fn with_parameter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.parameters.insert(key.into(), value.to_string());
        self
    }
}

impl ProcessingHistory {
    /// Create a new empty processing history
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a processing step to the history, numbering it after the last one
    pub fn add_step(&mut self, mut step: ProcessingStep) {
        step.order = self.steps.len() as i32 + 1;
        self.steps.push(step);
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_are_numbered() {
        let mut history = ProcessingHistory::new();
        history.add_step(ProcessingStep::new("internal correction").with_parameter("blank_cycles", 28));
        history.add_step(ProcessingStep::new("ratio reduction"));

        assert_eq!(history.steps[0].order, 1);
        assert_eq!(history.steps[1].order, 2);
        assert_eq!(history.steps[0].parameters["blank_cycles"], "28");
        assert_eq!(history.steps[0].software, "icpms-reduce");
        assert!(history.steps[0].timestamp.is_some());
    }

    #[test]
    fn test_json_roundtrip() {
        let mut history = ProcessingHistory::new();
        history.add_step(
            ProcessingStep::new("mass bias correction").with_parameter("reference_material", "NIST SRM 610"),
        );

        let json = history.to_json().unwrap();
        let restored = ProcessingHistory::from_json(&json).unwrap();
        assert_eq!(restored, history);
    }
}
