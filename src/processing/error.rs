use crate::model::ModelError;
use crate::settings::SettingsError;

/// Broad class of a fatal processing error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Setup mistake that invalidates every result of the run
    Configuration,
    /// Data needed by a stage is absent or malformed
    DataAvailability,
}

/// Fatal errors raised by the processing pipeline
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    /// Peak stripping was requested for a system without peak-strip settings
    #[error("No peak strip settings defined for isotope system '{0}'")]
    MissingPeakStripSettings(String),

    /// The quality metric column is absent from a sample
    #[error("Sample '{sample}' has no intensity metric column '{column}'")]
    MissingMetricColumn {
        /// Sample name
        sample: String,
        /// Configured metric column
        column: String,
    },

    /// The batch contains no standard to calibrate against
    #[error("No standards found in dataset")]
    NoStandards,

    /// Ratios were not computed before mass-bias correction
    #[error("Reduced data is missing for '{0}'")]
    MissingReducedData(String),

    /// A ratio of the isotope system is absent from a sample's reduced data
    #[error("Ratio '{ratio}' is missing from the reduced data of '{sample}'")]
    MissingRatio {
        /// Sample name
        sample: String,
        /// Ratio name
        ratio: String,
    },

    /// The bracketing standards carry no value for a ratio
    #[error("Bracketing standards for '{sample}' have no value for ratio '{ratio}'")]
    MissingStandardRatio {
        /// Sample being calibrated
        sample: String,
        /// Ratio name
        ratio: String,
    },

    /// Data model error (missing column, missing reference value, ...)
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Invalid processing settings
    #[error("Invalid settings: {0}")]
    Settings(#[from] SettingsError),
}

impl ProcessingError {
    /// Classify the error
    pub fn category(&self) -> ErrorCategory {
        match self {
            ProcessingError::MissingPeakStripSettings(_)
            | ProcessingError::MissingMetricColumn { .. }
            | ProcessingError::Settings(_) => ErrorCategory::Configuration,
            ProcessingError::NoStandards
            | ProcessingError::MissingReducedData(_)
            | ProcessingError::MissingRatio { .. }
            | ProcessingError::MissingStandardRatio { .. } => ErrorCategory::DataAvailability,
            ProcessingError::Model(err) => match err {
                ModelError::LengthMismatch { .. }
                | ModelError::DuplicateColumn(_)
                | ModelError::UnorderedCycles(_) => ErrorCategory::DataAvailability,
                _ => ErrorCategory::Configuration,
            },
        }
    }
}
