/// Errors raised by the data model: missing columns, malformed tables, and
/// reference-material lookups.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// A column was requested that the time series does not carry
    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    /// A sample lacks a column its isotope system needs
    #[error("Sample '{sample}' is missing isotope column '{column}'")]
    MissingIsotopeColumn {
        /// Sample name
        sample: String,
        /// Missing column label
        column: String,
    },

    /// A column was added twice
    #[error("Duplicate column: {0}")]
    DuplicateColumn(String),

    /// Column length does not match the number of cycles
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        /// Column label
        column: String,
        /// Number of cycles in the table
        expected: usize,
        /// Number of values supplied
        actual: usize,
    },

    /// Cycle labels must be strictly increasing
    #[error("Cycle index is not strictly increasing at position {0}")]
    UnorderedCycles(usize),

    /// An isotope system was defined without any ratios
    #[error("Isotope system '{0}' defines no ratios")]
    EmptyIsotopeSystem(String),

    /// Reference material has no accepted value for the requested ratio
    #[error("An entry for '{key}' not found in '{material}'")]
    MissingReferenceValue {
        /// Reference material name
        material: String,
        /// Requested ratio name
        key: String,
    },

    /// Sample type tag outside of standard/control/sample
    #[error("Unknown sample type '{0}' (expected standard, control or sample)")]
    UnknownSampleType(String),
}
