/// Errors raised when processing settings are inconsistent
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The quality metric column name is empty
    #[error("Intensity metric column must be named")]
    MissingMetric,

    /// A threshold is NaN or infinite
    #[error("Setting '{0}' must be a finite number")]
    NonFinite(&'static str),

    /// Warning fraction outside [0, 1]
    #[error("low_cycles_warning_frac must lie in [0, 1], got {0}")]
    WarningFraction(f64),

    /// Blank window must contain at least one cycle
    #[error("blank_cycles must be at least 1")]
    EmptyBlankWindow,

    /// Signal window bounds are reversed or start at cycle 0
    #[error("Invalid signal window {start}..={end}: cycles are numbered from 1 and start must not exceed end")]
    InvalidSignalWindow {
        /// First signal cycle
        start: u32,
        /// Last signal cycle
        end: u32,
    },
}
