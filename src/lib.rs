//! # icpms-reduce - Isotope Ratio Reduction for Multicollector ICP-MS
//!
//! `icpms_reduce` turns raw per-cycle ion intensities from laser-ablation or
//! solution MC-ICP-MS runs into calibrated isotope ratios.
//!
//! ## Key Features
//!
//! - **Internal Correction**: Blank/signal windowing by cycle number, hard
//!   intensity limits, z-score outlier rejection and blank subtraction.
//!
//! - **Interference Stripping**: Removes an isobaric contribution (e.g. 204Hg
//!   on 204Pb) using a monitored isotope and a known natural ratio.
//!
//! - **Standard Bracketing**: Mass-bias calibration of every unknown against
//!   the mean of the nearest reference standards in run order.
//!
//! - **Non-fatal Diagnostics**: Degenerate data (contaminated blanks, empty
//!   windows, missing brackets) is logged and collected per sample instead of
//!   aborting the run.
//!
//! - **Arrow Output**: Calibrated results convert to an Arrow `RecordBatch`
//!   for downstream persistence.
//!
//! ## Quick Start
//!
//! ```rust
//! use icpms_reduce::prelude::*;
//!
//! // A deterministic 20-sample session under the built-in Pb-Pb system
//! let session = synthetic::generate_session(&SessionConfig { run_length: 20 })?;
//!
//! let processor = DataProcessor::new(ProcessingSettings::default(), presets::nist610())?;
//! let report = processor.process(&session)?;
//!
//! for row in report.table.rows() {
//!     println!("{}: {:?}", row.name, row.values);
//! }
//! for warning in &report.warnings {
//!     eprintln!("{}", warning);
//! }
//! # Ok::<(), ProcessingError>(())
//! ```
//!
//! ## Modules
//!
//! - [`model`]: isotope systems, samples, time series, reference materials
//! - [`settings`]: run-level processing settings
//! - [`presets`]: built-in Pb-Pb system and NIST SRM 610/612 values
//! - [`processing`]: the reduction pipeline and its report
//! - [`diagnostics`]: typed processing warnings
//! - [`synthetic`]: reproducible demo sessions

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod diagnostics;
pub mod model;
pub mod presets;
pub mod processing;
pub mod settings;
pub mod synthetic;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::diagnostics::{CycleRejection, ProcessingWarning, WarningKind};
    pub use crate::model::{
        IsotopeRatio, IsotopeSystem, ModelError, PeakStripSettings, ReducedData,
        ReferenceMaterial, ReferenceValue, Sample, SampleType, TimeSeries,
    };
    pub use crate::presets;
    pub use crate::processing::{
        DataProcessor, ErrorCategory, InternalCorrector, MassBiasCorrector, ProcessingError,
        ProcessingHistory, ProcessingReport, RatioCalculator, ResultTable,
    };
    pub use crate::settings::{CycleRange, ProcessingSettings, SettingsError};
    pub use crate::synthetic::{self, SessionConfig};
}
