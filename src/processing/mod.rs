//! # Processing Pipeline
//!
//! Turns raw per-cycle intensities into calibrated isotope ratios.
//!
//! ## Stages
//!
//! 1. **Internal correction** ([`InternalCorrector`]): split each sample into
//!    blank and signal windows, reject cycles by hard intensity limits and
//!    z-score, subtract the blank mean from the signal
//! 2. **Peak stripping** ([`RatioCalculator::strip_peaks`]): remove an
//!    isobaric interference when the isotope system defines one
//! 3. **Ratio reduction** ([`RatioCalculator::reduce`]): mean and standard
//!    error of every ratio over the surviving cycles
//! 4. **Mass-bias correction** ([`MassBiasCorrector`]): calibrate every
//!    non-standard sample against the mean of its bracketing standards
//!
//! [`DataProcessor`] runs all four in order and returns a [`ProcessingReport`].
//! Degenerate data never aborts a run: it is recorded as a warning on the
//! affected sample and carried into the report.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use icpms_reduce::prelude::*;
//!
//! let processor = DataProcessor::new(ProcessingSettings::default(), presets::nist610())?;
//! let session = synthetic::generate_session(&SessionConfig::default())?;
//! let report = processor.process(&session)?;
//! println!("{}", report);
//! # Ok::<(), ProcessingError>(())
//! ```

pub mod stats;

mod error;
mod history;
mod internal;
mod mass_bias;
mod processor;
mod ratio;
mod report;
mod table;

pub use error::{ErrorCategory, ProcessingError};
pub use history::{ProcessingHistory, ProcessingStep};
pub use internal::{IntensityLimit, InternalCorrector, Z_SCORE_LIMIT};
pub use mass_bias::MassBiasCorrector;
pub use processor::DataProcessor;
pub use ratio::RatioCalculator;
pub use report::ProcessingReport;
pub use table::{ResultRow, ResultTable, NAME_COLUMN, TYPE_COLUMN};
