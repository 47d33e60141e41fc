//! # Data Model
//!
//! Typed in-memory representation of a loaded analytical session:
//!
//! - [`IsotopeSystem`]: which ratios are computed, plus an optional
//!   [`PeakStripSettings`] interference correction
//! - [`Sample`]: one run's cycle intensities ([`TimeSeries`]) tagged with a
//!   [`SampleType`], and its [`ReducedData`] once ratios are computed
//! - [`ReferenceMaterial`]: accepted ratio values used for mass-bias calibration
//!
//! Samples move through the processing stages by value; each stage owns the
//! sample for the duration of its call and hands it back.

mod error;
mod isotope;
mod reference;
mod sample;
mod timeseries;

#[cfg(test)]
mod tests;

pub use error::ModelError;
pub use isotope::{IsotopeRatio, IsotopeSystem, PeakStripSettings};
pub use reference::{ReferenceMaterial, ReferenceValue};
pub use sample::{RatioStatistic, ReducedData, Sample, SampleType};
pub use timeseries::TimeSeries;
