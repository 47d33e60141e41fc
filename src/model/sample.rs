use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::diagnostics::{CycleRejection, ProcessingWarning, WarningKind};

use super::{IsotopeSystem, ModelError, TimeSeries};

/// Role of a measurement within an analytical session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SampleType {
    /// Reference standard used for mass-bias calibration
    Standard,
    /// Secondary reference material treated as an unknown
    Control,
    /// Unknown
    Sample,
}

impl SampleType {
    /// Lowercase tag used in result tables
    pub fn as_str(&self) -> &'static str {
        match self {
            SampleType::Standard => "standard",
            SampleType::Control => "control",
            SampleType::Sample => "sample",
        }
    }

    /// True for calibration standards
    pub fn is_standard(&self) -> bool {
        matches!(self, SampleType::Standard)
    }
}

impl fmt::Display for SampleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SampleType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(SampleType::Standard),
            "control" => Ok(SampleType::Control),
            "sample" => Ok(SampleType::Sample),
            _ => Err(ModelError::UnknownSampleType(s.to_string())),
        }
    }
}

/// Mean and standard error of one isotope ratio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatioStatistic {
    /// Ratio name (e.g. "206Pb_204Pb")
    pub ratio: String,
    /// Mean over all surviving cycles
    pub mean: f64,
    /// Standard error of the mean
    pub std_err: f64,
}

/// Reduced data of a sample: one statistic per ratio, in insertion order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReducedData {
    statistics: Vec<RatioStatistic>,
}

impl ReducedData {
    /// Empty reduced data
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the statistic for `ratio`
    pub fn insert(&mut self, ratio: impl Into<String>, mean: f64, std_err: f64) {
        let ratio = ratio.into();
        match self.statistics.iter_mut().find(|s| s.ratio == ratio) {
            Some(existing) => {
                existing.mean = mean;
                existing.std_err = std_err;
            }
            None => self.statistics.push(RatioStatistic { ratio, mean, std_err }),
        }
    }

    /// Statistic for `ratio`
    pub fn get(&self, ratio: &str) -> Option<&RatioStatistic> {
        self.statistics.iter().find(|s| s.ratio == ratio)
    }

    /// Mean of `ratio`
    pub fn mean(&self, ratio: &str) -> Option<f64> {
        self.get(ratio).map(|s| s.mean)
    }

    /// Standard error of `ratio`
    pub fn std_err(&self, ratio: &str) -> Option<f64> {
        self.get(ratio).map(|s| s.std_err)
    }

    /// Look up a flat column: `{ratio}` gives the mean, `{ratio}_err` the standard error.
    pub fn value(&self, column: &str) -> Option<f64> {
        if let Some(mean) = self.mean(column) {
            return Some(mean);
        }
        column
            .strip_suffix("_err")
            .and_then(|ratio| self.std_err(ratio))
    }

    /// Flat column names: `{ratio}`, `{ratio}_err` for every ratio
    pub fn column_names(&self) -> Vec<String> {
        self.statistics
            .iter()
            .flat_map(|s| [s.ratio.clone(), format!("{}_err", s.ratio)])
            .collect()
    }

    /// Iterate over the statistics
    pub fn iter(&self) -> impl Iterator<Item = &RatioStatistic> {
        self.statistics.iter()
    }

    /// Number of ratios
    pub fn len(&self) -> usize {
        self.statistics.len()
    }

    /// True if no ratio has been stored
    pub fn is_empty(&self) -> bool {
        self.statistics.is_empty()
    }

    /// Element-wise mean with another reduced data set, matched by ratio name.
    ///
    /// A ratio present on only one side keeps that side's value.
    pub fn average_with(&self, other: &ReducedData) -> ReducedData {
        let mut averaged = ReducedData::new();
        for stat in &self.statistics {
            match other.get(&stat.ratio) {
                Some(o) => averaged.insert(
                    stat.ratio.clone(),
                    (stat.mean + o.mean) / 2.0,
                    (stat.std_err + o.std_err) / 2.0,
                ),
                None => averaged.insert(stat.ratio.clone(), stat.mean, stat.std_err),
            }
        }
        for stat in &other.statistics {
            if self.get(&stat.ratio).is_none() {
                averaged.insert(stat.ratio.clone(), stat.mean, stat.std_err);
            }
        }
        averaged
    }
}

/// One analytical run: its cycle intensities, reduced statistics and warnings.
#[derive(Debug, Clone)]
pub struct Sample {
    /// Sample name from the sample map
    pub name: String,
    /// Role within the session
    pub sample_type: SampleType,
    /// Isotope system the sample is reduced under
    pub isotope_system: Arc<IsotopeSystem>,
    /// Cycle intensities; corrected in place by the pipeline stages
    pub timeseries: TimeSeries,
    /// Ratio statistics; `None` until the ratio calculator has run
    pub reduced_data: Option<ReducedData>,
    /// Degenerate-data warnings raised while processing this sample
    pub warnings: Vec<ProcessingWarning>,
    /// Rejected-cycle counts of the blank and signal windows
    pub rejections: Vec<CycleRejection>,
}

impl Sample {
    /// Create an unprocessed sample
    pub fn new(
        name: impl Into<String>,
        sample_type: SampleType,
        isotope_system: Arc<IsotopeSystem>,
        timeseries: TimeSeries,
    ) -> Self {
        Self {
            name: name.into(),
            sample_type,
            isotope_system,
            timeseries,
            reduced_data: None,
            warnings: Vec::new(),
            rejections: Vec::new(),
        }
    }

    /// True for calibration standards
    pub fn is_standard(&self) -> bool {
        self.sample_type.is_standard()
    }

    /// Verify the time series carries every column the isotope system needs
    pub fn check_columns(&self) -> Result<(), ModelError> {
        self.isotope_system.check_columns(&self.name, &self.timeseries)
    }

    /// Borrow an isotope column, naming this sample if it is absent
    pub fn isotope(&self, column: &str) -> Result<&[f64], ModelError> {
        let name = &self.name;
        self.timeseries
            .column(column)
            .map_err(|_| missing_isotope(name, column))
    }

    /// Mutably borrow an isotope column, naming this sample if it is absent
    pub fn isotope_mut(&mut self, column: &str) -> Result<&mut [f64], ModelError> {
        let name = &self.name;
        self.timeseries
            .column_mut(column)
            .map_err(|_| missing_isotope(name, column))
    }

    /// Record a degenerate-data warning and log it.
    pub fn warn(&mut self, kind: WarningKind) {
        let warning = ProcessingWarning::new(self.name.clone(), kind);
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// A sample over a cycle window of this one, sharing its isotope system.
    pub(crate) fn window(&self, label: &str, timeseries: TimeSeries) -> Sample {
        Sample::new(
            format!("{} ({})", self.name, label),
            self.sample_type,
            Arc::clone(&self.isotope_system),
            timeseries,
        )
    }
}

fn missing_isotope(sample: &str, column: &str) -> ModelError {
    ModelError::MissingIsotopeColumn {
        sample: sample.to_string(),
        column: column.to_string(),
    }
}
