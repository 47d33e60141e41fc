use log::debug;

use crate::diagnostics::WarningKind;
use crate::model::{IsotopeRatio, ModelError, ReducedData, Sample};

use super::stats;
use super::ProcessingError;

/// Computes isotope ratios for any isotope system.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioCalculator;

impl RatioCalculator {
    /// Create a ratio calculator
    pub fn new() -> Self {
        Self
    }

    /// Subtract isobaric interference from the target isotope, as defined by
    /// the sample's isotope system.
    ///
    /// Must run before [`reduce`](Self::reduce): it rewrites the column the
    /// ratios are computed from.
    pub fn strip_peaks(&self, mut sample: Sample) -> Result<Sample, ProcessingError> {
        let strip = sample
            .isotope_system
            .peak_strip
            .clone()
            .ok_or_else(|| ProcessingError::MissingPeakStripSettings(sample.isotope_system.name.clone()))?;

        let interference: Vec<f64> = sample
            .isotope(&strip.known_isotope_ratio.denominator)?
            .iter()
            .map(|v| v * strip.known_isotope_ratio_value)
            .collect();

        let target = sample.isotope_mut(&strip.target_isotope)?;
        for (value, correction) in target.iter_mut().zip(&interference) {
            *value -= correction;
        }

        debug!(
            "{}: stripped {} from {} using {} = {}",
            sample.name,
            strip.known_isotope_ratio.numerator,
            strip.target_isotope,
            strip.known_isotope_ratio,
            strip.known_isotope_ratio_value
        );
        Ok(sample)
    }

    /// Compute every ratio of the sample's isotope system and store mean and
    /// standard error (population std / √n) as the sample's reduced data.
    pub fn reduce(&self, mut sample: Sample) -> Result<Sample, ProcessingError> {
        if sample.timeseries.is_empty() {
            sample.warn(WarningKind::NoCyclesToReduce);
        }

        let mut reduced = ReducedData::new();
        for ratio in &sample.isotope_system.ratios {
            let series = Self::ratio_series(&sample, ratio)?;
            reduced.insert(
                ratio.name(),
                stats::mean(&series),
                stats::standard_error(&series),
            );
        }

        debug!(
            "{}: reduced {} ratios over {} cycles",
            sample.name,
            reduced.len(),
            sample.timeseries.len()
        );
        sample.reduced_data = Some(reduced);
        Ok(sample)
    }

    /// Cycle-by-cycle `numerator / denominator` for one ratio
    pub fn ratio_series(sample: &Sample, ratio: &IsotopeRatio) -> Result<Vec<f64>, ModelError> {
        let numerator = sample.isotope(&ratio.numerator)?;
        let denominator = sample.isotope(&ratio.denominator)?;
        Ok(numerator
            .iter()
            .zip(denominator)
            .map(|(n, d)| n / d)
            .collect())
    }
}
