use log::{debug, info};

use crate::diagnostics::WarningKind;
use crate::model::{ReducedData, ReferenceMaterial, Sample};

use super::ProcessingError;

/// Expected instrument response at one run position
struct Bracket {
    values: ReducedData,
    warning: Option<WarningKind>,
}

/// Mass-bias correction by sample-standard bracketing.
///
/// Every non-standard measurement is calibrated against the mean of the
/// standards immediately before and after it in run order:
///
/// ```text
/// calibrated = measured / bracketing_standard * accepted_value
/// ```
///
/// Standard errors pass through unchanged; the dispersion of the bracketing
/// standards is not propagated.
#[derive(Debug, Clone)]
pub struct MassBiasCorrector {
    reference_material: ReferenceMaterial,
}

impl MassBiasCorrector {
    /// Create a corrector calibrating against `reference_material`
    pub fn new(reference_material: ReferenceMaterial) -> Self {
        Self { reference_material }
    }

    /// Reference material in use
    pub fn reference_material(&self) -> &ReferenceMaterial {
        &self.reference_material
    }

    /// Calibrate a session given in run order.
    ///
    /// Returns the non-standard measurements, still in run order, with their
    /// reduced data replaced by calibrated values. Standards are consumed.
    pub fn correct(&self, measurements: Vec<Sample>) -> Result<Vec<Sample>, ProcessingError> {
        let standard_positions: Vec<usize> = measurements
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_standard())
            .map(|(pos, _)| pos)
            .collect();

        if standard_positions.is_empty() {
            return Err(ProcessingError::NoStandards);
        }

        // Single ordered pass carrying the most recent standard
        let mut prev_standard: Option<usize> = None;
        let mut brackets: Vec<Option<Bracket>> = Vec::with_capacity(measurements.len());
        for (position, measurement) in measurements.iter().enumerate() {
            if measurement.is_standard() {
                prev_standard = Some(position);
                brackets.push(None);
                continue;
            }
            let bracket =
                Self::bracket(position, &measurements, &standard_positions, prev_standard)?;
            brackets.push(Some(bracket));
        }

        let mut results = Vec::with_capacity(measurements.len() - standard_positions.len());
        for (mut measurement, bracket) in measurements.into_iter().zip(brackets) {
            let Some(bracket) = bracket else {
                continue;
            };
            if let Some(kind) = bracket.warning {
                measurement.warn(kind);
            }
            results.push(self.apply_correction(measurement, &bracket.values)?);
        }

        info!(
            "Mass-bias corrected {} measurements against {} standards ({})",
            results.len(),
            standard_positions.len(),
            self.reference_material.name
        );
        Ok(results)
    }

    /// Interpolated standard response for the measurement at `position`.
    ///
    /// Uses the mean of the previous and next standard; at either end of the
    /// run only the one standard available is used.
    fn bracket(
        position: usize,
        run: &[Sample],
        standard_positions: &[usize],
        prev_standard: Option<usize>,
    ) -> Result<Bracket, ProcessingError> {
        let next_idx = standard_positions.partition_point(|&p| p <= position);
        let next_standard = standard_positions.get(next_idx).copied();

        let bracket = match (prev_standard, next_standard) {
            (Some(prev), Some(next)) => {
                debug!(
                    "{}: bracketed by '{}' and '{}'",
                    run[position].name, run[prev].name, run[next].name
                );
                Bracket {
                    values: reduced(&run[prev])?.average_with(reduced(&run[next])?),
                    warning: None,
                }
            }
            (Some(prev), None) => Bracket {
                values: reduced(&run[prev])?.clone(),
                warning: Some(WarningKind::NoFollowingStandard),
            },
            (None, Some(next)) => Bracket {
                values: reduced(&run[next])?.clone(),
                warning: Some(WarningKind::NoPrecedingStandard),
            },
            (None, None) => return Err(ProcessingError::NoStandards),
        };
        Ok(bracket)
    }

    /// Rescale a measurement's ratios against the bracketing standard values
    fn apply_correction(
        &self,
        mut measurement: Sample,
        standard: &ReducedData,
    ) -> Result<Sample, ProcessingError> {
        let measured = reduced(&measurement)?;

        let mut corrected = ReducedData::new();
        for ratio in &measurement.isotope_system.ratios {
            let name = ratio.name();
            let value = measured
                .get(&name)
                .ok_or_else(|| ProcessingError::MissingRatio {
                    sample: measurement.name.clone(),
                    ratio: name.clone(),
                })?;
            let standard_value =
                standard
                    .mean(&name)
                    .ok_or_else(|| ProcessingError::MissingStandardRatio {
                        sample: measurement.name.clone(),
                        ratio: name.clone(),
                    })?;
            let accepted = self.reference_material.get_value(&name)?.value;

            corrected.insert(
                name,
                value.mean / standard_value * accepted,
                value.std_err,
            );
        }

        measurement.reduced_data = Some(corrected);
        Ok(measurement)
    }
}

fn reduced(sample: &Sample) -> Result<&ReducedData, ProcessingError> {
    sample
        .reduced_data
        .as_ref()
        .ok_or_else(|| ProcessingError::MissingReducedData(sample.name.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IsotopeRatio, IsotopeSystem, ReferenceValue, SampleType, TimeSeries};
    use crate::processing::ErrorCategory;
    use std::sync::Arc;

    const RATIO: &str = "206Pb_204Pb";

    fn system() -> Arc<IsotopeSystem> {
        Arc::new(
            IsotopeSystem::new("Pb-Pb", vec![IsotopeRatio::new("206Pb", "204Pb")], None).unwrap(),
        )
    }

    fn reduced_sample(name: &str, sample_type: SampleType, ratio: f64, err: f64) -> Sample {
        let mut sample = Sample::new(name, sample_type, system(), TimeSeries::default());
        let mut data = ReducedData::new();
        data.insert(RATIO, ratio, err);
        sample.reduced_data = Some(data);
        sample
    }

    fn material(value: f64) -> ReferenceMaterial {
        ReferenceMaterial::new("NIST SRM 610")
            .with_value(RATIO, ReferenceValue::new(value, "Baker et al 2004, Chem Geol"))
    }

    fn calibrated(sample: &Sample) -> f64 {
        sample.reduced_data.as_ref().unwrap().mean(RATIO).unwrap()
    }

    #[test]
    fn test_single_standard_then_sample() {
        let run = vec![
            reduced_sample("NIST610_001", SampleType::Standard, 17.0, 0.01),
            reduced_sample("my_smpl_001", SampleType::Sample, 8.5, 0.02),
        ];

        let results = MassBiasCorrector::new(material(17.052)).correct(run).unwrap();

        assert_eq!(results.len(), 1);
        assert!((calibrated(&results[0]) - 8.5 / 17.0 * 17.052).abs() < 1e-12);
        assert!((calibrated(&results[0]) - 8.526).abs() < 1e-9);
        assert_eq!(
            results[0].reduced_data.as_ref().unwrap().std_err(RATIO),
            Some(0.02)
        );
        assert_eq!(results[0].warnings[0].kind, WarningKind::NoFollowingStandard);
    }

    #[test]
    fn test_bracketing_uses_mean_of_neighbours() {
        let run = vec![
            reduced_sample("STD-1", SampleType::Standard, 16.0, 0.01),
            reduced_sample("S-1", SampleType::Sample, 8.5, 0.02),
            reduced_sample("C-1", SampleType::Control, 17.0, 0.02),
            reduced_sample("STD-2", SampleType::Standard, 18.0, 0.01),
        ];

        let results = MassBiasCorrector::new(material(17.052)).correct(run).unwrap();

        let names: Vec<_> = results.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["S-1", "C-1"]);
        assert!((calibrated(&results[0]) - 8.5 / 17.0 * 17.052).abs() < 1e-12);
        assert!((calibrated(&results[1]) - 17.052).abs() < 1e-12);
        assert!(results.iter().all(|s| s.warnings.is_empty()));
    }

    #[test]
    fn test_uses_nearest_following_standard_not_last() {
        let run = vec![
            reduced_sample("STD-1", SampleType::Standard, 16.0, 0.01),
            reduced_sample("S-1", SampleType::Sample, 17.0, 0.02),
            reduced_sample("STD-2", SampleType::Standard, 18.0, 0.01),
            reduced_sample("S-2", SampleType::Sample, 17.0, 0.02),
            reduced_sample("STD-3", SampleType::Standard, 30.0, 0.01),
        ];

        let results = MassBiasCorrector::new(material(17.0)).correct(run).unwrap();

        // S-1 sees (16 + 18) / 2, S-2 sees (18 + 30) / 2
        assert!((calibrated(&results[0]) - 17.0).abs() < 1e-12);
        assert!((calibrated(&results[1]) - 17.0 / 24.0 * 17.0).abs() < 1e-12);
    }

    #[test]
    fn test_identity_calibration() {
        let run = vec![
            reduced_sample("STD-1", SampleType::Standard, 17.0, 0.01),
            reduced_sample("S-1", SampleType::Sample, 17.0, 0.02),
            reduced_sample("STD-2", SampleType::Standard, 17.0, 0.01),
        ];
        let results = MassBiasCorrector::new(material(17.0)).correct(run).unwrap();
        assert_eq!(calibrated(&results[0]), 17.0);
    }

    #[test]
    fn test_no_standards_fails() {
        let run = vec![reduced_sample("S-1", SampleType::Sample, 8.5, 0.02)];
        let err = MassBiasCorrector::new(material(17.052)).correct(run).unwrap_err();
        assert!(matches!(err, ProcessingError::NoStandards));
        assert_eq!(err.category(), ErrorCategory::DataAvailability);
    }

    #[test]
    fn test_sample_before_first_standard() {
        let run = vec![
            reduced_sample("S-1", SampleType::Sample, 8.5, 0.02),
            reduced_sample("STD-1", SampleType::Standard, 17.0, 0.01),
        ];
        let results = MassBiasCorrector::new(material(17.052)).correct(run).unwrap();
        assert!((calibrated(&results[0]) - 8.526).abs() < 1e-9);
        assert_eq!(results[0].warnings[0].kind, WarningKind::NoPrecedingStandard);
    }

    #[test]
    fn test_missing_reference_value_fails() {
        let run = vec![
            reduced_sample("STD-1", SampleType::Standard, 17.0, 0.01),
            reduced_sample("S-1", SampleType::Sample, 8.5, 0.02),
        ];
        let err = MassBiasCorrector::new(ReferenceMaterial::new("empty"))
            .correct(run)
            .unwrap_err();
        assert_eq!(err.to_string(), "An entry for '206Pb_204Pb' not found in 'empty'");
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_missing_reduced_data_fails() {
        let mut standard = reduced_sample("STD-1", SampleType::Standard, 17.0, 0.01);
        standard.reduced_data = None;
        let run = vec![standard, reduced_sample("S-1", SampleType::Sample, 8.5, 0.02)];

        let err = MassBiasCorrector::new(material(17.052)).correct(run).unwrap_err();
        assert!(matches!(err, ProcessingError::MissingReducedData(name) if name == "STD-1"));
    }

    #[test]
    fn test_only_standards_yields_empty() {
        let run = vec![
            reduced_sample("STD-1", SampleType::Standard, 17.0, 0.01),
            reduced_sample("STD-2", SampleType::Standard, 17.0, 0.01),
        ];
        let results = MassBiasCorrector::new(material(17.052)).correct(run).unwrap();
        assert!(results.is_empty());
    }
}
