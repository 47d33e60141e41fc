use log::{debug, info};

use crate::diagnostics::{CycleRejection, ProcessingWarning};
use crate::model::{ReferenceMaterial, Sample};
use crate::settings::ProcessingSettings;

use super::{
    InternalCorrector, MassBiasCorrector, ProcessingError, ProcessingHistory, ProcessingReport,
    ProcessingStep, RatioCalculator, ResultTable,
};

/// Main processing orchestrator.
///
/// Runs internal correction, optional peak stripping and ratio reduction on
/// every sample, then calibrates the whole batch by standard bracketing.
///
/// ```
/// use icpms_reduce::prelude::*;
///
/// let processor = DataProcessor::new(ProcessingSettings::default(), presets::nist610())?;
/// let session = synthetic::generate_session(&SessionConfig::default())?;
/// let report = processor.process(&session)?;
/// assert!(!report.table.is_empty());
/// # Ok::<(), ProcessingError>(())
/// ```
#[derive(Debug, Clone)]
pub struct DataProcessor {
    internal_corrector: InternalCorrector,
    ratio_calculator: RatioCalculator,
    mass_bias_corrector: MassBiasCorrector,
}

impl DataProcessor {
    /// Create a processor for one run. Fails on invalid settings.
    pub fn new(
        settings: ProcessingSettings,
        reference_material: ReferenceMaterial,
    ) -> Result<Self, ProcessingError> {
        settings.validate()?;
        Ok(Self {
            internal_corrector: InternalCorrector::new(settings),
            ratio_calculator: RatioCalculator::new(),
            mass_bias_corrector: MassBiasCorrector::new(reference_material),
        })
    }

    /// Settings in use
    pub fn settings(&self) -> &ProcessingSettings {
        self.internal_corrector.settings()
    }

    /// Reference material in use
    pub fn reference_material(&self) -> &ReferenceMaterial {
        self.mass_bias_corrector.reference_material()
    }

    /// Process a batch given in run order.
    ///
    /// Works on a private copy; `samples` is left untouched. Any fatal error
    /// aborts the whole batch.
    pub fn process(&self, samples: &[Sample]) -> Result<ProcessingReport, ProcessingError> {
        info!("Processing {} samples", samples.len());

        let mut reduced = self.reduce_all(samples.to_vec())?;
        let stripped = reduced
            .iter()
            .filter(|s| s.isotope_system.peak_strip.is_some())
            .count();

        // Standards are consumed by the calibration; hold their diagnostics
        // at their run positions
        let standard_diagnostics: Vec<Option<Diagnostics>> = reduced
            .iter_mut()
            .map(|s| s.is_standard().then(|| Diagnostics::take(s)))
            .collect();

        let corrected = self.mass_bias_corrector.correct(reduced)?;
        let (warnings, rejections) = in_run_order(standard_diagnostics, &corrected);

        let table = ResultTable::from_samples(&corrected)?;
        let history = self.history(samples.len(), stripped, table.len());

        info!(
            "Calibrated {} samples with {} warnings",
            table.len(),
            warnings.len()
        );
        Ok(ProcessingReport {
            table,
            warnings,
            rejections,
            history,
        })
    }

    /// Per-sample stages: internal correction, peak stripping when the
    /// isotope system defines it, ratio reduction.
    pub fn prepare(&self, sample: Sample) -> Result<Sample, ProcessingError> {
        sample.isotope_system.validate()?;
        sample.check_columns()?;
        debug!("Preparing '{}' ({})", sample.name, sample.sample_type);

        let sample = self.internal_corrector.correct(sample)?;
        let sample = if sample.isotope_system.peak_strip.is_some() {
            self.ratio_calculator.strip_peaks(sample)?
        } else {
            sample
        };
        self.ratio_calculator.reduce(sample)
    }

    #[cfg(not(feature = "parallel"))]
    fn reduce_all(&self, samples: Vec<Sample>) -> Result<Vec<Sample>, ProcessingError> {
        samples.into_iter().map(|s| self.prepare(s)).collect()
    }

    #[cfg(feature = "parallel")]
    fn reduce_all(&self, samples: Vec<Sample>) -> Result<Vec<Sample>, ProcessingError> {
        use rayon::prelude::*;

        samples.into_par_iter().map(|s| self.prepare(s)).collect()
    }

    fn history(&self, batch: usize, stripped: usize, calibrated: usize) -> ProcessingHistory {
        let settings = self.settings();
        let mut history = ProcessingHistory::new();

        history.add_step(
            ProcessingStep::new("internal correction")
                .with_parameter("samples", batch)
                .with_parameter("intensity_metric", &settings.intensity_metric)
                .with_parameter("blank_cycles", format!("1..={}", settings.blank_cycles))
                .with_parameter(
                    "signal_cycles",
                    format!("{}..={}", settings.signal_cycles.start, settings.signal_cycles.end),
                )
                .with_parameter("max_blank_intensity", settings.max_blank_intensity)
                .with_parameter("min_signal_intensity", settings.min_signal_intensity)
                .with_parameter("low_cycles_warning_frac", settings.low_cycles_warning_frac)
                .with_parameter("z_score_limit", super::Z_SCORE_LIMIT),
        );
        if stripped > 0 {
            history.add_step(ProcessingStep::new("peak stripping").with_parameter("samples", stripped));
        }
        history.add_step(ProcessingStep::new("ratio reduction").with_parameter("samples", batch));
        history.add_step(
            ProcessingStep::new("mass bias correction")
                .with_parameter("reference_material", &self.reference_material().name)
                .with_parameter("samples", calibrated),
        );
        history
    }
}

/// Warnings and rejection counts lifted off a sample
struct Diagnostics {
    warnings: Vec<ProcessingWarning>,
    rejections: Vec<CycleRejection>,
}

impl Diagnostics {
    fn take(sample: &mut Sample) -> Self {
        Self {
            warnings: std::mem::take(&mut sample.warnings),
            rejections: std::mem::take(&mut sample.rejections),
        }
    }
}

/// Merge standards' diagnostics (held per run position) with those of the
/// calibrated samples, which come back from mass-bias correction in run order.
fn in_run_order(
    standards: Vec<Option<Diagnostics>>,
    calibrated: &[Sample],
) -> (Vec<ProcessingWarning>, Vec<CycleRejection>) {
    let mut calibrated = calibrated.iter();
    let mut warnings = Vec::new();
    let mut rejections = Vec::new();
    for slot in standards {
        match slot {
            Some(standard) => {
                warnings.extend(standard.warnings);
                rejections.extend(standard.rejections);
            }
            None => {
                if let Some(sample) = calibrated.next() {
                    warnings.extend(sample.warnings.iter().cloned());
                    rejections.extend(sample.rejections.iter().cloned());
                }
            }
        }
    }
    (warnings, rejections)
}
