use log::debug;

use crate::diagnostics::{CycleRejection, WarningKind};
use crate::model::{ModelError, Sample, TimeSeries};
use crate::settings::ProcessingSettings;

use super::stats;
use super::ProcessingError;

/// Absolute z-score above which a cycle counts as an outlier
pub const Z_SCORE_LIMIT: f64 = 3.0;

/// Hard intensity limit applied to a cycle window before outlier rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntensityLimit {
    /// No hard limit; z-score rejection only
    None,
    /// Reject cycles whose metric exceeds `max_blank_intensity` (blank contamination)
    Upper,
    /// Reject cycles whose metric is below `min_signal_intensity` (insufficient signal)
    Lower,
}

/// Per-sample blank correction with cycle rejection.
///
/// Splits the cycles into a blank and a signal window, cleans each window
/// independently and subtracts the mean cleaned blank from every signal cycle.
#[derive(Debug, Clone)]
pub struct InternalCorrector {
    settings: ProcessingSettings,
}

impl InternalCorrector {
    /// Create a corrector for one processing run
    pub fn new(settings: ProcessingSettings) -> Self {
        Self { settings }
    }

    /// Settings in use
    pub fn settings(&self) -> &ProcessingSettings {
        &self.settings
    }

    /// Blank-correct `sample`, replacing its time series with the cleaned,
    /// blank-subtracted signal window.
    ///
    /// If no blank cycles survive, the blank is treated as zero and a
    /// [`WarningKind::NoBlankData`] warning is recorded.
    pub fn correct(&self, mut sample: Sample) -> Result<Sample, ProcessingError> {
        let blank_window = self.settings.blank_window();
        let signal_window = self.settings.signal_cycles;

        let blank = sample.window(
            "blank",
            sample.timeseries.slice_cycles(blank_window.start, blank_window.end),
        );
        let signal = sample.window(
            "signal",
            sample.timeseries.slice_cycles(signal_window.start, signal_window.end),
        );

        let blank = self.remove_outliers(blank, IntensityLimit::Upper)?;
        let signal = self.remove_outliers(signal, IntensityLimit::Lower)?;

        sample.warnings.extend(blank.warnings);
        sample.warnings.extend(signal.warnings);
        sample.rejections.extend(blank.rejections);
        sample.rejections.extend(signal.rejections);

        let mut corrected = signal.timeseries;
        if blank.timeseries.is_empty() {
            sample.warn(WarningKind::NoBlankData);
        } else {
            corrected.subtract_column_offsets(&blank.timeseries.column_means());
        }

        debug!(
            "{}: {} blank cycles, {} signal cycles after rejection",
            sample.name,
            blank.timeseries.len(),
            corrected.len()
        );

        sample.timeseries = corrected;
        Ok(sample)
    }

    /// Reject invalid and outlying cycles from `sample`.
    ///
    /// Cycles outside the hard `limit` on the intensity metric go first; of
    /// the rest, a cycle is an outlier when any isotope column of the sample's
    /// system has |z| > [`Z_SCORE_LIMIT`]. Degenerate outcomes (every cycle
    /// rejected, too few cycles left) are recorded as warnings, never errors.
    pub fn remove_outliers(
        &self,
        mut sample: Sample,
        limit: IntensityLimit,
    ) -> Result<Sample, ProcessingError> {
        let original = sample.timeseries.len();
        if original == 0 {
            record_rejection(&mut sample, 0, 0, 0);
            sample.warn(WarningKind::EmptyWindow);
            return Ok(sample);
        }

        let metric = sample
            .timeseries
            .column(&self.settings.intensity_metric)
            .map_err(|_| ProcessingError::MissingMetricColumn {
                sample: sample.name.clone(),
                column: self.settings.intensity_metric.clone(),
            })?;

        let (within, exhausted) = match limit {
            IntensityLimit::None => (vec![true; original], None),
            IntensityLimit::Upper => {
                let threshold = self.settings.max_blank_intensity;
                (
                    metric.iter().map(|&m| !(m > threshold)).collect::<Vec<_>>(),
                    Some(WarningKind::AllCyclesAboveLimit { threshold }),
                )
            }
            IntensityLimit::Lower => {
                let threshold = self.settings.min_signal_intensity;
                (
                    metric.iter().map(|&m| !(m < threshold)).collect::<Vec<_>>(),
                    Some(WarningKind::AllCyclesBelowLimit { threshold }),
                )
            }
        };

        if !within.contains(&true) {
            if let Some(kind) = exhausted {
                sample.timeseries = sample.timeseries.without_rows();
                record_rejection(&mut sample, original, original, 0);
                sample.warn(kind);
                return Ok(sample);
            }
        }

        let limited = sample.timeseries.retain_rows(&within);
        let columns = sample.isotope_system.intensity_columns();
        let outliers = flag_outliers(&limited, &columns).map_err(|err| match err {
            ModelError::ColumnNotFound(column) => ModelError::MissingIsotopeColumn {
                sample: sample.name.clone(),
                column,
            },
            other => other,
        })?;

        let survivors = limited.len();
        let keep: Vec<bool> = outliers.iter().map(|&o| !o).collect();
        if !keep.contains(&true) {
            sample.timeseries = limited.without_rows();
            record_rejection(&mut sample, original, original - survivors, survivors);
            sample.warn(WarningKind::AllCyclesOutliers { cycles: survivors });
            return Ok(sample);
        }

        sample.timeseries = limited.retain_rows(&keep);

        let remaining = sample.timeseries.len();
        record_rejection(&mut sample, original, original - survivors, survivors - remaining);
        if (remaining as f64) < self.settings.low_cycles_warning_frac * original as f64 {
            sample.warn(WarningKind::LowCycleCount {
                remaining,
                original,
            });
        }

        Ok(sample)
    }
}

fn record_rejection(sample: &mut Sample, original: usize, outside_limits: usize, outliers: usize) {
    let rejection = CycleRejection {
        sample: sample.name.clone(),
        original,
        outside_limits,
        outliers,
    };
    debug!("{}", rejection);
    sample.rejections.push(rejection);
}

/// Flag every row where any of `columns` has an absolute z-score above the limit
fn flag_outliers(table: &TimeSeries, columns: &[String]) -> Result<Vec<bool>, ModelError> {
    let mut flagged = vec![false; table.len()];
    for column in columns {
        let z = stats::z_scores(table.column(column)?);
        for (flag, score) in flagged.iter_mut().zip(z) {
            if score.abs() > Z_SCORE_LIMIT {
                *flag = true;
            }
        }
    }
    Ok(flagged)
}
