use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

use crate::diagnostics::{CycleRejection, ProcessingWarning};

use super::{ProcessingHistory, ResultTable};

/// Outcome of processing one batch: calibrated results plus the warnings
/// operators should review.
#[derive(Debug, Clone)]
pub struct ProcessingReport {
    /// Calibrated results, one row per non-standard sample
    pub table: ResultTable,
    /// Non-fatal data-quality warnings, in run order
    pub warnings: Vec<ProcessingWarning>,
    /// Rejected-cycle counts of every blank and signal window, in run order
    pub rejections: Vec<CycleRejection>,
    /// Stages applied and their parameters
    pub history: ProcessingHistory,
}

impl ProcessingReport {
    /// Check if any warnings were raised
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Count the number of warnings
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Warnings raised for a sample, including its blank and signal windows
    pub fn warnings_for<'a>(&'a self, sample: &'a str) -> impl Iterator<Item = &'a ProcessingWarning> + 'a {
        self.warnings
            .iter()
            .filter(move |w| is_window_of(&w.sample, sample))
    }

    /// Rejected-cycle counts of a sample's blank and signal windows
    pub fn rejections_for<'a>(&'a self, sample: &'a str) -> impl Iterator<Item = &'a CycleRejection> + 'a {
        self.rejections
            .iter()
            .filter(move |r| is_window_of(&r.sample, sample))
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            use console::Emoji;

            static WARN: Emoji<'_, '_> = Emoji("⚠", "[WARN]");

            let mut output = String::new();

            output.push_str(&format!("{}\n", style("Calibrated Results").bold().cyan()));
            output.push_str(&format!("{}\n", style("==================").cyan()));
            output.push_str(&self.table.to_string());
            output.push('\n');

            for warning in &self.warnings {
                output.push_str(&format!(
                    "[{}] {}: {}\n",
                    WARN,
                    style(&warning.sample).yellow(),
                    warning.kind
                ));
            }

            output.push_str(&format!(
                "{}: {} samples, {} warnings\n",
                style("Summary").bold(),
                style(self.table.len()).green(),
                style(self.warning_count()).yellow()
            ));
            output
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            format!("{}", self)
        }
    }
}

/// `name` is `sample` itself or one of its "sample (window)" sub-samples
fn is_window_of(name: &str, sample: &str) -> bool {
    name == sample
        || name
            .strip_prefix(sample)
            .is_some_and(|rest| rest.starts_with(" ("))
}

impl fmt::Display for ProcessingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Calibrated Results")?;
        writeln!(f, "==================")?;
        write!(f, "{}", self.table)?;
        writeln!(f)?;

        for warning in &self.warnings {
            writeln!(f, "[⚠] {}", warning)?;
        }

        writeln!(
            f,
            "Summary: {} samples, {} warnings",
            self.table.len(),
            self.warning_count()
        )
    }
}
