//! Non-fatal data-quality warnings.
//!
//! Degenerate data never aborts a run. Each condition is logged at `warn`
//! level and recorded on the sample it concerns, so operators can review
//! per-sample data quality next to the results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Degenerate-data condition raised by a processing stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum WarningKind {
    /// The configured cycle window contains no cycles
    EmptyWindow,
    /// Every cycle exceeded the upper intensity limit
    AllCyclesAboveLimit {
        /// Configured upper limit
        threshold: f64,
    },
    /// Every cycle fell short of the lower intensity limit
    AllCyclesBelowLimit {
        /// Configured lower limit
        threshold: f64,
    },
    /// Outlier rejection would have removed every remaining cycle
    AllCyclesOutliers {
        /// Cycles that survived the intensity limits
        cycles: usize,
    },
    /// Fewer cycles than the warning fraction survived rejection
    LowCycleCount {
        /// Cycles kept
        remaining: usize,
        /// Cycles in the window before rejection
        original: usize,
    },
    /// No blank cycles survived; the signal was not blank-corrected
    NoBlankData,
    /// No signal cycles were left to compute ratios from
    NoCyclesToReduce,
    /// No standard follows this measurement; only the preceding one was used
    NoFollowingStandard,
    /// No standard precedes this measurement; only the following one was used
    NoPrecedingStandard,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::EmptyWindow => write!(f, "no cycles in the configured window"),
            WarningKind::AllCyclesAboveLimit { threshold } => {
                write!(f, "all cycles are above the intensity threshold ({})", threshold)
            }
            WarningKind::AllCyclesBelowLimit { threshold } => {
                write!(f, "all cycles are below the intensity threshold ({})", threshold)
            }
            WarningKind::AllCyclesOutliers { cycles } => {
                write!(f, "removing outliers left zero of {} cycles", cycles)
            }
            WarningKind::LowCycleCount { remaining, original } => {
                write!(f, "removing outliers left only {} of {} cycles", remaining, original)
            }
            WarningKind::NoBlankData => {
                write!(f, "no blank cycles survived; blank treated as zero")
            }
            WarningKind::NoCyclesToReduce => write!(f, "no cycles left to compute ratios from"),
            WarningKind::NoFollowingStandard => write!(
                f,
                "present after the last standard: using only the preceding standard"
            ),
            WarningKind::NoPrecedingStandard => write!(
                f,
                "present before the first standard: using only the following standard"
            ),
        }
    }
}

/// A warning attached to a named sample (or a cycle window of one)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessingWarning {
    /// Sample name, suffixed with the window for blank/signal warnings
    pub sample: String,
    /// What happened
    pub kind: WarningKind,
}

impl ProcessingWarning {
    /// Create a warning for `sample`
    pub fn new(sample: impl Into<String>, kind: WarningKind) -> Self {
        Self {
            sample: sample.into(),
            kind,
        }
    }
}

impl fmt::Display for ProcessingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.sample, self.kind)
    }
}

/// Cycle bookkeeping of one rejection pass over a blank or signal window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleRejection {
    /// Window name, e.g. "my_smpl_001 (blank)"
    pub sample: String,
    /// Cycles in the window before rejection
    pub original: usize,
    /// Cycles dropped by the hard intensity limit
    pub outside_limits: usize,
    /// Cycles dropped as z-score outliers
    pub outliers: usize,
}

impl CycleRejection {
    /// Cycles left after both passes
    pub fn kept(&self) -> usize {
        self.original - self.outside_limits - self.outliers
    }

    /// Cycles dropped by either pass
    pub fn dropped(&self) -> usize {
        self.outside_limits + self.outliers
    }
}

impl fmt::Display for CycleRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: kept {} of {} cycles ({} outside limits, {} outliers)",
            self.sample,
            self.kept(),
            self.original,
            self.outside_limits,
            self.outliers
        )
    }
}
