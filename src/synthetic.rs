//! Deterministic synthetic analytical sessions.
//!
//! Produces a run that looks like a multicollector export: 60 cycles per
//! sample with a near-zero gas blank over the first 29 cycles, followed by
//! ablation signal. Standards (NIST SRM 610) and controls (NIST SRM 612)
//! share one composition; unknowns carry extra radiogenic Pb from cycle 31 on.
//!
//! Noise is sinusoidal and fully reproducible, so two sessions generated with
//! the same [`SessionConfig`] are identical.

use std::sync::Arc;

use log::debug;

use crate::model::{IsotopeSystem, ModelError, Sample, SampleType, TimeSeries};
use crate::presets;

/// Cycles in a generated sample
pub const CYCLES_PER_SAMPLE: usize = 60;

/// Last cycle (1-based) of the gas blank
pub const BLANK_END_CYCLE: usize = 29;

/// Cycles before the radiogenic excess of unknowns starts
const EXCESS_START_INDEX: usize = 30;

const BLANK_SCALE: f64 = 1e-6;

/// Base level, per-sample offset amplitude and per-cycle noise amplitude of a channel
struct Channel {
    label: &'static str,
    level: f64,
    offset: f64,
    noise: f64,
    excess: f64,
    phase: f64,
}

const CHANNELS: [Channel; 5] = [
    Channel { label: "202Hg", level: 7e-3, offset: 1e-3, noise: 1e-2, excess: 0.0, phase: 0.3 },
    Channel { label: "204Pb", level: 1.4, offset: 0.005, noise: 0.005, excess: 0.0, phase: 1.1 },
    Channel { label: "206Pb", level: 24.0, offset: 0.08, noise: 0.02, excess: 2.7, phase: 2.9 },
    Channel { label: "207Pb", level: 22.0, offset: 0.00002, noise: 0.02, excess: 0.1, phase: 4.7 },
    Channel { label: "208Pb", level: 52.0, offset: 2.0, noise: 0.1, excess: 4.0, phase: 0.7 },
];

/// Shape of a synthetic session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Number of samples in the run, standards included
    pub run_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { run_length: 50 }
    }
}

/// Role of the sample at 1-based `position` in a run of `run_length`.
///
/// Standards open and close the run and recur every ten positions; a
/// control replaces every twentieth unknown.
pub fn sample_type_at(position: usize, run_length: usize) -> SampleType {
    if position <= 2 || position + 2 > run_length || (position + 3) % 10 == 0 {
        SampleType::Standard
    } else if (position + 4) % 20 == 0 {
        SampleType::Control
    } else {
        SampleType::Sample
    }
}

/// Generate a session reduced under the built-in Pb-Pb system
pub fn generate_session(config: &SessionConfig) -> Result<Vec<Sample>, ModelError> {
    generate_session_for(config, Arc::new(presets::pb_pb()))
}

/// Generate a session whose samples share `isotope_system`
pub fn generate_session_for(
    config: &SessionConfig,
    isotope_system: Arc<IsotopeSystem>,
) -> Result<Vec<Sample>, ModelError> {
    let mut counters = [0usize; 3];
    let samples = (1..=config.run_length)
        .map(|position| -> Result<Sample, ModelError> {
            let sample_type = sample_type_at(position, config.run_length);
            let (slot, prefix) = match sample_type {
                SampleType::Standard => (0, "NIST610"),
                SampleType::Control => (1, "NIST612"),
                SampleType::Sample => (2, "my_smpl"),
            };
            counters[slot] += 1;
            let name = format!("{}_{:03}", prefix, counters[slot]);
            let timeseries = measurement(position, !matches!(sample_type, SampleType::Sample))?;
            Ok(Sample::new(
                name,
                sample_type,
                Arc::clone(&isotope_system),
                timeseries,
            ))
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        "Generated {} samples ({} standards)",
        samples.len(),
        counters[0]
    );
    Ok(samples)
}

/// Cycle intensities of the sample at `position`.
///
/// `reference_composition` selects the standard composition; otherwise the
/// radiogenic excess of an unknown is added to the ablation signal.
pub fn measurement(position: usize, reference_composition: bool) -> Result<TimeSeries, ModelError> {
    let seed = position as f64;
    let mut timeseries = TimeSeries::new((1..=CYCLES_PER_SAMPLE as u32).collect())?;

    for channel in &CHANNELS {
        let offset = (seed * 0.37 + channel.phase).sin() * 0.5 * channel.offset;
        let values = (0..CYCLES_PER_SAMPLE)
            .map(|i| {
                let noise = (i as f64 * 1.9 + seed * 0.61 + channel.phase).sin() * 0.5 * channel.noise;
                let mut value = channel.level + offset + noise;
                if i < BLANK_END_CYCLE {
                    value *= BLANK_SCALE;
                }
                if !reference_composition && i >= EXCESS_START_INDEX {
                    value += channel.excess;
                }
                value
            })
            .collect();
        timeseries.push_column(channel.label, values)?;
    }
    Ok(timeseries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_types_follow_run_layout() {
        let session = generate_session(&SessionConfig::default()).unwrap();
        assert_eq!(session.len(), 50);

        let count = |t: SampleType| session.iter().filter(|s| s.sample_type == t).count();
        assert_eq!(count(SampleType::Standard), 9);
        assert_eq!(count(SampleType::Control), 2);
        assert_eq!(count(SampleType::Sample), 39);

        assert_eq!(session[0].name, "NIST610_001");
        assert_eq!(session[2].name, "my_smpl_001");
        assert_eq!(session[15].name, "NIST612_001");
        assert_eq!(session[49].name, "NIST610_009");
    }

    #[test]
    fn test_blank_is_tiny_and_signal_is_not() {
        let ts = measurement(3, true).unwrap();
        let pb208 = ts.column("208Pb").unwrap();
        assert_eq!(ts.len(), CYCLES_PER_SAMPLE);
        assert!(pb208[..BLANK_END_CYCLE].iter().all(|v| *v < 1e-3));
        assert!(pb208[BLANK_END_CYCLE..].iter().all(|v| *v > 40.0));
    }

    #[test]
    fn test_unknowns_carry_excess_lead() {
        let reference = measurement(5, true).unwrap();
        let unknown = measurement(5, false).unwrap();
        let diff = unknown.column("206Pb").unwrap()[40] - reference.column("206Pb").unwrap()[40];
        assert!((diff - 2.7).abs() < 1e-12);
        assert_eq!(
            unknown.column("206Pb").unwrap()[..EXCESS_START_INDEX],
            reference.column("206Pb").unwrap()[..EXCESS_START_INDEX]
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate_session(&SessionConfig { run_length: 12 }).unwrap();
        let b = generate_session(&SessionConfig { run_length: 12 }).unwrap();
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.timeseries, y.timeseries);
        }
    }

    #[test]
    fn test_every_sample_has_pb_pb_columns() {
        for sample in generate_session(&SessionConfig { run_length: 8 }).unwrap() {
            sample.check_columns().unwrap();
        }
    }
}
