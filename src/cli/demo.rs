use anyhow::{bail, Context, Result};
use log::info;
use std::path::PathBuf;
use std::sync::Arc;

use icpms_reduce::processing::DataProcessor;
use icpms_reduce::synthetic::{self, SessionConfig};

use super::Config;

/// Reduce a synthetic session and print the report
pub fn run(config: Option<PathBuf>, run_length: Option<usize>, json: bool) -> Result<()> {
    info!("icpms-reduce - Synthetic Session Demo");
    info!("=====================================");

    let config = Config::load(config.as_deref())?;
    let settings = config.settings()?.clone();
    let reference = config.reference.resolve()?;
    let system = config.isotope_system.resolve()?;

    let session_config = SessionConfig {
        run_length: run_length
            .or(config.demo.run_length)
            .unwrap_or(SessionConfig::default().run_length),
    };
    if session_config.run_length == 0 {
        bail!("run_length must be at least 1");
    }

    info!(
        "Generating {} samples under the {} system",
        session_config.run_length, system.name
    );
    let session = synthetic::generate_session_for(&session_config, Arc::new(system))
        .context("Failed to generate synthetic session")?;

    info!("Calibrating against {}", reference.name);
    let processor = DataProcessor::new(settings, reference)?;
    let report = processor.process(&session).map_err(|e| {
        let category = e.category();
        anyhow::Error::new(e).context(format!("Processing aborted ({:?} error)", category))
    })?;

    println!("{}", report.format_colored());

    if json {
        let history = report
            .history
            .to_json()
            .context("Failed to serialize processing history")?;
        println!("{}", history);
    }

    Ok(())
}
