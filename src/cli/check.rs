use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

use super::Config;

/// Validate a config file and print what it resolves to
pub fn run(path: PathBuf) -> Result<()> {
    info!("Checking {}", path.display());

    let config = Config::from_file(&path)?;
    let settings = config.settings()?;
    let reference = config.reference.resolve()?;
    let system = config.isotope_system.resolve()?;

    println!("Configuration: {}", path.display());
    println!();
    println!("[processing]");
    print!(
        "{}",
        toml::to_string(settings).context("Failed to render processing settings")?
    );
    println!();

    println!("Isotope system: {}", system.name);
    for ratio in &system.ratios {
        println!("  {}", ratio);
    }
    if let Some(strip) = &system.peak_strip {
        println!(
            "  strip {} using {} = {}",
            strip.target_isotope, strip.known_isotope_ratio, strip.known_isotope_ratio_value
        );
    }
    println!();

    println!("Reference material: {}", reference.name);
    for (key, value) in &reference.values {
        println!("  {:<12} {:>10.5}  ({})", key, value.value, value.source);
    }

    // Every ratio the system reduces must have an accepted value
    for ratio in system.ratio_names() {
        reference
            .get_value(&ratio)
            .with_context(|| format!("Reference material cannot calibrate {}", ratio))?;
    }

    println!();
    println!("OK");
    Ok(())
}
