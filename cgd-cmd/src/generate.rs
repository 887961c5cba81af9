//! Synthetic dataset generation.

use cgd_core::country::Country;
use cgd_core::sample;
use log::info;
use std::fs;
use std::path::Path;

/// Generate the synthetic demo dataset and write both fixture CSVs.
pub fn run_generate(output: &str, seed: u64) -> anyhow::Result<()> {
    let dir = Path::new(output);
    fs::create_dir_all(dir)?;

    let countries = Country::demo_set();
    let observations = sample::generate_for(&countries, seed);

    fs::write(dir.join("countries.csv"), Country::to_csv(&countries))?;
    fs::write(dir.join("observations.csv"), sample::to_csv(&observations))?;

    info!(
        "Generate complete. {} countries and {} observations written to {}",
        countries.len(),
        observations.len(),
        output
    );
    Ok(())
}
