//! Observation file filtering.

use cgd_core::date_range::DateRange;
use cgd_core::observation::CovidObservation;
use chrono::NaiveDate;
use log::info;
use std::fs;

/// Split a comma-separated ISO code list, trimming and upper-casing.
pub fn parse_country_list(arg: &str) -> Vec<String> {
    arg.split(',')
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Keep only observations for the given countries inside the range.
pub fn filter_observations(
    observations: Vec<CovidObservation>,
    iso_codes: &[String],
    range: DateRange,
) -> Vec<CovidObservation> {
    observations
        .into_iter()
        .filter(|o| iso_codes.contains(&o.iso_code) && range.contains(o.date))
        .collect()
}

/// Filter an observations CSV on disk and write the subset.
pub fn run_export(
    observations_path: &str,
    countries_arg: &str,
    start: &str,
    end: &str,
    output: &str,
) -> anyhow::Result<()> {
    let iso_codes = parse_country_list(countries_arg);
    if iso_codes.is_empty() {
        anyhow::bail!("no countries given; pass --countries ISO,ISO,...");
    }
    let start_date = NaiveDate::parse_from_str(start, "%Y-%m-%d")?;
    let end_date = NaiveDate::parse_from_str(end, "%Y-%m-%d")?;
    if end_date < start_date {
        anyhow::bail!("end date {} is before start date {}", end, start);
    }

    let raw = fs::read_to_string(observations_path)?;
    let observations = CovidObservation::parse_csv(&raw);
    let filtered = filter_observations(observations, &iso_codes, DateRange(start_date, end_date));

    fs::write(output, cgd_core::sample::to_csv(&filtered))?;
    info!(
        "Export complete. {} observations for {} countries written to {}",
        filtered.len(),
        iso_codes.len(),
        output
    );
    Ok(())
}
