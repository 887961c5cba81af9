//! Deterministic synthetic dataset generator.
//!
//! Produces a demo dataset shaped like the upstream open data: one row
//! per (country, date) across 2020-2023, with epidemic waves built from
//! superimposed sine terms and per-country parameters drawn from a
//! seeded ChaCha RNG. The same seed always yields the same dataset.

use crate::country::Country;
use crate::date_range::DateRange;
use crate::observation::CovidObservation;
use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Default seed for the demo dataset.
pub const DEFAULT_SEED: u64 = 42;

/// First day of the generated dataset.
pub fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

/// Last day of the generated dataset.
pub fn end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
}

/// Vaccination reporting begins on this date; earlier rows carry None.
pub fn vaccination_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
}

/// Generate the full synthetic dataset for the demo country set.
///
/// Invariants:
/// - `total_cases` and `total_deaths` are non-decreasing per country
/// - `new_cases` equals the day-over-day delta of `total_cases`
/// - vaccination fields are `None` before [`vaccination_start`]
pub fn generate(seed: u64) -> Vec<CovidObservation> {
    generate_for(&Country::demo_set(), seed)
}

/// Generate synthetic observations for an explicit country set.
pub fn generate_for(countries: &[Country], seed: u64) -> Vec<CovidObservation> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut observations = Vec::new();

    for country in countries {
        let population = country.population as f64;
        // Per-country epidemic parameters
        let daily_rate: f64 = rng.random_range(50.0..500.0);
        let death_ratio: f64 = rng.random_range(0.01..0.03);
        let hosp_ratio: f64 = rng.random_range(0.05..0.15);
        let icu_ratio: f64 = rng.random_range(0.1..0.3);

        let mut prev_total_cases: u64 = 0;
        let mut total_deaths: u64 = 0;

        for (day, date) in DateRange(start_date(), end_date()).enumerate() {
            let d = day as f64;
            let base = (d * daily_rate).min(population * 0.3);
            let waves = (d / 100.0).sin() * base * 0.3
                + (d / 200.0).sin() * base * 0.2
                + (d / 300.0).sin() * base * 0.1;
            let raw_total = (base + waves).max(0.0) as u64;

            // Cumulative counts never decrease; dips in the wave shape
            // show up as zero-new-case days instead.
            let total_cases = raw_total.max(prev_total_cases);
            let new_cases = (total_cases - prev_total_cases) as u32;
            prev_total_cases = total_cases;

            let new_deaths = (new_cases as f64 * death_ratio) as u32;
            total_deaths += new_deaths as u64;

            let hosp_patients = (new_cases as f64 * hosp_ratio) as u32;
            let icu_patients = (hosp_patients as f64 * icu_ratio) as u32;

            let (total_vaccinations, people_fully_vaccinated) = if date >= vaccination_start() {
                let days_since = (date - vaccination_start()).num_days() as f64;
                let coverage = (days_since / 365.0 * 1.8).min(2.0);
                let total_vacc = ((population * coverage) as u64).min(country.population * 2);
                let fully = total_vacc.saturating_sub(country.population);
                (Some(total_vacc), Some(fully))
            } else {
                (None, None)
            };

            observations.push(CovidObservation {
                iso_code: country.iso_code.clone(),
                date,
                new_cases,
                new_deaths,
                total_cases,
                total_deaths,
                hosp_patients: Some(hosp_patients),
                icu_patients: Some(icu_patients),
                total_vaccinations,
                people_fully_vaccinated,
            });
        }
    }

    log::info!(
        "sample: generated {} observations for {} countries (seed {})",
        observations.len(),
        countries.len(),
        seed
    );
    observations
}

/// Serialize observations to the headerless observation CSV format.
pub fn to_csv(observations: &[CovidObservation]) -> String {
    let mut out = String::new();
    for obs in observations {
        out.push_str(&obs.csv_record().join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_set() -> Vec<Country> {
        Country::demo_set().into_iter().take(2).collect()
    }

    #[test]
    fn generator_is_deterministic() {
        let a = generate_for(&small_set(), DEFAULT_SEED);
        let b = generate_for(&small_set(), DEFAULT_SEED);
        assert_eq!(a.len(), b.len());
        assert_eq!(a[500].total_cases, b[500].total_cases);
        assert_eq!(a[500].new_deaths, b[500].new_deaths);
    }

    #[test]
    fn different_seeds_differ() {
        let a = generate_for(&small_set(), 1);
        let b = generate_for(&small_set(), 2);
        assert!(a
            .iter()
            .zip(b.iter())
            .any(|(x, y)| x.total_cases != y.total_cases));
    }

    #[test]
    fn totals_are_monotonic() {
        let observations = generate_for(&small_set(), DEFAULT_SEED);
        let grouped = CovidObservation::by_country(observations);
        for series in grouped.values() {
            for pair in series.windows(2) {
                assert!(pair[1].total_cases >= pair[0].total_cases);
                assert!(pair[1].total_deaths >= pair[0].total_deaths);
            }
        }
    }

    #[test]
    fn new_cases_match_total_deltas() {
        let observations = generate_for(&small_set(), DEFAULT_SEED);
        let grouped = CovidObservation::by_country(observations);
        for series in grouped.values() {
            for pair in series.windows(2) {
                assert_eq!(
                    pair[1].new_cases as u64,
                    pair[1].total_cases - pair[0].total_cases
                );
            }
        }
    }

    #[test]
    fn vaccinations_start_in_2021() {
        let observations = generate_for(&small_set(), DEFAULT_SEED);
        for obs in &observations {
            if obs.date < vaccination_start() {
                assert!(obs.total_vaccinations.is_none());
            } else {
                assert!(obs.total_vaccinations.is_some());
            }
        }
    }

    #[test]
    fn csv_output_parses_back() {
        let observations = generate_for(&small_set(), DEFAULT_SEED);
        let csv = to_csv(&observations[..100]);
        let parsed = CovidObservation::parse_csv(&csv);
        assert_eq!(parsed.len(), 100);
        assert_eq!(parsed[0], observations[0]);
    }
}
