//! Upstream dataset download and projection.
//!
//! Fetches the Our World in Data compiled COVID-19 CSV and projects it
//! onto the toolkit's column set, writing the same two fixture files
//! the synthetic generator produces.

use cgd_core::country::Country;
use cgd_core::observation::CovidObservation;
use chrono::NaiveDate;
use log::info;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Compiled per-country daily CSV published by Our World in Data.
const UPSTREAM_URL: &str = "https://covid.ourworldindata.org/data/owid-covid-data.csv";

/// Result of projecting the upstream CSV onto the toolkit's columns.
pub struct Projection {
    pub countries: Vec<Country>,
    pub observations: Vec<CovidObservation>,
}

/// Download the upstream dataset and write `countries.csv` and
/// `observations.csv` into the output directory.
pub async fn run_fetch(output: &str, countries_filter: Option<&str>) -> anyhow::Result<()> {
    let keep = countries_filter.map(crate::export::parse_country_list);

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(300))
        .build()?;

    info!("Fetching upstream dataset from {}", UPSTREAM_URL);
    let response = client.get(UPSTREAM_URL).send().await?;
    if !response.status().is_success() {
        anyhow::bail!("upstream returned {}", response.status());
    }
    let body = response.text().await?;

    let projection = project_upstream_csv(&body, keep.as_deref())?;
    if projection.observations.is_empty() {
        anyhow::bail!("upstream dataset yielded no usable observations");
    }

    let dir = Path::new(output);
    fs::create_dir_all(dir)?;
    fs::write(
        dir.join("countries.csv"),
        Country::to_csv(&projection.countries),
    )?;
    fs::write(
        dir.join("observations.csv"),
        cgd_core::sample::to_csv(&projection.observations),
    )?;

    info!(
        "Fetch complete. {} countries and {} observations written to {}",
        projection.countries.len(),
        projection.observations.len(),
        output
    );
    Ok(())
}

/// Project the headered upstream CSV onto the toolkit's column set.
///
/// Aggregate rows (ISO codes starting with `OWID_`) are dropped, as are
/// rows with a malformed date. Blank daily counts are treated as zero;
/// blank hospital and vaccination fields stay missing. When `keep` is
/// given, only those ISO codes survive.
pub fn project_upstream_csv(body: &str, keep: Option<&[String]>) -> anyhow::Result<Projection> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(body.as_bytes());

    let headers = rdr.headers()?.clone();
    let col = |name: &str| headers.iter().position(|h| h == name);
    let required = |name: &str| {
        col(name).ok_or_else(|| anyhow::anyhow!("upstream CSV missing column '{}'", name))
    };

    let idx_iso = required("iso_code")?;
    let idx_continent = required("continent")?;
    let idx_location = required("location")?;
    let idx_date = required("date")?;
    let idx_population = required("population")?;
    let idx_new_cases = required("new_cases")?;
    let idx_new_deaths = required("new_deaths")?;
    let idx_total_cases = required("total_cases")?;
    let idx_total_deaths = required("total_deaths")?;
    let idx_hosp = col("hosp_patients");
    let idx_icu = col("icu_patients");
    let idx_total_vacc = col("total_vaccinations");
    let idx_fully_vacc = col("people_fully_vaccinated");

    // Upstream counts are serialized as floats ("150000.0")
    let float_field = |record: &csv::StringRecord, idx: usize| -> Option<f64> {
        record.get(idx).and_then(|s| s.trim().parse::<f64>().ok())
    };
    let opt_float_field = |record: &csv::StringRecord, idx: Option<usize>| -> Option<f64> {
        idx.and_then(|i| float_field(record, i))
    };

    let mut country_meta: HashMap<String, Country> = HashMap::new();
    let mut observations = Vec::new();
    let mut skipped = 0u32;

    for record in rdr.records().flatten() {
        let iso_code = record.get(idx_iso).unwrap_or("").trim().to_string();
        if iso_code.is_empty() || iso_code.starts_with("OWID_") {
            skipped += 1;
            continue;
        }
        if let Some(keep) = keep {
            if !keep.contains(&iso_code) {
                continue;
            }
        }

        let Some(date) = record
            .get(idx_date)
            .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        else {
            skipped += 1;
            continue;
        };

        if let Some(population) = float_field(&record, idx_population) {
            country_meta.entry(iso_code.clone()).or_insert(Country {
                iso_code: iso_code.clone(),
                name: record.get(idx_location).unwrap_or("").trim().to_string(),
                continent: record.get(idx_continent).unwrap_or("").trim().to_string(),
                population: population.max(0.0) as u64,
            });
        }

        observations.push(CovidObservation {
            iso_code,
            date,
            new_cases: float_field(&record, idx_new_cases).unwrap_or(0.0).max(0.0) as u32,
            new_deaths: float_field(&record, idx_new_deaths).unwrap_or(0.0).max(0.0) as u32,
            total_cases: float_field(&record, idx_total_cases).unwrap_or(0.0).max(0.0) as u64,
            total_deaths: float_field(&record, idx_total_deaths).unwrap_or(0.0).max(0.0) as u64,
            hosp_patients: opt_float_field(&record, idx_hosp).map(|v| v.max(0.0) as u32),
            icu_patients: opt_float_field(&record, idx_icu).map(|v| v.max(0.0) as u32),
            total_vaccinations: opt_float_field(&record, idx_total_vacc).map(|v| v.max(0.0) as u64),
            people_fully_vaccinated: opt_float_field(&record, idx_fully_vacc)
                .map(|v| v.max(0.0) as u64),
        });
    }
    if skipped > 0 {
        info!("Projection skipped {} aggregate or malformed rows", skipped);
    }

    let mut countries: Vec<Country> = country_meta.into_values().collect();
    countries.sort_by(|a, b| a.iso_code.cmp(&b.iso_code));
    observations.sort();

    Ok(Projection {
        countries,
        observations,
    })
}
