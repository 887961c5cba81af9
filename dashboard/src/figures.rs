//! Pure chart-data builders for the dashboard.
//!
//! Everything here is plain data-in, data-out so it can be unit tested
//! without a browser: query rows come in, JSON-ready `serde_json::Value`
//! rows for the D3 renderers come out. The render effects in `main.rs`
//! stay thin glue.

use cgd_core::observation::CovidObservation;
use cgd_data::{correlate, downsample, rates, rolling};
use cgd_db::models::{CountryDateValue, CountryInfo, CountrySnapshot, MetricPair};
use serde_json::{json, Value};
use std::collections::HashMap;

/// Cap on points per rendered series; longer series are thinned.
pub const MAX_CHART_POINTS: usize = 2000;

/// Per-capita figures are expressed per 100k people.
pub const PER_CAPITA_BASE: f64 = 100_000.0;

/// Window for the daily-series moving average, in days.
pub const SMOOTHING_WINDOW: usize = 7;

/// Convert a date string from YYYYMMDD to YYYY-MM-DD format for D3.js consumption.
pub fn format_date_for_d3(date: &str) -> String {
    if date.len() == 8 {
        format!("{}-{}-{}", &date[0..4], &date[4..6], &date[6..8])
    } else {
        date.to_string()
    }
}

/// Convert a YYYY-MM-DD date back to YYYYMMDD for database comparison.
pub fn format_date_for_db(date: &str) -> String {
    date.replace('-', "")
}

/// UI display name for a country, falling back to the ISO code.
pub fn display_name(countries: &[CountryInfo], iso_code: &str) -> String {
    countries
        .iter()
        .find(|c| c.iso_code == iso_code)
        .map(|c| c.name.clone())
        .unwrap_or_else(|| iso_code.to_string())
}

fn population_of(countries: &[CountryInfo], iso_code: &str) -> Option<u64> {
    countries
        .iter()
        .find(|c| c.iso_code == iso_code)
        .and_then(|c| u64::try_from(c.population).ok())
}

/// Group (iso, date, value) rows into per-country series, preserving the
/// iso-then-date ordering the queries return.
fn group_by_iso(rows: &[CountryDateValue]) -> Vec<(String, Vec<(String, f64)>)> {
    let mut series: Vec<(String, Vec<(String, f64)>)> = Vec::new();
    for row in rows {
        match series.last_mut() {
            Some((iso, points)) if *iso == row.iso_code => {
                points.push((row.date.clone(), row.value));
            }
            _ => series.push((
                row.iso_code.clone(),
                vec![(row.date.clone(), row.value)],
            )),
        }
    }
    series
}

/// Build multi-line chart rows (`{series, date, value}`) for one metric.
///
/// Applies optional per-100k scaling and 7-day smoothing, then thins each
/// country's series to at most [`MAX_CHART_POINTS`]. Countries with an
/// unknown or zero population are dropped when per-capita is requested.
pub fn metric_series(
    rows: &[CountryDateValue],
    countries: &[CountryInfo],
    per_capita: bool,
    smooth: bool,
) -> Vec<Value> {
    let mut out = Vec::new();
    for (iso, points) in group_by_iso(rows) {
        let name = display_name(countries, &iso);

        let mut values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
        if per_capita {
            let Some(population) = population_of(countries, &iso) else {
                continue;
            };
            let scaled: Option<Vec<f64>> = values
                .iter()
                .map(|v| rates::per_capita(*v, population, PER_CAPITA_BASE))
                .collect();
            match scaled {
                Some(s) => values = s,
                None => continue,
            }
        }
        if smooth {
            values = rolling::rolling_mean(&values, SMOOTHING_WINDOW);
        }

        let combined: Vec<(String, f64)> = points
            .iter()
            .map(|(date, _)| date.clone())
            .zip(values)
            .collect();
        for (date, value) in downsample::downsample(&combined, MAX_CHART_POINTS) {
            out.push(json!({
                "series": name,
                "date": format_date_for_d3(&date),
                "value": value,
            }));
        }
    }
    out
}

/// Build percentage-ratio chart rows from two metric histories matched on
/// (country, date). Dates with a zero or missing denominator are skipped,
/// mirroring the `cgd_data::rates` policy.
pub fn ratio_series(
    numerators: &[CountryDateValue],
    denominators: &[CountryDateValue],
    countries: &[CountryInfo],
) -> Vec<Value> {
    let denom: HashMap<(&str, &str), f64> = denominators
        .iter()
        .map(|r| ((r.iso_code.as_str(), r.date.as_str()), r.value))
        .collect();

    let mut out = Vec::new();
    for (iso, points) in group_by_iso(numerators) {
        let name = display_name(countries, &iso);
        let ratios: Vec<(String, f64)> = points
            .into_iter()
            .filter_map(|(date, n)| {
                let d = *denom.get(&(iso.as_str(), date.as_str()))?;
                if d > 0.0 {
                    Some((date, n / d * 100.0))
                } else {
                    None
                }
            })
            .collect();
        for (date, value) in downsample::downsample(&ratios, MAX_CHART_POINTS) {
            out.push(json!({
                "series": name,
                "date": format_date_for_d3(&date),
                "value": value,
            }));
        }
    }
    out
}

/// Build chart rows expressing a cumulative people-count metric as a
/// percentage of each country's population (vaccination coverage).
pub fn percent_of_population_series(
    rows: &[CountryDateValue],
    countries: &[CountryInfo],
) -> Vec<Value> {
    let mut out = Vec::new();
    for (iso, points) in group_by_iso(rows) {
        let Some(population) = population_of(countries, &iso) else {
            continue;
        };
        let name = display_name(countries, &iso);
        let percents: Vec<(String, f64)> = points
            .into_iter()
            .filter_map(|(date, v)| Some((date, rates::per_capita(v, population, 100.0)?)))
            .collect();
        for (date, value) in downsample::downsample(&percents, MAX_CHART_POINTS) {
            out.push(json!({
                "series": name,
                "date": format_date_for_d3(&date),
                "value": value,
            }));
        }
    }
    out
}

/// Build scatter rows and per-country Pearson captions for the
/// correlation view. `pairs` carries one (display name, samples) entry
/// per selected country.
pub fn scatter_data(pairs: &[(String, Vec<MetricPair>)]) -> (Vec<Value>, Vec<Value>) {
    let mut points = Vec::new();
    let mut captions = Vec::new();
    for (name, samples) in pairs {
        for p in downsample::downsample(samples, MAX_CHART_POINTS) {
            points.push(json!({
                "series": name,
                "x": p.x,
                "y": p.y,
                "date": format_date_for_d3(&p.date),
            }));
        }

        let xs: Vec<f64> = samples.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = samples.iter().map(|p| p.y).collect();
        let text = match correlate::pearson(&xs, &ys) {
            Some(r) => format!("{}: r = {:.3}", name, r),
            None => format!("{}: r = n/a", name),
        };
        captions.push(json!({ "series": name, "text": text }));
    }
    (points, captions)
}

/// Key figures for the summary card row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    pub total_cases: i64,
    pub total_deaths: i64,
    /// Combined case fatality rate across the selection, percent.
    pub case_fatality_rate: Option<f64>,
    /// Mean full-vaccination coverage across countries reporting it, percent.
    pub mean_vaccination_rate: Option<f64>,
    pub countries_analyzed: usize,
}

/// Aggregate the latest per-country snapshot into summary card figures.
pub fn summarize(snapshot: &[CountrySnapshot]) -> Summary {
    let total_cases: i64 = snapshot.iter().map(|s| s.total_cases).sum();
    let total_deaths: i64 = snapshot.iter().map(|s| s.total_deaths).sum();
    let case_fatality_rate =
        rates::case_fatality_rate(total_deaths.max(0) as u64, total_cases.max(0) as u64);

    let coverages: Vec<f64> = snapshot
        .iter()
        .filter_map(|s| {
            let fully = s.people_fully_vaccinated?.max(0) as u64;
            rates::vaccination_rate(fully, s.population.max(0) as u64)
        })
        .collect();
    let mean_vaccination_rate = if coverages.is_empty() {
        None
    } else {
        Some(coverages.iter().sum::<f64>() / coverages.len() as f64)
    };

    Summary {
        total_cases,
        total_deaths,
        case_fatality_rate,
        mean_vaccination_rate,
        countries_analyzed: snapshot.len(),
    }
}

/// Format a count with thousands separators for the metric cards.
pub fn format_count(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if value < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Filter the embedded observation CSV to the current selection and emit
/// a headered CSV with display dates, ready for browser download.
pub fn export_csv(raw_csv: &str, iso_codes: &[String], start_date: &str, end_date: &str) -> String {
    let start = format_date_for_db(start_date);
    let end = format_date_for_db(end_date);

    let mut out = String::from(
        "iso_code,date,new_cases,new_deaths,total_cases,total_deaths,\
         hosp_patients,icu_patients,total_vaccinations,people_fully_vaccinated\n",
    );
    for obs in CovidObservation::parse_csv(raw_csv) {
        if !iso_codes.contains(&obs.iso_code) {
            continue;
        }
        let date = obs.date.format(cgd_core::observation::DATE_FORMAT).to_string();
        if date < start || date > end {
            continue;
        }
        let mut record = obs.csv_record();
        let display_date = format_date_for_d3(&record[1]);
        record[1] = display_date;
        out.push_str(&record.join(","));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries() -> Vec<CountryInfo> {
        vec![
            CountryInfo {
                iso_code: "USA".to_string(),
                name: "United States".to_string(),
                continent: "North America".to_string(),
                population: 331_000_000,
            },
            CountryInfo {
                iso_code: "KEN".to_string(),
                name: "Kenya".to_string(),
                continent: "Africa".to_string(),
                population: 53_000_000,
            },
        ]
    }

    fn row(iso: &str, date: &str, value: f64) -> CountryDateValue {
        CountryDateValue {
            iso_code: iso.to_string(),
            date: date.to_string(),
            value,
        }
    }

    #[test]
    fn date_format_round_trip() {
        assert_eq!(format_date_for_d3("20210315"), "2021-03-15");
        assert_eq!(format_date_for_db("2021-03-15"), "20210315");
        // Non-compact input passes through unchanged
        assert_eq!(format_date_for_d3("2021"), "2021");
    }

    #[test]
    fn non_empty_rows_yield_non_empty_figure_data() {
        let rows = vec![
            row("USA", "20210101", 100.0),
            row("USA", "20210102", 120.0),
            row("KEN", "20210101", 10.0),
        ];
        let data = metric_series(&rows, &countries(), false, false);
        assert_eq!(data.len(), 3);
        assert_eq!(data[0]["series"], "United States");
        assert_eq!(data[0]["date"], "2021-01-01");
        assert_eq!(data[2]["series"], "Kenya");
    }

    #[test]
    fn per_capita_scales_by_population() {
        // 3310 raw for USA is exactly 1 per 100k
        let rows = vec![row("USA", "20210101", 3310.0)];
        let data = metric_series(&rows, &countries(), true, false);
        assert_eq!(data.len(), 1);
        let value = data[0]["value"].as_f64().unwrap();
        assert!((value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_country_dropped_only_for_per_capita() {
        let rows = vec![row("XXX", "20210101", 5.0)];
        assert_eq!(metric_series(&rows, &countries(), true, false).len(), 0);
        let raw = metric_series(&rows, &countries(), false, false);
        assert_eq!(raw.len(), 1);
        // Falls back to the ISO code as series label
        assert_eq!(raw[0]["series"], "XXX");
    }

    #[test]
    fn smoothing_keeps_series_length() {
        let rows: Vec<CountryDateValue> = (1..=30)
            .map(|d| row("USA", &format!("202101{:02}", d), d as f64))
            .collect();
        let data = metric_series(&rows, &countries(), false, true);
        assert_eq!(data.len(), 30);
        // A constant series is unchanged by smoothing
        let flat: Vec<CountryDateValue> = (1..=10)
            .map(|d| row("USA", &format!("202101{:02}", d), 7.0))
            .collect();
        for point in metric_series(&flat, &countries(), false, true) {
            assert!((point["value"].as_f64().unwrap() - 7.0).abs() < 1e-9);
        }
    }

    #[test]
    fn ratio_series_skips_zero_denominators() {
        let deaths = vec![
            row("USA", "20210101", 20.0),
            row("USA", "20210102", 30.0),
            row("USA", "20210103", 40.0),
        ];
        let cases = vec![
            row("USA", "20210101", 1000.0),
            row("USA", "20210102", 0.0),
            row("USA", "20210103", 2000.0),
        ];
        let data = ratio_series(&deaths, &cases, &countries());
        assert_eq!(data.len(), 2);
        assert!((data[0]["value"].as_f64().unwrap() - 2.0).abs() < 1e-9);
        assert_eq!(data[1]["date"], "2021-01-03");
    }

    #[test]
    fn ratio_series_requires_matching_dates() {
        let numer = vec![row("USA", "20210101", 5.0)];
        let denom = vec![row("USA", "20210102", 100.0)];
        assert!(ratio_series(&numer, &denom, &countries()).is_empty());
    }

    #[test]
    fn coverage_expressed_as_percent_of_population() {
        // 26.5M fully vaccinated in Kenya (53M people) is 50%
        let rows = vec![row("KEN", "20211001", 26_500_000.0)];
        let data = percent_of_population_series(&rows, &countries());
        assert_eq!(data.len(), 1);
        assert!((data[0]["value"].as_f64().unwrap() - 50.0).abs() < 1e-9);
        // Countries without metadata are dropped
        let unknown = vec![row("XXX", "20211001", 100.0)];
        assert!(percent_of_population_series(&unknown, &countries()).is_empty());
    }

    #[test]
    fn scatter_captions_report_pearson() {
        let samples: Vec<MetricPair> = (1..=10)
            .map(|i| MetricPair {
                date: format!("202101{:02}", i),
                x: i as f64,
                y: i as f64 * 3.0,
            })
            .collect();
        let pairs = vec![("United States".to_string(), samples)];
        let (points, captions) = scatter_data(&pairs);
        assert_eq!(points.len(), 10);
        assert_eq!(captions.len(), 1);
        assert_eq!(captions[0]["text"], "United States: r = 1.000");
    }

    #[test]
    fn scatter_caption_na_when_undefined() {
        let samples = vec![MetricPair {
            date: "20210101".to_string(),
            x: 1.0,
            y: 2.0,
        }];
        let (_, captions) = scatter_data(&[("Kenya".to_string(), samples)]);
        assert_eq!(captions[0]["text"], "Kenya: r = n/a");
    }

    #[test]
    fn summary_aggregates_snapshot() {
        let snapshot = vec![
            CountrySnapshot {
                iso_code: "USA".to_string(),
                name: "United States".to_string(),
                date: "20210103".to_string(),
                new_cases: 1000,
                total_cases: 20_000_000,
                total_deaths: 350_000,
                hosp_patients: Some(100),
                icu_patients: Some(10),
                people_fully_vaccinated: Some(165_500_000),
                population: 331_000_000,
            },
            CountrySnapshot {
                iso_code: "KEN".to_string(),
                name: "Kenya".to_string(),
                date: "20210102".to_string(),
                new_cases: 500,
                total_cases: 100_000,
                total_deaths: 1_700,
                hosp_patients: None,
                icu_patients: None,
                people_fully_vaccinated: None,
                population: 53_000_000,
            },
        ];
        let summary = summarize(&snapshot);
        assert_eq!(summary.total_cases, 20_100_000);
        assert_eq!(summary.total_deaths, 351_700);
        assert_eq!(summary.countries_analyzed, 2);
        let cfr = summary.case_fatality_rate.unwrap();
        assert!((cfr - 351_700.0 / 20_100_000.0 * 100.0).abs() < 1e-9);
        // Only USA reports vaccination coverage: mean is USA's 50%
        let coverage = summary.mean_vaccination_rate.unwrap();
        assert!((coverage - 50.0).abs() < 1e-9);
    }

    #[test]
    fn summary_of_empty_snapshot() {
        let summary = summarize(&[]);
        assert_eq!(summary.total_cases, 0);
        assert!(summary.case_fatality_rate.is_none());
        assert!(summary.mean_vaccination_rate.is_none());
    }

    #[test]
    fn count_formatting() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(20_100_000), "20,100,000");
        assert_eq!(format_count(-1234), "-1,234");
    }

    #[test]
    fn export_filters_selection_and_range() {
        let raw = "\
USA,20210101,150000,2500,20000000,350000,120000,22000,5000000,500000
USA,20210102,145000,2400,20145000,352400,119000,21800,5600000,560000
KEN,20210101,500,10,100000,1700,,,,
SWE,20210101,4000,40,500000,10000,1200,240,100000,10000
";
        let isos = vec!["USA".to_string(), "KEN".to_string()];
        let csv = export_csv(raw, &isos, "2021-01-01", "2021-01-01");
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("iso_code,date,"));
        assert!(lines[1].starts_with("USA,2021-01-01,150000"));
        assert!(lines[2].starts_with("KEN,2021-01-01,500"));
        assert!(!csv.contains("SWE"));
        assert!(!csv.contains("20210102"));
    }
}
