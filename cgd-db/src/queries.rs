//! Typed query methods for retrieving COVID country data from the database.
//!
//! All queries return typed structs from [`crate::models`] that can be
//! serialized to JSON for consumption by D3.js chart components.
//!
//! # Conventions
//!
//! - Dates are compact `YYYYMMDD` TEXT, so string comparison is
//!   chronological and range filters are inclusive on both ends.
//! - Metric columns are never interpolated from raw strings; they come
//!   from [`cgd_core::analysis::Metric::column`], which is a closed set.
//! - Country-set filters build a bound `IN (?...)` list. An empty
//!   country selection is a valid query that returns no rows.

use crate::models::{CountryDateValue, CountryInfo, CountrySnapshot, DateValue, MetricPair};
use crate::Database;
use cgd_core::analysis::Metric;
use rusqlite::{params, params_from_iter};

/// Build `?N, ?N+1, ...` placeholders for an IN list starting at `start_idx`.
fn in_placeholders(start_idx: usize, len: usize) -> String {
    (0..len)
        .map(|i| format!("?{}", start_idx + i))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Database {
    /// Get list of all countries.
    ///
    /// Returns metadata for all countries in the database, ordered by
    /// population descending (largest countries first).
    pub fn query_countries(&self) -> anyhow::Result<Vec<CountryInfo>> {
        let conn = self.conn.borrow();
        let mut stmt = conn.prepare(
            "SELECT iso_code, name, continent, population FROM countries
             ORDER BY population DESC",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CountryInfo {
                    iso_code: row.get(0)?,
                    name: row.get(1)?,
                    continent: row.get(2)?,
                    population: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[CGD Debug] query: query_countries returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    /// Get the (min, max) date range for all observations.
    ///
    /// Returns the earliest and latest dates across all country
    /// observations in YYYYMMDD format. Fails if no observations are
    /// loaded.
    pub fn query_date_range(&self) -> anyhow::Result<(String, String)> {
        let conn = self.conn.borrow();
        let (min_date, max_date): (Option<String>, Option<String>) =
            conn.query_row("SELECT MIN(date), MAX(date) FROM observations", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
        match (min_date, max_date) {
            (Some(min_date), Some(max_date)) => {
                log::info!(
                    "[CGD Debug] query: query_date_range returned ({}, {})",
                    min_date,
                    max_date
                );
                Ok((min_date, max_date))
            }
            _ => anyhow::bail!("no observations loaded"),
        }
    }

    /// Get one metric's history for a single country within a date range.
    ///
    /// Returns (date, value) pairs ordered chronologically. Rows where
    /// the metric is NULL (not yet reported) are excluded.
    pub fn query_metric_history(
        &self,
        iso_code: &str,
        metric: Metric,
        start_date: &str,
        end_date: &str,
    ) -> anyhow::Result<Vec<DateValue>> {
        let conn = self.conn.borrow();
        let sql = format!(
            "SELECT date, {col} FROM observations
             WHERE iso_code = ?1 AND date >= ?2 AND date <= ?3
               AND {col} IS NOT NULL
             ORDER BY date",
            col = metric.column()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![iso_code, start_date, end_date], |row| {
                Ok(DateValue {
                    date: row.get(0)?,
                    value: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[CGD Debug] query: query_metric_history({}) returned {} records",
            metric,
            rows.len()
        );
        Ok(rows)
    }

    /// Get one metric's history for a set of countries (multi-line chart).
    ///
    /// Returns observations ordered by iso_code then date, enabling the
    /// chart to draw one line per country. An empty country list yields
    /// an empty result without error.
    pub fn query_metric_histories(
        &self,
        iso_codes: &[String],
        metric: Metric,
        start_date: &str,
        end_date: &str,
    ) -> anyhow::Result<Vec<CountryDateValue>> {
        if iso_codes.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn.borrow();
        let sql = format!(
            "SELECT iso_code, date, {col} FROM observations
             WHERE date >= ?1 AND date <= ?2
               AND {col} IS NOT NULL
               AND iso_code IN ({placeholders})
             ORDER BY iso_code, date",
            col = metric.column(),
            placeholders = in_placeholders(3, iso_codes.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let bound = [start_date, end_date]
            .into_iter()
            .map(str::to_string)
            .chain(iso_codes.iter().cloned());
        let rows = stmt
            .query_map(params_from_iter(bound), |row| {
                Ok(CountryDateValue {
                    iso_code: row.get(0)?,
                    date: row.get(1)?,
                    value: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[CGD Debug] query: query_metric_histories({}) returned {} records",
            metric,
            rows.len()
        );
        Ok(rows)
    }

    /// Get the latest observation per selected country at or before `end_date`.
    ///
    /// Drives the summary metric cards and the country stats table.
    /// Ordered by population descending. An empty country list yields
    /// an empty result without error.
    pub fn query_latest_snapshot(
        &self,
        iso_codes: &[String],
        end_date: &str,
    ) -> anyhow::Result<Vec<CountrySnapshot>> {
        if iso_codes.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.conn.borrow();
        let sql = format!(
            "SELECT o.iso_code, c.name, o.date, o.new_cases, o.total_cases,
                    o.total_deaths, o.hosp_patients, o.icu_patients,
                    o.people_fully_vaccinated, c.population
             FROM observations o
             INNER JOIN countries c ON o.iso_code = c.iso_code
             INNER JOIN (
                 SELECT iso_code, MAX(date) AS max_date
                 FROM observations
                 WHERE date <= ?1
                 GROUP BY iso_code
             ) latest ON o.iso_code = latest.iso_code AND o.date = latest.max_date
             WHERE o.iso_code IN ({placeholders})
             ORDER BY c.population DESC",
            placeholders = in_placeholders(2, iso_codes.len())
        );
        let mut stmt = conn.prepare(&sql)?;
        let bound = std::iter::once(end_date.to_string()).chain(iso_codes.iter().cloned());
        let rows = stmt
            .query_map(params_from_iter(bound), |row| {
                Ok(CountrySnapshot {
                    iso_code: row.get(0)?,
                    name: row.get(1)?,
                    date: row.get(2)?,
                    new_cases: row.get(3)?,
                    total_cases: row.get(4)?,
                    total_deaths: row.get(5)?,
                    hosp_patients: row.get(6)?,
                    icu_patients: row.get(7)?,
                    people_fully_vaccinated: row.get(8)?,
                    population: row.get(9)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[CGD Debug] query: query_latest_snapshot returned {} records",
            rows.len()
        );
        Ok(rows)
    }

    /// Get paired samples of two metrics for one country (correlation view).
    ///
    /// Returns only dates where both metrics are present, ordered
    /// chronologically.
    pub fn query_metric_pairs(
        &self,
        iso_code: &str,
        metric_x: Metric,
        metric_y: Metric,
        start_date: &str,
        end_date: &str,
    ) -> anyhow::Result<Vec<MetricPair>> {
        let conn = self.conn.borrow();
        let sql = format!(
            "SELECT date, {x}, {y} FROM observations
             WHERE iso_code = ?1 AND date >= ?2 AND date <= ?3
               AND {x} IS NOT NULL AND {y} IS NOT NULL
             ORDER BY date",
            x = metric_x.column(),
            y = metric_y.column()
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![iso_code, start_date, end_date], |row| {
                Ok(MetricPair {
                    date: row.get(0)?,
                    x: row.get(1)?,
                    y: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        log::info!(
            "[CGD Debug] query: query_metric_pairs({}, {}) returned {} records",
            metric_x,
            metric_y,
            rows.len()
        );
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    const COUNTRIES_CSV: &str = "\
ISO_CODE,NAME,CONTINENT,POPULATION
USA,United States,North America,331000000
KEN,Kenya,Africa,53000000
SWE,Sweden,Europe,10400000
";

    const OBSERVATIONS_CSV: &str = "\
USA,20210101,150000,2500,20000000,350000,120000,22000,5000000,500000
USA,20210102,145000,2400,20145000,352400,119000,21800,5600000,560000
USA,20210103,140000,2300,20285000,354700,118000,21500,6200000,620000
KEN,20210101,500,10,100000,1700,,,,
KEN,20210102,520,11,100520,1711,,,,
SWE,20210102,4000,40,500000,10000,1200,240,100000,10000
";

    fn test_db() -> Database {
        let db = Database::new().unwrap();
        db.load_countries(COUNTRIES_CSV).unwrap();
        db.load_observations(OBSERVATIONS_CSV).unwrap();
        db
    }

    fn isos(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn countries_ordered_by_population() {
        let db = test_db();
        let countries = db.query_countries().unwrap();
        assert_eq!(countries.len(), 3);
        assert_eq!(countries[0].iso_code, "USA");
        assert_eq!(countries[2].iso_code, "SWE");
    }

    #[test]
    fn date_range_spans_observations() {
        let db = test_db();
        let (min, max) = db.query_date_range().unwrap();
        assert_eq!(min, "20210101");
        assert_eq!(max, "20210103");
    }

    #[test]
    fn date_range_fails_when_empty() {
        let db = Database::new().unwrap();
        assert!(db.query_date_range().is_err());
    }

    #[test]
    fn metric_history_is_chronological_and_inclusive() {
        let db = test_db();
        let rows = db
            .query_metric_history("USA", Metric::TotalCases, "20210101", "20210103")
            .unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].date, "20210101");
        assert_eq!(rows[2].date, "20210103");
        assert!((rows[0].value - 20_000_000.0).abs() < 0.01);
    }

    #[test]
    fn metric_history_respects_range_bounds() {
        let db = test_db();
        let rows = db
            .query_metric_history("USA", Metric::TotalCases, "20210102", "20210102")
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].date, "20210102");
    }

    #[test]
    fn histories_only_include_selected_countries() {
        let db = test_db();
        let rows = db
            .query_metric_histories(&isos(&["USA", "KEN"]), Metric::NewCases, "20210101", "20210103")
            .unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|r| r.iso_code == "USA" || r.iso_code == "KEN"));
        assert!(rows.iter().all(|r| r.iso_code != "SWE"));
    }

    #[test]
    fn empty_selection_yields_empty_without_error() {
        let db = test_db();
        let rows = db
            .query_metric_histories(&[], Metric::NewCases, "20210101", "20210103")
            .unwrap();
        assert!(rows.is_empty());

        let snapshot = db.query_latest_snapshot(&[], "20210103").unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn null_metrics_are_excluded() {
        let db = test_db();
        // Kenya reports no hospitalization data at all
        let rows = db
            .query_metric_histories(
                &isos(&["USA", "KEN"]),
                Metric::HospPatients,
                "20210101",
                "20210103",
            )
            .unwrap();
        assert!(rows.iter().all(|r| r.iso_code == "USA"));
    }

    #[test]
    fn latest_snapshot_takes_newest_row_per_country() {
        let db = test_db();
        let snapshot = db
            .query_latest_snapshot(&isos(&["USA", "KEN", "SWE"]), "20210103")
            .unwrap();
        assert_eq!(snapshot.len(), 3);
        // Ordered by population descending
        assert_eq!(snapshot[0].iso_code, "USA");
        assert_eq!(snapshot[0].date, "20210103");
        assert_eq!(snapshot[0].total_cases, 20_285_000);
        let ken = snapshot.iter().find(|s| s.iso_code == "KEN").unwrap();
        assert_eq!(ken.date, "20210102");
        assert!(ken.hosp_patients.is_none());
    }

    #[test]
    fn latest_snapshot_respects_cutoff() {
        let db = test_db();
        let snapshot = db
            .query_latest_snapshot(&isos(&["USA"]), "20210102")
            .unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].date, "20210102");
        assert_eq!(snapshot[0].total_cases, 20_145_000);
    }

    #[test]
    fn metric_pairs_require_both_values() {
        let db = test_db();
        // Kenya has cases but no hospitalization data: no pairs
        let pairs = db
            .query_metric_pairs("KEN", Metric::NewCases, Metric::HospPatients, "20210101", "20210103")
            .unwrap();
        assert!(pairs.is_empty());

        let pairs = db
            .query_metric_pairs("USA", Metric::NewCases, Metric::HospPatients, "20210101", "20210103")
            .unwrap();
        assert_eq!(pairs.len(), 3);
        assert!((pairs[0].x - 150_000.0).abs() < 0.01);
        assert!((pairs[0].y - 120_000.0).abs() < 0.01);
    }
}
