//! CSV data loading functions for populating the in-memory SQLite database.
//!
//! Each loader method parses CSV data from a string slice and inserts rows
//! into the corresponding table. The CSV formats match the fixture files
//! produced by the CLI `generate` and `fetch` subcommands.
//!
//! # CSV Formats
//!
//! - **Countries** (has headers): `ISO_CODE,NAME,CONTINENT,POPULATION`
//! - **Observations** (no headers):
//!   `iso_code,date(YYYYMMDD),new_cases,new_deaths,total_cases,total_deaths,hosp,icu,total_vacc,fully_vacc`

use crate::Database;
use rusqlite::params;

impl Database {
    /// Load country metadata from CSV string.
    ///
    /// Expected format (with headers): `ISO_CODE,NAME,CONTINENT,POPULATION`
    ///
    /// # Example CSV
    /// ```text
    /// ISO_CODE,NAME,CONTINENT,POPULATION
    /// USA,United States,North America,331000000
    /// ```
    pub fn load_countries(&self, csv_data: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut count = 0u32;
        let mut skipped = 0u32;
        for result in rdr.records() {
            let r = result?;
            let iso_code = r.get(0).unwrap_or("").trim();
            let name = r.get(1).unwrap_or("").trim();
            let continent = r.get(2).unwrap_or("").trim();
            let population: Option<i64> = r.get(3).and_then(|s| s.trim().parse().ok());

            let population = match (iso_code.is_empty(), population) {
                (false, Some(p)) => p,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            conn.execute(
                "INSERT OR REPLACE INTO countries (iso_code, name, continent, population)
                 VALUES (?1, ?2, ?3, ?4)",
                params![iso_code, name, continent, population],
            )?;
            count += 1;
        }
        log::info!(
            "[CGD Debug] loader: Loaded {} countries, skipped {} invalid",
            count,
            skipped
        );
        Ok(())
    }

    /// Load observations from CSV string.
    ///
    /// Expected format (no headers):
    /// `iso_code,date(YYYYMMDD),new_cases,new_deaths,total_cases,total_deaths,hosp,icu,total_vacc,fully_vacc`
    ///
    /// The four trailing columns may be empty, in which case they are
    /// stored as NULL. Rows with a missing iso_code or date, or with
    /// non-numeric required counts, are skipped.
    ///
    /// # Example CSV
    /// ```text
    /// USA,20210101,150000,2500,20000000,350000,120000,22000,5000000,500000
    /// KEN,20210101,500,10,100000,1700,,,,
    /// ```
    pub fn load_observations(&self, csv_data: &str) -> anyhow::Result<()> {
        let conn = self.conn.borrow();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(csv_data.as_bytes());

        let mut count = 0u32;
        let mut skipped = 0u32;
        for result in rdr.records() {
            let r = result?;
            let iso_code = r.get(0).unwrap_or("").trim();
            let date = r.get(1).unwrap_or("").trim();

            if iso_code.is_empty() || date.is_empty() {
                skipped += 1;
                continue;
            }

            let required: Vec<i64> = (2..6)
                .filter_map(|i| r.get(i).and_then(|s| s.trim().parse().ok()))
                .collect();
            if required.len() != 4 {
                skipped += 1;
                continue;
            }

            let optional: Vec<Option<i64>> = (6..10)
                .map(|i| r.get(i).and_then(|s| s.trim().parse().ok()))
                .collect();

            conn.execute(
                "INSERT OR REPLACE INTO observations
                 (iso_code, date, new_cases, new_deaths, total_cases, total_deaths,
                  hosp_patients, icu_patients, total_vaccinations, people_fully_vaccinated)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    iso_code,
                    date,
                    required[0],
                    required[1],
                    required[2],
                    required[3],
                    optional[0],
                    optional[1],
                    optional[2],
                    optional[3],
                ],
            )?;
            count += 1;
        }
        log::info!(
            "[CGD Debug] loader: Loaded {} observations, skipped {} invalid",
            count,
            skipped
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::Database;

    #[test]
    fn load_countries_from_csv() {
        let db = Database::new().unwrap();
        let csv = "\
ISO_CODE,NAME,CONTINENT,POPULATION
USA,United States,North America,331000000
KEN,Kenya,Africa,53000000
";
        db.load_countries(csv).unwrap();

        let conn = db.conn.borrow();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM countries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2);

        let name: String = conn
            .query_row(
                "SELECT name FROM countries WHERE iso_code = 'KEN'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(name, "Kenya");

        let population: i64 = conn
            .query_row(
                "SELECT population FROM countries WHERE iso_code = 'USA'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(population, 331_000_000);
    }

    #[test]
    fn load_countries_replaces_on_conflict() {
        let db = Database::new().unwrap();
        let csv1 = "\
ISO_CODE,NAME,CONTINENT,POPULATION
USA,United States,North America,331000000
";
        let csv2 = "\
ISO_CODE,NAME,CONTINENT,POPULATION
USA,United States of America,North America,331000000
";
        db.load_countries(csv1).unwrap();
        db.load_countries(csv2).unwrap();

        let conn = db.conn.borrow();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM countries", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1, "Should have 1 row after upsert");

        let name: String = conn
            .query_row(
                "SELECT name FROM countries WHERE iso_code = 'USA'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(name, "United States of America");
    }

    #[test]
    fn load_observations_from_csv() {
        let db = Database::new().unwrap();
        let csv = "\
USA,20210101,150000,2500,20000000,350000,120000,22000,5000000,500000
USA,20210102,145000,2400,20145000,352400,119000,21800,5600000,560000
KEN,20210101,500,10,100000,1700,,,,
";
        db.load_observations(csv).unwrap();

        let conn = db.conn.borrow();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM observations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 3);

        let total: i64 = conn
            .query_row(
                "SELECT total_cases FROM observations WHERE iso_code = 'USA' AND date = '20210102'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(total, 20_145_000);
    }

    #[test]
    fn load_observations_stores_null_optionals() {
        let db = Database::new().unwrap();
        let csv = "KEN,20210101,500,10,100000,1700,,,,\n";
        db.load_observations(csv).unwrap();

        let conn = db.conn.borrow();
        let hosp: Option<i64> = conn
            .query_row(
                "SELECT hosp_patients FROM observations WHERE iso_code = 'KEN'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert!(hosp.is_none(), "Missing hospitalization should be NULL");
    }

    #[test]
    fn load_observations_skips_invalid_rows() {
        let db = Database::new().unwrap();
        let csv = "\
USA,20210101,1000,10,100000,2000,,,,
,20210102,1000,10,100000,2000,,,,
USA,,1000,10,100000,2000,,,,
USA,20210103,not_a_number,10,100000,2000,,,,
USA,20210104,2000,20,102000,2020,,,,
";
        db.load_observations(csv).unwrap();

        let conn = db.conn.borrow();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM observations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 2, "Should only load well-formed rows");
    }
}
