//! SQL schema definitions for the in-memory SQLite database.
//!
//! Contains CREATE TABLE statements for the country and observation
//! tables. The schema is applied as a single batch when the database
//! is initialized.

/// Returns the full SQL schema as a single batch string.
///
/// This creates the following tables:
///
/// - `countries` - Country metadata (ISO code, name, continent, population)
/// - `observations` - Per-(country, date) counts; hospitalization and
///   vaccination columns are nullable because those series start later
///   than case reporting
///
/// Dates are stored as compact TEXT (`YYYYMMDD`) so lexicographic
/// comparison matches chronological order.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS countries (
        iso_code TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        continent TEXT NOT NULL,
        population INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS observations (
        iso_code TEXT NOT NULL,
        date TEXT NOT NULL,
        new_cases INTEGER NOT NULL,
        new_deaths INTEGER NOT NULL,
        total_cases INTEGER NOT NULL,
        total_deaths INTEGER NOT NULL,
        hosp_patients INTEGER,
        icu_patients INTEGER,
        total_vaccinations INTEGER,
        people_fully_vaccinated INTEGER,
        PRIMARY KEY (iso_code, date)
    );
    CREATE INDEX IF NOT EXISTS idx_obs_country ON observations(iso_code);
    CREATE INDEX IF NOT EXISTS idx_obs_date ON observations(date);

    "#
}
