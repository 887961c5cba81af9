//! Query result model structs for COVID country data.
//!
//! All structs derive `Serialize` so they can be passed to D3.js as JSON
//! from the Dioxus WASM frontend.

use serde::Serialize;

/// A single (date, value) pair used for line chart data points.
///
/// The `date` field uses the compact `YYYYMMDD` format used throughout
/// the database; UI code reformats it for display.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DateValue {
    pub date: String,
    pub value: f64,
}

/// An (iso_code, date, value) triple for multi-line country charts.
///
/// Each point identifies which country the observation belongs to,
/// enabling the chart to draw one line per country.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountryDateValue {
    pub iso_code: String,
    pub date: String,
    pub value: f64,
}

/// A paired (x, y) sample of two metrics on the same (country, date),
/// used by the correlation scatter view.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MetricPair {
    pub date: String,
    pub x: f64,
    pub y: f64,
}

/// Country metadata for selection lists and chart labels.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountryInfo {
    /// ISO 3166-1 alpha-3 code (e.g. "USA").
    pub iso_code: String,
    /// Country name as shown in the UI.
    pub name: String,
    /// Continent name.
    pub continent: String,
    /// Population estimate used for per-capita scaling.
    pub population: i64,
}

/// The most recent observation per country at or before a cutoff date.
///
/// Drives the summary metric cards and the country stats table; rate
/// fields are computed downstream via `cgd-data` so that the zero /
/// missing denominator policy lives in one place.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CountrySnapshot {
    pub iso_code: String,
    pub name: String,
    /// Date of this country's latest observation (YYYYMMDD).
    pub date: String,
    pub new_cases: i64,
    pub total_cases: i64,
    pub total_deaths: i64,
    pub hosp_patients: Option<i64>,
    pub icu_patients: Option<i64>,
    pub people_fully_vaccinated: Option<i64>,
    pub population: i64,
}
