//! Country Statistics Table
//!
//! Displays a sortable table with the latest reported figures for every
//! country in the dataset, plus derived rates (case fatality rate and
//! full-vaccination coverage). Rows are dynamically highlighted: the
//! country with the highest CFR, the country with the highest coverage,
//! and any country whose latest report lags the rest of the dataset.
//!
//! Data flow:
//! 1. `build.rs` copies `countries.csv` and `observations.csv` into `OUT_DIR`.
//! 2. `include_str!` embeds these CSVs into the WASM binary.
//! 3. On mount, the CSVs are loaded into an in-memory SQLite database.
//! 4. `query_latest_snapshot()` results are enriched with rates and flags
//!    and passed to `renderDataTable()` for D3.js rendering.

use cgd_chart_ui::components::{ChartContainer, ChartHeader, ErrorDisplay, LoadingSpinner};
use cgd_chart_ui::js_bridge;
use cgd_chart_ui::state::AppState;
use cgd_data::rates;
use cgd_db::models::CountrySnapshot;
use cgd_db::Database;
use dioxus::prelude::*;

/// All country metadata.
const COUNTRIES_CSV: &str = include_str!(concat!(env!("OUT_DIR"), "/countries.csv"));
/// Daily observation data for all countries.
const OBSERVATIONS_CSV: &str = include_str!(concat!(env!("OUT_DIR"), "/observations.csv"));

/// Table container DOM element ID used by D3.js to render into.
const TABLE_ID: &str = "country-stats-table";

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("country-stats-root"))
        .launch(App);
}

/// Format YYYYMMDD dates to YYYY-MM-DD for display.
fn fmt_date(d: &str) -> String {
    if d.len() == 8 {
        format!("{}-{}-{}", &d[0..4], &d[4..6], &d[6..8])
    } else {
        d.to_string()
    }
}

/// Enrich snapshot rows with derived rates and dynamic highlight flags.
///
/// `max_date` is the newest observation date in the whole dataset; rows
/// older than it are flagged as lagging reporters.
fn table_rows(snapshot: &[CountrySnapshot], max_date: &str) -> Vec<serde_json::Value> {
    let cfr_of = |s: &CountrySnapshot| {
        rates::case_fatality_rate(s.total_deaths.max(0) as u64, s.total_cases.max(0) as u64)
    };
    let coverage_of = |s: &CountrySnapshot| {
        let fully = s.people_fully_vaccinated?.max(0) as u64;
        rates::vaccination_rate(fully, s.population.max(0) as u64)
    };

    let highest_cfr = snapshot
        .iter()
        .filter_map(|s| Some((s.iso_code.clone(), cfr_of(s)?)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(iso, _)| iso);
    let highest_coverage = snapshot
        .iter()
        .filter_map(|s| Some((s.iso_code.clone(), coverage_of(s)?)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(iso, _)| iso);

    snapshot
        .iter()
        .map(|s| {
            serde_json::json!({
                "name": format!("{} ({})", s.name, s.iso_code),
                "date": fmt_date(&s.date),
                "total_cases": s.total_cases,
                "total_deaths": s.total_deaths,
                "hosp_patients": s.hosp_patients,
                "icu_patients": s.icu_patients,
                "cfr": cfr_of(s),
                "coverage": coverage_of(s),
                "population": s.population,
                "is_highest_cfr": highest_cfr.as_deref() == Some(s.iso_code.as_str()),
                "is_highest_coverage": highest_coverage.as_deref() == Some(s.iso_code.as_str()),
                "is_lagging": s.date.as_str() < max_date,
            })
        })
        .collect()
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);

    // Initialize database on mount
    use_effect(move || {
        match Database::new() {
            Ok(db) => {
                if let Err(e) = db.load_countries(COUNTRIES_CSV) {
                    log::error!("Failed to load countries: {}", e);
                    state
                        .error_msg
                        .set(Some(format!("Failed to load country data: {}", e)));
                    state.loading.set(false);
                    return;
                }
                if let Err(e) = db.load_observations(OBSERVATIONS_CSV) {
                    log::error!("Failed to load observations: {}", e);
                    state
                        .error_msg
                        .set(Some(format!("Failed to load observations: {}", e)));
                    state.loading.set(false);
                    return;
                }

                if let Ok(countries) = db.query_countries() {
                    state.countries.set(countries);
                }

                state.db.set(Some(db));
                state.loading.set(false);
            }
            Err(e) => {
                state
                    .error_msg
                    .set(Some(format!("Database initialization failed: {}", e)));
                state.loading.set(false);
            }
        }

        // Initialize D3 chart scripts (one-time)
        js_bridge::init_charts();
    });

    // Render the table once the database is loaded
    use_effect(move || {
        if (state.loading)() {
            return;
        }
        if (state.error_msg)().is_some() {
            return;
        }

        let db = match &*state.db.read() {
            Some(db) => db.clone(),
            None => return,
        };

        let all_isos: Vec<String> = state
            .countries
            .read()
            .iter()
            .map(|c| c.iso_code.clone())
            .collect();

        let result = db
            .query_date_range()
            .and_then(|(_, max_date)| Ok((db.query_latest_snapshot(&all_isos, &max_date)?, max_date)));
        let (snapshot, max_date) = match result {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to query country snapshot: {}", e);
                state
                    .error_msg
                    .set(Some(format!("Failed to query country statistics: {}", e)));
                js_bridge::destroy_chart(TABLE_ID);
                return;
            }
        };

        if snapshot.is_empty() {
            state
                .error_msg
                .set(Some("No observation data available.".to_string()));
            js_bridge::destroy_chart(TABLE_ID);
            return;
        }

        let data_json = serde_json::to_string(&table_rows(&snapshot, &max_date)).unwrap_or_default();
        let config_json = serde_json::to_string(&serde_json::json!({
            "title": "Latest Country Statistics",
            "columns": [
                {"key": "name", "label": "Country", "sortable": true, "type": "string"},
                {"key": "date", "label": "Latest Report", "sortable": true, "type": "date"},
                {"key": "total_cases", "label": "Total Cases", "sortable": true, "type": "number", "format": "comma"},
                {"key": "total_deaths", "label": "Total Deaths", "sortable": true, "type": "number", "format": "comma"},
                {"key": "hosp_patients", "label": "In Hospital", "sortable": true, "type": "number", "format": "comma"},
                {"key": "icu_patients", "label": "In ICU", "sortable": true, "type": "number", "format": "comma"},
                {"key": "cfr", "label": "CFR", "sortable": true, "type": "number", "format": "percent"},
                {"key": "coverage", "label": "Fully Vaccinated", "sortable": true, "type": "number", "format": "percent"},
                {"key": "population", "label": "Population", "sortable": true, "type": "number", "format": "comma"},
            ],
            "highlightRules": [
                {"field": "is_highest_cfr", "color": "#FFEBEE", "borderColor": "#FF5722", "label": "Highest CFR"},
                {"field": "is_highest_coverage", "color": "#E3F2FD", "borderColor": "#2196F3", "label": "Highest Coverage"},
                {"field": "is_lagging", "color": "#FFF8E1", "borderColor": "#FFC107", "label": "Lagging Report"},
            ],
            "defaultSort": {"key": "total_cases", "direction": "desc"},
        }))
        .unwrap_or_default();

        js_bridge::render_data_table(TABLE_ID, &data_json, &config_json);
    });

    rsx! {
        div {
            style: "max-width: 1000px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif;",

            if let Some(err) = state.error_msg.read().as_ref() {
                ErrorDisplay { message: err.clone() }
            }

            if *state.loading.read() {
                LoadingSpinner {}
            } else {
                ChartHeader {
                    title: "COVID-19 Country Statistics".to_string(),
                    unit_description: "latest reported figures per country; rates derived from the latest report".to_string(),
                }

                ChartContainer {
                    id: TABLE_ID.to_string(),
                    loading: *state.loading.read(),
                    min_height: 500,
                }

                p {
                    style: "font-size: 11px; color: #888; text-align: center; margin-top: 4px;",
                    "Click a column header to sort. Highlighted rows mark the highest CFR, highest vaccination coverage and lagging reports."
                }
            }
        }
    }
}
