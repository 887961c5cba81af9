//! COVID-19 Global Interactive Dashboard
//!
//! Single-page Dioxus WASM app: country multi-select, date range filter,
//! analysis mode selector and D3.js charts, backed by an in-memory
//! SQLite database.
//!
//! Data flow:
//! 1. `build.rs` copies the fixture CSVs (or a tiny fallback) into OUT_DIR.
//! 2. `include_str!` embeds them into the WASM binary.
//! 3. On mount: load both CSVs into `cgd_db::Database`, pick default
//!    countries and the most recent year as the date window.
//! 4. On any filter change: re-query, rebuild figure data via `figures`,
//!    and re-render through the D3 bridge.

use cgd_chart_ui::components::{
    AdvancedOptions, AnalysisSelector, ChartContainer, ChartHeader, CountrySelector,
    DateRangePicker, ErrorDisplay, LoadingSpinner, MetricCard,
};
use cgd_chart_ui::js_bridge;
use cgd_chart_ui::state::AppState;
use cgd_core::analysis::{AnalysisMode, Metric};
use cgd_core::observation::DATE_FORMAT;
use cgd_db::models::CountryInfo;
use cgd_db::Database;
use chrono::{NaiveDate, TimeDelta};
use dioxus::prelude::*;

mod figures;

// Embed the fixture dataset at compile time.
const COUNTRIES_CSV: &str = include_str!(concat!(env!("OUT_DIR"), "/countries.csv"));
const OBSERVATIONS_CSV: &str = include_str!(concat!(env!("OUT_DIR"), "/observations.csv"));

// DOM ids for the D3 chart containers, one per analysis view.
const OVERVIEW_TOTAL_CHART: &str = "overview-total-chart";
const OVERVIEW_NEW_CHART: &str = "overview-new-chart";
const CASES_DEATHS_GRID: &str = "cases-deaths-grid";
const HOSPITALIZATION_GRID: &str = "hospitalization-grid";
const VACCINATION_GRID: &str = "vaccination-grid";
const CORRELATION_CHART: &str = "correlation-chart";

/// Countries pre-selected on first load, in preference order.
const DEFAULT_SELECTION: [&str; 5] = ["USA", "GBR", "DEU", "IND", "BRA"];
const DEFAULT_SELECTION_SIZE: usize = 3;

/// Initial date window: the most recent year of data.
const DEFAULT_WINDOW_DAYS: i64 = 365;

fn main() {
    dioxus_logger::init(dioxus_logger::tracing::Level::INFO).expect("failed to init logger");
    dioxus::LaunchBuilder::new()
        .with_cfg(dioxus::web::Config::new().rootname("covid-dashboard-root"))
        .launch(App);
}

/// Pick the initial country selection from the loaded country list.
fn default_selection(countries: &[CountryInfo]) -> Vec<String> {
    let preferred: Vec<String> = DEFAULT_SELECTION
        .iter()
        .filter(|iso| countries.iter().any(|c| c.iso_code == **iso))
        .take(DEFAULT_SELECTION_SIZE)
        .map(|iso| iso.to_string())
        .collect();
    if !preferred.is_empty() {
        return preferred;
    }
    countries
        .iter()
        .take(DEFAULT_SELECTION_SIZE)
        .map(|c| c.iso_code.clone())
        .collect()
}

/// Start of the initial window: one year before `max_date`, clamped to
/// `min_date`. Dates are compact YYYYMMDD strings.
fn default_start(min_date: &str, max_date: &str) -> String {
    let start = NaiveDate::parse_from_str(max_date, DATE_FORMAT)
        .ok()
        .and_then(|d| d.checked_sub_signed(TimeDelta::try_days(DEFAULT_WINDOW_DAYS)?))
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| min_date.to_string());
    start.max(min_date.to_string())
}

/// Display toggles passed down to the chart renderers.
#[derive(Clone, Copy)]
struct ChartOptions {
    per_capita: bool,
    smooth: bool,
    log_scale: bool,
}

#[component]
fn App() -> Element {
    let mut state = use_context_provider(AppState::new);
    let mut summary: Signal<Option<figures::Summary>> = use_signal(|| None);
    let mut notice: Signal<Option<String>> = use_signal(|| None);

    // ─── Effect 1: Load the embedded dataset once on mount ───
    use_effect(move || {
        let mut mount = || -> anyhow::Result<()> {
            let db = Database::new()?;
            db.load_countries(COUNTRIES_CSV)?;
            db.load_observations(OBSERVATIONS_CSV)?;

            let countries = db.query_countries()?;
            let (min_date, max_date) = db.query_date_range()?;

            state.selected_countries.set(default_selection(&countries));
            state.countries.set(countries);
            state
                .start_date
                .set(figures::format_date_for_d3(&default_start(&min_date, &max_date)));
            state.end_date.set(figures::format_date_for_d3(&max_date));
            state.min_date.set(figures::format_date_for_d3(&min_date));
            state.max_date.set(figures::format_date_for_d3(&max_date));
            state.db.set(Some(db));
            Ok(())
        };

        if let Err(e) = mount() {
            state.error_msg.set(Some(format!("Failed to load COVID data: {}", e)));
        }
        state.loading.set(false);

        // Initialize D3 chart scripts (one-time)
        js_bridge::init_charts();
    });

    // ─── Effect 2: Re-query and re-render charts on any filter change ───
    use_effect(move || {
        let loading = (state.loading)();
        let selected = state.selected_countries.read().clone();
        let start = (state.start_date)();
        let end = (state.end_date)();
        let mode = (state.analysis_mode)();
        let options = ChartOptions {
            per_capita: (state.per_capita)(),
            smooth: (state.moving_average)(),
            log_scale: (state.log_scale)(),
        };

        if loading || start.is_empty() || end.is_empty() {
            return;
        }
        let Some(db) = state.db.read().clone() else {
            return;
        };
        let countries = state.countries.read().clone();

        if selected.is_empty() {
            summary.set(None);
            notice.set(Some(
                "Select at least one country to see the charts.".to_string(),
            ));
            return;
        }

        let start_raw = figures::format_date_for_db(&start);
        let end_raw = figures::format_date_for_db(&end);

        let result = db
            .query_latest_snapshot(&selected, &end_raw)
            .map(|snapshot| summary.set(Some(figures::summarize(&snapshot))))
            .and_then(|_| {
                render_charts(&db, &countries, &selected, &start_raw, &end_raw, mode, options)
            });

        match result {
            Ok(true) => notice.set(None),
            Ok(false) => notice.set(Some(empty_notice(mode).to_string())),
            Err(e) => state.error_msg.set(Some(format!("Query failed: {}", e))),
        }
    });

    // ─── Render ───
    let mode = (state.analysis_mode)();
    let unit_desc = if (state.per_capita)() {
        "per 100,000 people (7-day values where smoothed)".to_string()
    } else {
        "people".to_string()
    };

    rsx! {
        div {
            style: "max-width: 1200px; margin: 0 auto; padding: 8px; font-family: system-ui, -apple-system, sans-serif;",

            h2 {
                style: "margin: 4px 0 12px 0;",
                "COVID-19 Global Interactive Dashboard"
            }

            if let Some(err) = state.error_msg.read().as_ref() {
                ErrorDisplay { message: err.clone() }
            }

            if *state.loading.read() {
                LoadingSpinner {}
            } else {
                div {
                    style: "display: flex; gap: 16px; align-items: flex-start;",

                    // Sidebar: filters and export
                    div {
                        style: "flex: 0 0 260px;",
                        CountrySelector {}
                        DateRangePicker {}
                        AnalysisSelector {}
                        AdvancedOptions {}
                        button {
                            style: "margin-top: 8px; padding: 6px 12px; cursor: pointer; border: 1px solid #1f4e79; border-radius: 4px; background: #fff; color: #1f4e79; font-size: 13px;",
                            onclick: move |_| {
                                let selected = state.selected_countries.read().clone();
                                let start = (state.start_date)();
                                let end = (state.end_date)();
                                let csv = figures::export_csv(OBSERVATIONS_CSV, &selected, &start, &end);
                                js_bridge::download_csv(
                                    &format!("covid_data_{}_{}.csv", start, end),
                                    &csv,
                                );
                            },
                            "Download filtered CSV"
                        }
                    }

                    // Main area: summary cards, notices and charts
                    div {
                        style: "flex: 1; min-width: 0;",

                        if let Some(s) = summary.read().clone() {
                            div {
                                style: "display: flex; gap: 12px; flex-wrap: wrap; margin-bottom: 12px;",
                                MetricCard {
                                    label: "Total Cases".to_string(),
                                    value: figures::format_count(s.total_cases),
                                }
                                MetricCard {
                                    label: "Total Deaths".to_string(),
                                    value: figures::format_count(s.total_deaths),
                                    delta: s
                                        .case_fatality_rate
                                        .map(|r| format!("CFR: {:.2}%", r))
                                        .unwrap_or_default(),
                                }
                                MetricCard {
                                    label: "Vaccination Coverage".to_string(),
                                    value: s
                                        .mean_vaccination_rate
                                        .map(|r| format!("{:.1}%", r))
                                        .unwrap_or_else(|| "n/a".to_string()),
                                    delta: "mean of selected countries".to_string(),
                                }
                                MetricCard {
                                    label: "Countries Analyzed".to_string(),
                                    value: s.countries_analyzed.to_string(),
                                }
                            }
                        }

                        if let Some(msg) = notice.read().as_ref() {
                            p {
                                style: "padding: 10px 14px; background: #FFF8E1; border: 1px solid #FFE082; border-radius: 4px; font-size: 13px; color: #795548;",
                                "{msg}"
                            }
                        }

                        if mode == AnalysisMode::Overview {
                            ChartHeader {
                                title: "Total Cases".to_string(),
                                unit_description: unit_desc.clone(),
                            }
                            ChartContainer { id: OVERVIEW_TOTAL_CHART.to_string(), min_height: 440 }
                            ChartHeader {
                                title: "Daily New Cases".to_string(),
                                unit_description: unit_desc.clone(),
                            }
                            ChartContainer { id: OVERVIEW_NEW_CHART.to_string(), min_height: 440 }
                        }
                        if mode == AnalysisMode::CasesDeaths {
                            ChartContainer { id: CASES_DEATHS_GRID.to_string(), min_height: 520 }
                        }
                        if mode == AnalysisMode::Hospitalizations {
                            ChartContainer { id: HOSPITALIZATION_GRID.to_string(), min_height: 520 }
                        }
                        if mode == AnalysisMode::Vaccinations {
                            ChartContainer { id: VACCINATION_GRID.to_string(), min_height: 520 }
                        }
                        if mode == AnalysisMode::Correlation {
                            ChartHeader {
                                title: "Daily New Cases vs New Deaths".to_string(),
                                unit_description: "raw daily counts; one color per country".to_string(),
                            }
                            ChartContainer { id: CORRELATION_CHART.to_string(), min_height: 460 }
                        }
                    }
                }

                p {
                    style: "font-size: 11px; color: #888; text-align: center; margin-top: 12px;",
                    "Synthetic demonstration dataset generated from a fixed seed; not real case counts."
                }
            }
        }
    }
}

/// User-facing message when a view has no rows to draw.
fn empty_notice(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Hospitalizations => {
            "No hospitalization data reported for the selected countries and date range."
        }
        AnalysisMode::Vaccinations => {
            "No vaccination data in the selected range; reporting begins in 2021."
        }
        _ => "No data available for the selected countries and date range.",
    }
}

/// Query and render the active analysis view. Returns whether any data
/// was drawn.
fn render_charts(
    db: &Database,
    countries: &[CountryInfo],
    selected: &[String],
    start: &str,
    end: &str,
    mode: AnalysisMode,
    options: ChartOptions,
) -> anyhow::Result<bool> {
    match mode {
        AnalysisMode::Overview => render_overview(db, countries, selected, start, end, options),
        AnalysisMode::CasesDeaths => {
            render_cases_deaths(db, countries, selected, start, end, options)
        }
        AnalysisMode::Hospitalizations => {
            render_hospitalizations(db, countries, selected, start, end, options)
        }
        AnalysisMode::Vaccinations => {
            render_vaccinations(db, countries, selected, start, end, options)
        }
        AnalysisMode::Correlation => render_correlation(db, countries, selected, start, end),
    }
}

fn axis_label(base: &str, options: ChartOptions) -> String {
    if options.per_capita {
        format!("{} per 100k", base)
    } else {
        base.to_string()
    }
}

fn render_overview(
    db: &Database,
    countries: &[CountryInfo],
    selected: &[String],
    start: &str,
    end: &str,
    options: ChartOptions,
) -> anyhow::Result<bool> {
    let total_cases = db.query_metric_histories(selected, Metric::TotalCases, start, end)?;
    let new_cases = db.query_metric_histories(selected, Metric::NewCases, start, end)?;
    if total_cases.is_empty() && new_cases.is_empty() {
        js_bridge::destroy_chart(OVERVIEW_TOTAL_CHART);
        js_bridge::destroy_chart(OVERVIEW_NEW_CHART);
        return Ok(false);
    }

    // Smoothing only applies to the daily series; the log-scale toggle
    // only to the cumulative one.
    let charts = [
        (OVERVIEW_TOTAL_CHART, "Total Cases", &total_cases, false, options.log_scale),
        (OVERVIEW_NEW_CHART, "Daily New Cases", &new_cases, options.smooth, false),
    ];
    for (container, title, rows, smooth, log_scale) in charts {
        let data = figures::metric_series(rows, countries, options.per_capita, smooth);
        let config = serde_json::json!({
            "title": title,
            "yAxisLabel": axis_label("Cases", options),
            "logScale": log_scale,
        });
        js_bridge::render_multi_line_chart(
            container,
            &serde_json::to_string(&data).unwrap_or_default(),
            &config.to_string(),
        );
    }
    Ok(true)
}

fn render_cases_deaths(
    db: &Database,
    countries: &[CountryInfo],
    selected: &[String],
    start: &str,
    end: &str,
    options: ChartOptions,
) -> anyhow::Result<bool> {
    let total_cases = db.query_metric_histories(selected, Metric::TotalCases, start, end)?;
    let new_cases = db.query_metric_histories(selected, Metric::NewCases, start, end)?;
    let total_deaths = db.query_metric_histories(selected, Metric::TotalDeaths, start, end)?;
    if total_cases.is_empty() && new_cases.is_empty() && total_deaths.is_empty() {
        js_bridge::destroy_chart(CASES_DEATHS_GRID);
        return Ok(false);
    }

    let data = serde_json::json!({
        "total_cases": figures::metric_series(&total_cases, countries, options.per_capita, false),
        "new_cases": figures::metric_series(&new_cases, countries, options.per_capita, options.smooth),
        "total_deaths": figures::metric_series(&total_deaths, countries, options.per_capita, false),
        // CFR is already a ratio; per-capita and smoothing do not apply
        "cfr": figures::ratio_series(&total_deaths, &total_cases, countries),
    });
    let new_cases_title = if options.smooth {
        "Daily New Cases (7-day avg)"
    } else {
        "Daily New Cases"
    };
    let unit = if options.per_capita { "per 100k" } else { "" };
    let config = serde_json::json!({
        "title": "Cases & Deaths",
        "panels": [
            {"key": "total_cases", "title": "Total Cases", "logScale": options.log_scale, "unit": unit},
            {"key": "new_cases", "title": new_cases_title, "unit": unit},
            {"key": "total_deaths", "title": "Total Deaths", "logScale": options.log_scale, "unit": unit},
            {"key": "cfr", "title": "Case Fatality Rate", "unit": "%"},
        ],
    });
    js_bridge::render_panel_grid(CASES_DEATHS_GRID, &data.to_string(), &config.to_string());
    Ok(true)
}

fn render_hospitalizations(
    db: &Database,
    countries: &[CountryInfo],
    selected: &[String],
    start: &str,
    end: &str,
    options: ChartOptions,
) -> anyhow::Result<bool> {
    let hosp = db.query_metric_histories(selected, Metric::HospPatients, start, end)?;
    let icu = db.query_metric_histories(selected, Metric::IcuPatients, start, end)?;
    if hosp.is_empty() && icu.is_empty() {
        js_bridge::destroy_chart(HOSPITALIZATION_GRID);
        return Ok(false);
    }
    let new_cases = db.query_metric_histories(selected, Metric::NewCases, start, end)?;

    let data = serde_json::json!({
        "hosp": figures::metric_series(&hosp, countries, options.per_capita, options.smooth),
        "icu": figures::metric_series(&icu, countries, options.per_capita, options.smooth),
        "hosp_rate": figures::ratio_series(&hosp, &new_cases, countries),
        "icu_rate": figures::ratio_series(&icu, &hosp, countries),
    });
    let unit = if options.per_capita { "per 100k" } else { "" };
    let config = serde_json::json!({
        "title": "Hospitalizations",
        "panels": [
            {"key": "hosp", "title": "Hospital Patients", "unit": unit},
            {"key": "icu", "title": "ICU Patients", "unit": unit},
            {"key": "hosp_rate", "title": "Hospitalization Rate (of new cases)", "unit": "%"},
            {"key": "icu_rate", "title": "ICU Rate (of hospital patients)", "unit": "%"},
        ],
    });
    js_bridge::render_panel_grid(HOSPITALIZATION_GRID, &data.to_string(), &config.to_string());
    Ok(true)
}

fn render_vaccinations(
    db: &Database,
    countries: &[CountryInfo],
    selected: &[String],
    start: &str,
    end: &str,
    options: ChartOptions,
) -> anyhow::Result<bool> {
    let total = db.query_metric_histories(selected, Metric::TotalVaccinations, start, end)?;
    let fully = db.query_metric_histories(selected, Metric::PeopleFullyVaccinated, start, end)?;
    if total.is_empty() && fully.is_empty() {
        js_bridge::destroy_chart(VACCINATION_GRID);
        return Ok(false);
    }

    let data = serde_json::json!({
        "total_vacc": figures::metric_series(&total, countries, options.per_capita, false),
        "fully": figures::metric_series(&fully, countries, options.per_capita, false),
        "coverage": figures::percent_of_population_series(&fully, countries),
    });
    let dose_unit = if options.per_capita { "per 100k" } else { "doses" };
    let people_unit = if options.per_capita { "per 100k" } else { "people" };
    let config = serde_json::json!({
        "title": "Vaccinations",
        "panels": [
            {"key": "total_vacc", "title": "Total Vaccinations", "logScale": options.log_scale, "unit": dose_unit},
            {"key": "fully", "title": "People Fully Vaccinated", "unit": people_unit},
            {"key": "coverage", "title": "Full Vaccination Coverage", "unit": "%"},
        ],
    });
    js_bridge::render_panel_grid(VACCINATION_GRID, &data.to_string(), &config.to_string());
    Ok(true)
}

fn render_correlation(
    db: &Database,
    countries: &[CountryInfo],
    selected: &[String],
    start: &str,
    end: &str,
) -> anyhow::Result<bool> {
    let mut pairs = Vec::new();
    for iso in selected {
        let samples = db.query_metric_pairs(iso, Metric::NewCases, Metric::NewDeaths, start, end)?;
        if !samples.is_empty() {
            pairs.push((figures::display_name(countries, iso), samples));
        }
    }
    if pairs.is_empty() {
        js_bridge::destroy_chart(CORRELATION_CHART);
        return Ok(false);
    }

    let (points, captions) = figures::scatter_data(&pairs);
    let config = serde_json::json!({
        "title": "Daily New Cases vs New Deaths",
        "xLabel": "New cases",
        "yLabel": "New deaths",
        "captions": captions,
    });
    js_bridge::render_scatter_chart(
        CORRELATION_CHART,
        &serde_json::to_string(&points).unwrap_or_default(),
        &config.to_string(),
    );
    Ok(true)
}
