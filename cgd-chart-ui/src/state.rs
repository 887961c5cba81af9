//! Application state managed via Dioxus context.
//!
//! `AppState` bundles all reactive signals into a single struct provided via
//! `use_context_provider`. Child components retrieve it with `use_context::<AppState>()`.

use cgd_core::analysis::AnalysisMode;
use cgd_db::models::CountryInfo;
use cgd_db::Database;
use dioxus::prelude::*;

/// Maximum number of simultaneously selected countries.
///
/// More than a handful of lines makes the multi-line charts unreadable
/// and slows WASM-side re-rendering, so the selector enforces a cap.
pub const MAX_SELECTED_COUNTRIES: usize = 5;

/// Shared application state for all CGD dashboard apps.
#[derive(Clone, Copy)]
pub struct AppState {
    /// Database instance (None until loaded)
    pub db: Signal<Option<Database>>,
    /// Whether the app is still loading
    pub loading: Signal<bool>,
    /// Error message if something went wrong
    pub error_msg: Signal<Option<String>>,
    /// Available countries
    pub countries: Signal<Vec<CountryInfo>>,
    /// Currently selected country ISO codes (multi-select, capped)
    pub selected_countries: Signal<Vec<String>>,
    /// Start date for date range filtering (YYYY-MM-DD)
    pub start_date: Signal<String>,
    /// End date for date range filtering (YYYY-MM-DD)
    pub end_date: Signal<String>,
    /// Earliest observation date in the dataset (YYYY-MM-DD), bounds the picker
    pub min_date: Signal<String>,
    /// Latest observation date in the dataset (YYYY-MM-DD), bounds the picker
    pub max_date: Signal<String>,
    /// Primary analysis focus
    pub analysis_mode: Signal<AnalysisMode>,
    /// Show per-capita metrics instead of raw counts
    pub per_capita: Signal<bool>,
    /// Apply a 7-day moving average to daily series
    pub moving_average: Signal<bool>,
    /// Use a logarithmic scale for cumulative panels
    pub log_scale: Signal<bool>,
}

impl AppState {
    /// Create a new AppState with default signal values.
    ///
    /// Defaults match the original dashboard: moving average and
    /// per-capita on, log scale off, Overview mode.
    pub fn new() -> Self {
        Self {
            db: Signal::new(None),
            loading: Signal::new(true),
            error_msg: Signal::new(None),
            countries: Signal::new(Vec::new()),
            selected_countries: Signal::new(Vec::new()),
            start_date: Signal::new(String::new()),
            end_date: Signal::new(String::new()),
            min_date: Signal::new(String::new()),
            max_date: Signal::new(String::new()),
            analysis_mode: Signal::new(AnalysisMode::Overview),
            per_capita: Signal::new(true),
            moving_average: Signal::new(true),
            log_scale: Signal::new(false),
        }
    }
}
