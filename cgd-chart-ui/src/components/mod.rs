//! Reusable Dioxus RSX components for CGD dashboard apps.

mod advanced_options;
mod analysis_selector;
mod chart_container;
mod chart_header;
mod country_selector;
mod date_range_picker;
mod error_display;
mod loading_spinner;
mod metric_card;

pub use advanced_options::AdvancedOptions;
pub use analysis_selector::AnalysisSelector;
pub use chart_container::ChartContainer;
pub use chart_header::ChartHeader;
pub use country_selector::CountrySelector;
pub use date_range_picker::DateRangePicker;
pub use error_display::ErrorDisplay;
pub use loading_spinner::LoadingSpinner;
pub use metric_card::MetricCard;
