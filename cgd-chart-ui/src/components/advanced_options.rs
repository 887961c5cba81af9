//! Advanced display option checkboxes.

use crate::state::AppState;
use dioxus::prelude::*;

/// Per-capita, moving-average and log-scale toggles.
#[component]
pub fn AdvancedOptions() -> Element {
    let mut state = use_context::<AppState>();
    let per_capita = (state.per_capita)();
    let moving_average = (state.moving_average)();
    let log_scale = (state.log_scale)();

    rsx! {
        div {
            style: "margin: 8px 0; padding: 8px; background: #fafafa; border: 1px solid #e0e0e0; border-radius: 4px;",
            p {
                style: "font-weight: bold; margin: 0 0 4px 0; font-size: 13px;",
                "Advanced options"
            }
            label {
                style: "display: block; font-size: 13px; padding: 2px 0; cursor: pointer;",
                input {
                    r#type: "checkbox",
                    checked: per_capita,
                    style: "margin-right: 6px;",
                    onchange: move |_| state.per_capita.set(!per_capita),
                }
                "Show per capita metrics"
            }
            label {
                style: "display: block; font-size: 13px; padding: 2px 0; cursor: pointer;",
                input {
                    r#type: "checkbox",
                    checked: moving_average,
                    style: "margin-right: 6px;",
                    onchange: move |_| state.moving_average.set(!moving_average),
                }
                "Apply 7-day moving average"
            }
            label {
                style: "display: block; font-size: 13px; padding: 2px 0; cursor: pointer;",
                input {
                    r#type: "checkbox",
                    checked: log_scale,
                    style: "margin-right: 6px;",
                    onchange: move |_| state.log_scale.set(!log_scale),
                }
                "Use logarithmic scale for large numbers"
            }
        }
    }
}
