//! Dropdown selector for the primary analysis focus.

use crate::state::AppState;
use cgd_core::analysis::AnalysisMode;
use dioxus::prelude::*;
use std::str::FromStr;

/// Analysis mode dropdown.
///
/// Options come from `AnalysisMode::ALL`; the selected value is parsed
/// back through `FromStr`, so an unknown option string is ignored.
#[component]
pub fn AnalysisSelector() -> Element {
    let mut state = use_context::<AppState>();
    let current = (state.analysis_mode)();

    let on_change = move |evt: Event<FormData>| {
        if let Ok(mode) = AnalysisMode::from_str(&evt.value()) {
            state.analysis_mode.set(mode);
        }
    };

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                r#for: "analysis-select",
                style: "font-weight: bold; margin-right: 8px;",
                "Primary focus: "
            }
            select {
                id: "analysis-select",
                onchange: on_change,
                for mode in AnalysisMode::ALL {
                    option {
                        value: "{mode}",
                        selected: mode == current,
                        "{mode.label()}"
                    }
                }
            }
        }
    }
}
