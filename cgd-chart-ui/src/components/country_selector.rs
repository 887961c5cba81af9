//! Multi-select checkbox list for choosing countries.

use crate::state::{AppState, MAX_SELECTED_COUNTRIES};
use dioxus::prelude::*;

/// Country multi-select.
///
/// Reads available countries from AppState and toggles membership in
/// `selected_countries` on change. Selection is capped at
/// [`MAX_SELECTED_COUNTRIES`]; further checkboxes are disabled until
/// something is deselected.
#[component]
pub fn CountrySelector() -> Element {
    let mut state = use_context::<AppState>();
    let countries = state.countries.read().clone();
    let selected = state.selected_countries.read().clone();
    let at_cap = selected.len() >= MAX_SELECTED_COUNTRIES;

    rsx! {
        div {
            style: "margin: 8px 0;",
            label {
                style: "font-weight: bold; display: block; margin-bottom: 4px;",
                "Countries ({selected.len()}/{MAX_SELECTED_COUNTRIES}):"
            }
            div {
                style: "max-height: 220px; overflow-y: auto; border: 1px solid #e0e0e0; border-radius: 4px; padding: 4px 8px;",
                for country in countries.iter() {
                    {
                        let iso = country.iso_code.clone();
                        let is_selected = selected.contains(&iso);
                        let disabled = at_cap && !is_selected;
                        rsx! {
                            label {
                                key: "{iso}",
                                style: if disabled {
                                    "display: block; font-size: 13px; padding: 2px 0; color: #aaa;"
                                } else {
                                    "display: block; font-size: 13px; padding: 2px 0; cursor: pointer;"
                                },
                                input {
                                    r#type: "checkbox",
                                    checked: is_selected,
                                    disabled,
                                    style: "margin-right: 6px;",
                                    onchange: move |_| {
                                        let mut current = state.selected_countries.read().clone();
                                        if let Some(pos) = current.iter().position(|c| c == &iso) {
                                            current.remove(pos);
                                        } else if current.len() < MAX_SELECTED_COUNTRIES {
                                            current.push(iso.clone());
                                        }
                                        state.selected_countries.set(current);
                                    },
                                }
                                "{country.name} ({country.iso_code})"
                            }
                        }
                    }
                }
            }
        }
    }
}
