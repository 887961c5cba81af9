//! Summary metric card (value + delta caption).

use dioxus::prelude::*;

#[derive(Props, Clone, PartialEq)]
pub struct MetricCardProps {
    /// Card label (e.g. "Total Cases")
    pub label: String,
    /// Main value, pre-formatted
    pub value: String,
    /// Secondary caption below the value
    #[props(default = String::new())]
    pub delta: String,
}

/// A key-figure card shown in the summary row at the top of the dashboard.
#[component]
pub fn MetricCard(props: MetricCardProps) -> Element {
    rsx! {
        div {
            style: "flex: 1; min-width: 140px; background: #f0f2f6; padding: 12px 16px; border-radius: 6px; border-left: 4px solid #1f4e79;",
            p {
                style: "margin: 0; font-size: 12px; color: #666;",
                "{props.label}"
            }
            p {
                style: "margin: 4px 0 0 0; font-size: 22px; font-weight: bold; color: #1f4e79;",
                "{props.value}"
            }
            if !props.delta.is_empty() {
                p {
                    style: "margin: 2px 0 0 0; font-size: 11px; color: #888;",
                    "{props.delta}"
                }
            }
        }
    }
}
