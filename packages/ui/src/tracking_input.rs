//! Search form for one or more comma-separated tracking numbers.

use dioxus::prelude::*;

use crate::icons::{FaMagnifyingGlass, FaSpinner};
use crate::Icon;

#[component]
pub fn TrackingInput(on_search: EventHandler<String>, loading: bool) -> Element {
    let mut value = use_signal(String::new);

    let handle_submit = move |evt: FormEvent| {
        evt.prevent_default();
        let input = value().trim().to_string();
        if !input.is_empty() && !loading {
            on_search.call(input);
        }
    };

    rsx! {
        div {
            class: "tracking-input",

            div {
                class: "tracking-input__intro",
                h1 { "Track your shipment" }
                p { "Enter one or more tracking numbers, separated by commas" }
            }

            form {
                class: "tracking-input__form",
                onsubmit: handle_submit,

                span {
                    class: "tracking-input__icon",
                    Icon { icon: FaMagnifyingGlass, width: 20, height: 20 }
                }
                input {
                    r#type: "text",
                    value: value(),
                    placeholder: "Enter tracking number (e.g., 3543264550)",
                    disabled: loading,
                    oninput: move |evt| value.set(evt.value()),
                }
                button {
                    r#type: "submit",
                    class: "primary",
                    disabled: loading || value().trim().is_empty(),
                    if loading {
                        Icon { icon: FaSpinner, width: 16, height: 16, class: "spin" }
                        span { "Tracking..." }
                    } else {
                        "Track"
                    }
                }
            }
        }
    }
}
