use dioxus::prelude::*;

use crate::auth::{use_auth, LoginButton};
use crate::icons::FaRightToBracket;
use crate::Icon;

/// Sign-in card. `notice` is an error forwarded by the OAuth callback.
#[component]
pub fn LoginView(#[props(default)] notice: Option<String>) -> Element {
    let auth = use_auth();
    let state = auth();

    let domain = if state.allowed_domain.is_empty() {
        "company".to_string()
    } else {
        format!("@{}", state.allowed_domain)
    };
    let error = state.error.clone().or(notice);

    rsx! {
        div {
            class: "login",
            div {
                class: "login__card",
                div {
                    class: "login__emblem",
                    Icon { icon: FaRightToBracket, width: 36, height: 36 }
                }
                h1 { "Tracking System" }
                p {
                    class: "login__hint",
                    "Please sign in with your "
                    strong { "{domain}" }
                    " account to access the platform."
                }

                if let Some(error) = error {
                    div { class: "error-banner", role: "alert", "{error}" }
                }

                LoginButton {
                    provider: "google",
                    label: "Sign in with Google",
                    class: "login__button",
                }
            }

            footer {
                class: "app-footer",
                "© Dynapro Logistics. All rights reserved."
            }
        }
    }
}
