//! Login page view.

use dioxus::prelude::*;
use ui::views::LoginView;
use ui::use_auth;

use crate::Route;

/// Message for an error code set by the OAuth callback.
///
/// A domain rejection is reported by the auth state itself.
fn callback_notice(code: &str) -> Option<String> {
    match code {
        "" | "domain" => None,
        "cancelled" => Some("Sign-in was cancelled.".to_string()),
        _ => Some("Sign-in failed. Please try again.".to_string()),
    }
}

#[component]
pub fn Login(error: String) -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        if !auth().loading && auth().user.is_some() {
            nav.replace(Route::Track {});
        }
    });

    rsx! {
        LoginView { notice: callback_notice(&error) }
    }
}
