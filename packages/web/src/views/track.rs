use dioxus::prelude::*;
use ui::views::TrackerView;
use ui::use_auth;

use crate::Route;

/// Tracker page. Signed-out visitors are sent to the login page.
#[component]
pub fn Track() -> Element {
    let auth = use_auth();
    let nav = use_navigator();

    use_effect(move || {
        if !auth().loading && auth().user.is_none() {
            nav.replace(Route::Login {
                error: String::new(),
            });
        }
    });

    if auth().user.is_none() {
        return rsx! {
            div { class: "page-loading", "Loading..." }
        };
    }

    rsx! {
        TrackerView {}
    }
}
