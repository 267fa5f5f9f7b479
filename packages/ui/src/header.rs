use dioxus::prelude::*;

use crate::auth::{use_auth, LogoutButton};
use crate::icons::FaTruckFast;
use crate::Icon;

/// Top bar with the brand and, once signed in, the user and a sign-out button.
#[component]
pub fn Header() -> Element {
    let auth = use_auth();

    rsx! {
        header {
            class: "app-header",
            div {
                class: "app-header__brand",
                Icon { icon: FaTruckFast, width: 28, height: 28 }
                span { "Dynapro Tracking" }
            }
            if let Some(user) = auth().user {
                div {
                    class: "app-header__user",
                    span { class: "app-header__email", {user.display_name()} }
                    LogoutButton { class: "ghost" }
                }
            }
        }
    }
}
