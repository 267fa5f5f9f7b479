use dioxus::prelude::*;
use tracking::{Carousel, SearchPhase, SearchState};

use crate::icons::{FaArrowLeft, FaTruck};
use crate::{FeedbackWidget, Header, Icon, ResultCarousel, TrackingInput};

/// The signed-in tracker: search form, then the result carousel.
///
/// Only the outcome of the latest search is shown. Starting a new search or going
/// back to the form makes any lookup still in flight stale.
#[component]
pub fn TrackerView() -> Element {
    let mut search = use_signal(SearchState::default);
    let mut carousel = use_signal(|| Carousel::new(0));

    let handle_search = move |input: String| {
        let ticket = search.write().begin();
        spawn(async move {
            let outcome = api::track_shipments(input)
                .await
                .map_err(|e| e.to_string());
            let applied = search.write().complete(ticket, outcome);
            if applied {
                let found = search.read().results().map(<[_]>::len);
                if let Some(len) = found {
                    carousel.set(Carousel::new(len));
                }
            }
        });
    };

    let phase = search.read().phase().clone();

    rsx! {
        div {
            class: "tracker",
            Header {}

            main {
                class: "tracker__main",
                match phase {
                    SearchPhase::Found(results) => rsx! {
                        div {
                            class: "tracker__results",
                            button {
                                class: "back-button",
                                onclick: move |_| search.write().clear(),
                                Icon { icon: FaArrowLeft, width: 14, height: 14 }
                                span { "Track another" }
                            }
                            ResultCarousel { results, carousel }
                        }
                    },
                    other => rsx! {
                        div {
                            class: "tracker__search",
                            div {
                                class: "tracker__emblem",
                                Icon { icon: FaTruck, width: 72, height: 72 }
                            }
                            if let SearchPhase::Failed(message) = &other {
                                div { class: "error-banner", role: "alert", "{message}" }
                            }
                            TrackingInput {
                                on_search: handle_search,
                                loading: other == SearchPhase::Loading,
                            }
                        }
                    },
                }
            }

            FeedbackWidget {}

            footer {
                class: "app-footer",
                "© Dynapro Tracking System. All rights reserved."
            }
        }
    }
}
