//! Checkpoint history of one shipment, newest first.

use dioxus::prelude::*;
use tracking::{timeline, Checkpoint, CheckpointIcon};

use crate::icons::{FaBox, FaCircleCheck, FaClock, FaLocationDot, FaTruck};
use crate::Icon;

#[component]
fn CheckpointGlyph(icon: CheckpointIcon) -> Element {
    match icon {
        CheckpointIcon::Delivered => rsx! { Icon { icon: FaCircleCheck, width: 18, height: 18 } },
        CheckpointIcon::InTransit => rsx! { Icon { icon: FaTruck, width: 18, height: 18 } },
        CheckpointIcon::PickedUp => rsx! { Icon { icon: FaBox, width: 18, height: 18 } },
        CheckpointIcon::Exception => rsx! { Icon { icon: FaClock, width: 18, height: 18 } },
        CheckpointIcon::Pin => rsx! { Icon { icon: FaLocationDot, width: 18, height: 18 } },
    }
}

#[component]
pub fn Timeline(checkpoints: Vec<Checkpoint>) -> Element {
    let entries = timeline(&checkpoints);

    if entries.is_empty() {
        return rsx! {
            p { class: "timeline__empty", "No checkpoints reported yet." }
        };
    }

    rsx! {
        ol {
            class: "timeline",
            for (index, entry) in entries.into_iter().enumerate() {
                li {
                    key: "{index}",
                    class: if entry.latest { "timeline__item timeline__item--latest" } else { "timeline__item" },

                    span {
                        class: "timeline__marker",
                        CheckpointGlyph { icon: entry.icon }
                    }
                    div {
                        class: "timeline__body",
                        div {
                            class: "timeline__heading",
                            span { class: "timeline__message", "{entry.message}" }
                            time { class: "timeline__time", "{entry.time_label}" }
                        }
                        div {
                            class: "timeline__location",
                            Icon { icon: FaLocationDot, width: 12, height: 12 }
                            span { "{entry.location_label}" }
                        }
                    }
                }
            }
        }
    }
}
