use dioxus::prelude::*;
use tracking::{eta_label, StatusTone, TrackingData};

use crate::icons::{FaBoxOpen, FaCalendar, FaLocationDot, FaTruck};
use crate::{Icon, Timeline};

/// Summary header and checkpoint timeline of one shipment.
#[component]
pub fn TrackingCard(data: TrackingData) -> Element {
    let tone = StatusTone::from_status(&data.status_detail);
    let tone = tone.class();
    let eta = eta_label(&data.eta);

    rsx! {
        article {
            class: "tracking-card {tone}",

            header {
                class: "tracking-card__header",

                div {
                    class: "tracking-card__title",
                    div {
                        p { class: "label", "Tracking Number" }
                        h2 { class: "mono", "{data.tracking_number}" }
                    }
                    span {
                        class: "status-badge {tone}",
                        span { class: "status-badge__dot" }
                        "{data.status_detail}"
                    }
                }

                div {
                    class: "tracking-card__facts",
                    div {
                        class: "fact",
                        Icon { icon: FaTruck, width: 18, height: 18 }
                        div {
                            p { class: "label", "Carrier" }
                            p { class: "fact__value capitalize", "{data.courier_slug}" }
                        }
                    }
                    div {
                        class: "fact",
                        Icon { icon: FaCalendar, width: 18, height: 18 }
                        div {
                            p { class: "label", "Estimated Delivery" }
                            p { class: "fact__value", "{eta}" }
                        }
                    }
                    div {
                        class: "fact",
                        Icon { icon: FaLocationDot, width: 18, height: 18 }
                        div {
                            p { class: "label", "Last Location" }
                            p {
                                class: "fact__value truncate",
                                title: "{data.last_location}",
                                "{data.last_location}"
                            }
                        }
                    }
                }
            }

            section {
                class: "tracking-card__progress",
                h3 {
                    Icon { icon: FaBoxOpen, width: 18, height: 18 }
                    "Shipment Progress"
                }
                Timeline { checkpoints: data.raw_checkpoints.clone() }
            }
        }
    }
}
