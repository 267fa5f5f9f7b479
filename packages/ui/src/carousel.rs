//! Stacked-card carousel over the results of one search.
//!
//! The active card sits in front; the others fan out sideways, smaller and dimmed.
//! Clicking any card, an arrow or an indicator dot changes the active card. Only
//! the active card's contents take pointer events.

use dioxus::prelude::*;
use tracking::{Carousel, TrackingData};

use crate::icons::{FaChevronLeft, FaChevronRight};
use crate::{Icon, TrackingCard};

#[component]
pub fn ResultCarousel(results: Vec<TrackingData>, carousel: Signal<Carousel>) -> Element {
    let mut carousel = carousel;
    let state = carousel();

    rsx! {
        div {
            class: "carousel",

            div {
                class: "carousel__stack",
                for (index, data) in results.into_iter().enumerate() {
                    div {
                        key: "{data.tracking_number}-{index}",
                        class: "carousel__slot",
                        style: state.placement(index).css(),
                        onclick: move |_| carousel.write().select(index),

                        div {
                            class: if state.active() == index { "carousel__card carousel__card--active" } else { "carousel__card" },
                            TrackingCard { data: data.clone() }
                        }
                    }
                }
            }

            if state.shows_navigation() {
                button {
                    class: "carousel__arrow carousel__arrow--prev",
                    disabled: !state.has_prev(),
                    onclick: move |_| carousel.write().prev(),
                    Icon { icon: FaChevronLeft, width: 20, height: 20 }
                }
                button {
                    class: "carousel__arrow carousel__arrow--next",
                    disabled: !state.has_next(),
                    onclick: move |_| carousel.write().next(),
                    Icon { icon: FaChevronRight, width: 20, height: 20 }
                }
                div {
                    class: "carousel__dots",
                    for index in 0..state.len() {
                        button {
                            key: "{index}",
                            class: if state.active() == index { "carousel__dot carousel__dot--active" } else { "carousel__dot" },
                            aria_label: format!("Go to slide {}", index + 1),
                            onclick: move |_| carousel.write().select(index),
                        }
                    }
                }
            }
        }
    }
}
