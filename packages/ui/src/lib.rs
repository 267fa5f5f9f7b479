//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_brands_icons::FaGoogle;
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod views;

mod auth;
pub use auth::{use_auth, AuthProvider, AuthState, LoginButton, LogoutButton};

mod header;
pub use header::Header;

mod tracking_input;
pub use tracking_input::TrackingInput;

mod timeline;
pub use timeline::Timeline;

mod tracking_card;
pub use tracking_card::TrackingCard;

mod carousel;
pub use carousel::ResultCarousel;

mod feedback;
pub use feedback::FeedbackWidget;
