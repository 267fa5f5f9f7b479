//! Labels and tones for the header of a tracking card.

use crate::timeline::parse_timestamp;

const ETA_FORMAT: &str = "%b %-d, %Y";

/// Colour family of a shipment's status badge and card glow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Delivered,
    Problem,
    Active,
}

impl StatusTone {
    /// Classify a carrier status detail such as `"Delivered"` or `"Exception - returned"`.
    pub fn from_status(status: &str) -> Self {
        let status = status.to_lowercase();
        if status == "delivered" {
            StatusTone::Delivered
        } else if ["exception", "returned", "failure"]
            .iter()
            .any(|bad| status.contains(bad))
        {
            StatusTone::Problem
        } else {
            StatusTone::Active
        }
    }

    /// CSS modifier used by the stylesheet.
    pub fn class(&self) -> &'static str {
        match self {
            StatusTone::Delivered => "tone-delivered",
            StatusTone::Problem => "tone-problem",
            StatusTone::Active => "tone-active",
        }
    }
}

/// Estimated delivery: `"Pending"` when unknown, a date when parseable, else verbatim.
pub fn eta_label(eta: &str) -> String {
    if eta.is_empty() {
        return "Pending".to_string();
    }
    match parse_timestamp(eta) {
        Some(parsed) => parsed.format(ETA_FORMAT).to_string(),
        None => eta.to_string(),
    }
}
