//! # Wire models returned by the tracking webhook
//!
//! These types mirror the JSON the resolution endpoint produces, key for key, so they
//! can be deserialized straight from the webhook response and sent on to the client
//! through Dioxus server functions unchanged.
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`TrackingData`] | One resolved shipment: carrier, status, ETA and its raw checkpoints. |
//! | [`Checkpoint`] | A single timestamped event in the shipment history. |
//! | [`Coordinate`] | Optional latitude/longitude attached to a checkpoint. |
//! | [`CheckpointEvent`] | Carrier event code with an optional reason. |
//!
//! Every struct carries `#[serde(default)]`: the webhook omits keys it has no value
//! for, and a missing key must not turn a usable shipment into a failed lookup.

use serde::{Deserialize, Serialize};

/// Geographic position of a checkpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Carrier-specific event attached to a checkpoint.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckpointEvent {
    pub code: String,
    pub reason: Option<String>,
}

/// One tracking event.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Checkpoint {
    /// Event time as sent by the carrier. Usually RFC 3339, but not guaranteed.
    pub checkpoint_time: String,
    pub city: Option<String>,
    pub coordinate: Option<Coordinate>,
    pub country_region: Option<String>,
    pub country_region_name: Option<String>,
    pub created_at: String,
    pub events: Vec<CheckpointEvent>,
    pub location: Option<String>,
    pub message: String,
    pub postal_code: Option<String>,
    pub raw_tag: Option<String>,
    pub slug: String,
    pub source: String,
    pub state: Option<String>,
    pub subtag: String,
    pub subtag_message: String,
    /// Classification: `Delivered`, `InTransit`, `PickedUp`, `Exception`, ...
    pub tag: String,
}

/// The resolved state of one tracking number.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingData {
    pub tracking_number: String,
    pub courier_slug: String,
    pub status: String,
    pub status_detail: String,
    pub last_location: String,
    pub last_update: String,
    pub eta: String,
    pub raw_checkpoints: Vec<Checkpoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_webhook_payload() {
        let json = r#"{
            "tracking_number": "3543264550",
            "courier_slug": "dhl",
            "status": "InTransit",
            "status_detail": "In transit",
            "last_location": "Leipzig, DE",
            "last_update": "2024-05-02T10:00:00Z",
            "eta": "2024-05-04",
            "raw_checkpoints": [{
                "checkpoint_time": "2024-05-02T10:00:00+02:00",
                "city": "Leipzig",
                "coordinate": { "latitude": 51.34, "longitude": 12.37 },
                "country_region": "DEU",
                "country_region_name": "Germany",
                "created_at": "2024-05-02T08:05:00Z",
                "events": [{ "code": "PT", "reason": null }],
                "location": null,
                "message": "Processed at hub",
                "postal_code": null,
                "raw_tag": "PT",
                "slug": "dhl",
                "source": "carrier",
                "state": null,
                "subtag": "InTransit_001",
                "subtag_message": "In transit",
                "tag": "InTransit"
            }]
        }"#;

        let data: TrackingData = serde_json::from_str(json).unwrap();
        assert_eq!(data.tracking_number, "3543264550");
        assert_eq!(data.raw_checkpoints.len(), 1);

        let checkpoint = &data.raw_checkpoints[0];
        assert_eq!(checkpoint.city.as_deref(), Some("Leipzig"));
        assert_eq!(checkpoint.events[0].code, "PT");
        assert!(checkpoint.events[0].reason.is_none());
        assert_eq!(
            checkpoint.coordinate,
            Some(Coordinate { latitude: 51.34, longitude: 12.37 })
        );
    }

    #[test]
    fn test_missing_keys_default() {
        let data: TrackingData =
            serde_json::from_str(r#"{ "tracking_number": "ABC" }"#).unwrap();
        assert_eq!(data.tracking_number, "ABC");
        assert!(data.eta.is_empty());
        assert!(data.raw_checkpoints.is_empty());
    }
}
