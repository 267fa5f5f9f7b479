//! Normalization of the resolution endpoint's response body.
//!
//! The endpoint is a workflow webhook and answers either with an array of results
//! or with a bare object, depending on how the workflow was last edited. Both
//! shapes are modelled explicitly here instead of probing the JSON ad hoc.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::TrackingError;
use crate::models::TrackingData;

/// Raw body of one resolution request.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ResolveResponse {
    /// An array of results; only the first element is meaningful.
    Batch(Vec<Value>),
    /// A single object, accepted when it carries a `tracking_number`.
    Single(Map<String, Value>),
    /// Anything else (string, number, null).
    Other(Value),
}

impl ResolveResponse {
    /// Reduce the response to the tracking data it describes.
    pub fn normalize(self) -> Result<TrackingData, TrackingError> {
        match self {
            ResolveResponse::Batch(items) => {
                let first = items
                    .into_iter()
                    .next()
                    .ok_or(TrackingError::UnexpectedShape)?;
                decode(first)
            }
            ResolveResponse::Single(object) => {
                if !object.get("tracking_number").is_some_and(is_truthy) {
                    return Err(TrackingError::UnexpectedShape);
                }
                decode(Value::Object(object))
            }
            ResolveResponse::Other(_) => Err(TrackingError::UnexpectedShape),
        }
    }
}

fn decode(value: Value) -> Result<TrackingData, TrackingError> {
    if !value.is_object() {
        return Err(TrackingError::UnexpectedShape);
    }
    serde_json::from_value(value).map_err(|e| TrackingError::Decode(e.to_string()))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> ResolveResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_batch_takes_first_element() {
        let response = parse(json!([
            { "tracking_number": "FIRST", "status": "Delivered" },
            { "tracking_number": "SECOND" }
        ]));
        assert!(matches!(response, ResolveResponse::Batch(_)));

        let data = response.normalize().unwrap();
        assert_eq!(data.tracking_number, "FIRST");
        assert_eq!(data.status, "Delivered");
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let response = parse(json!([]));
        assert_eq!(response.normalize(), Err(TrackingError::UnexpectedShape));
    }

    #[test]
    fn test_single_object_with_tracking_number() {
        let response = parse(json!({ "tracking_number": "ONLY", "courier_slug": "ups" }));
        assert!(matches!(response, ResolveResponse::Single(_)));
        assert_eq!(response.normalize().unwrap().courier_slug, "ups");
    }

    #[test]
    fn test_single_object_without_tracking_number() {
        assert_eq!(
            parse(json!({ "message": "Workflow was started" })).normalize(),
            Err(TrackingError::UnexpectedShape)
        );
        assert_eq!(
            parse(json!({ "tracking_number": "" })).normalize(),
            Err(TrackingError::UnexpectedShape)
        );
    }

    #[test]
    fn test_scalars_are_rejected() {
        assert!(matches!(parse(json!("ok")), ResolveResponse::Other(_)));
        assert_eq!(parse(json!(null)).normalize(), Err(TrackingError::UnexpectedShape));
        assert_eq!(parse(json!([null])).normalize(), Err(TrackingError::UnexpectedShape));
    }

    #[test]
    fn test_malformed_first_element() {
        let response = parse(json!([{ "tracking_number": "X", "raw_checkpoints": "nope" }]));
        assert!(matches!(response.normalize(), Err(TrackingError::Decode(_))));
    }
}
