// API failure kinds. Every failed fetch collapses into one of these and is shown as one message.

use serde_json::{Value, json};
use thiserror::Error;

use crate::models::truthy;

/// Failure of a single API call.
///
/// The variants only refine where the failure came from; callers treat them alike
/// (log, skip the render) and the message is what the dashboard reports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx HTTP status.
    #[error("API error: {0}")]
    Status(u16),
    /// Connection refused, reset, timed out, ...
    #[error("{0}")]
    Transport(String),
    /// Body was not JSON, or not the shape the page expects.
    #[error("invalid response: {0}")]
    Decode(String),
    /// 2xx body carrying an `error` field.
    #[error("{0}")]
    Server(String),
}

impl ApiError {
    /// The `{ "error": "<message>" }` object the dashboard pages exchange instead of throwing.
    pub fn sentinel(&self) -> Value {
        json!({ "error": self.to_string() })
    }

    /// Server-reported failure inside an otherwise successful body.
    /// Only a truthy `error` field counts (null, false, 0 and "" are ignored).
    pub fn from_body(body: &Value) -> Option<Self> {
        let error = body.as_object()?.get("error")?;
        if !truthy(error) {
            return None;
        }
        Some(ApiError::Server(match error {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_message_matches_dashboard_format() {
        assert_eq!(ApiError::Status(503).to_string(), "API error: 503");
        assert_eq!(
            ApiError::Status(404).sentinel(),
            json!({ "error": "API error: 404" })
        );
    }

    #[test]
    fn from_body_ignores_falsy_error_fields() {
        assert_eq!(ApiError::from_body(&json!({ "error": null })), None);
        assert_eq!(ApiError::from_body(&json!({ "error": "" })), None);
        assert_eq!(ApiError::from_body(&json!({ "error": false })), None);
        assert_eq!(ApiError::from_body(&json!([1, 2])), None);
        assert_eq!(
            ApiError::from_body(&json!({ "count": 100, "error": "db down" })),
            Some(ApiError::Server("db down".into()))
        );
    }
}
