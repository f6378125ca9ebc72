use serde_json::Value;
use std::fmt;

/// Failures of a single API call, before any session-level classification.
#[derive(Clone, Debug)]
pub enum ApiError {
    Config(String),
    /// No response was received.
    Network(String),
    Timeout(String),
    /// The server answered with a non-success status. `payload` is the body as
    /// JSON, the raw text as a JSON string when it is not JSON, or `null`.
    Http { status: u16, payload: Value },
    Parse(String),
    Serialization(String),
}

impl ApiError {
    /// HTTP status, when a response was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body of an HTTP failure.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ApiError::Http { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// True when the request never produced a response.
    #[must_use]
    pub fn is_no_response(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Timeout(_))
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Config(message) => write!(formatter, "Config error: {message}"),
            ApiError::Network(message) => write!(formatter, "Network error: {message}"),
            ApiError::Timeout(message) => write!(formatter, "Timeout: {message}"),
            ApiError::Http { status, payload } => {
                write!(formatter, "Request failed ({status}): {}", payload_text(payload))
            }
            ApiError::Parse(message) => write!(formatter, "Response error: {message}"),
            ApiError::Serialization(message) => {
                write!(formatter, "Request error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Renders a payload for humans: strings verbatim, anything else as JSON.
pub(crate) fn payload_text(payload: &Value) -> String {
    match payload {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn display_http_includes_status_and_body() {
        let err = ApiError::Http {
            status: 404,
            payload: json!({"detail": "Not found."}),
        };
        assert_eq!(
            err.to_string(),
            r#"Request failed (404): {"detail":"Not found."}"#
        );
        assert_eq!(err.status(), Some(404));
        assert!(!err.is_no_response());
    }

    #[test]
    fn network_and_timeout_have_no_response() {
        assert!(ApiError::Network("refused".into()).is_no_response());
        assert!(ApiError::Timeout("slow".into()).is_no_response());
        assert!(ApiError::Parse("bad".into()).payload().is_none());
    }

    #[test]
    fn payload_text_keeps_strings_verbatim() {
        assert_eq!(payload_text(&json!("plain")), "plain");
        assert_eq!(payload_text(&Value::Null), "");
        assert_eq!(payload_text(&json!(["a", "b"])), r#"["a","b"]"#);
    }
}
