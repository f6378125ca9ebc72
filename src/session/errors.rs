use crate::api::{errors::payload_text, ApiError};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Taxonomy of classified login/registration failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    Auth,
    Validation,
    Server,
    Network,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Auth => "auth",
            ErrorKind::Validation => "validation",
            ErrorKind::Server => "server",
            ErrorKind::Network => "network",
            ErrorKind::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A classified login/registration failure, meant to be shown to the user.
///
/// Serializes as `{"type": "<kind>", "message": "...", "details": ...}`;
/// `details` (the raw server payload) is only present for validation errors.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AuthError {
    Auth { message: String },
    Validation { message: String, details: Value },
    Server { message: String },
    Network { message: String },
    Unknown { message: String },
}

impl AuthError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Auth { .. } => ErrorKind::Auth,
            AuthError::Validation { .. } => ErrorKind::Validation,
            AuthError::Server { .. } => ErrorKind::Server,
            AuthError::Network { .. } => ErrorKind::Network,
            AuthError::Unknown { .. } => ErrorKind::Unknown,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            AuthError::Auth { message }
            | AuthError::Validation { message, .. }
            | AuthError::Server { message }
            | AuthError::Network { message }
            | AuthError::Unknown { message } => message,
        }
    }

    /// Raw server payload, for validation errors.
    #[must_use]
    pub fn details(&self) -> Option<&Value> {
        match self {
            AuthError::Validation { details, .. } => Some(details),
            _ => None,
        }
    }
}

impl fmt::Display for AuthError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} error: {}", self.kind(), self.message())
    }
}

impl std::error::Error for AuthError {}

/// Profile update failure: the server payload, or the error message when no
/// payload is available. Never classified.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateUserError {
    Payload(Value),
    Message(String),
}

impl From<ApiError> for UpdateUserError {
    fn from(err: ApiError) -> Self {
        match err.payload() {
            Some(payload) if is_truthy(payload) => UpdateUserError::Payload(payload.clone()),
            _ => UpdateUserError::Message(err.to_string()),
        }
    }
}

impl fmt::Display for UpdateUserError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateUserError::Payload(payload) => formatter.write_str(&payload_text(payload)),
            UpdateUserError::Message(message) => formatter.write_str(message),
        }
    }
}

impl std::error::Error for UpdateUserError {}

/// Whether a payload counts as present: `null`, `false`, `0` and `""` do not.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
