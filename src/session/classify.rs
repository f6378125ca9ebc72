//! Maps API failures of login and registration onto the user-facing error
//! taxonomy. Rules are checked in order: 401, 400, 5xx, no response, other.

use super::errors::{is_truthy, AuthError};
use crate::api::{errors::payload_text, ApiError};
use serde_json::Value;

pub const SERVER_ERROR_MESSAGE: &str = "Server error. Please try again later.";
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to connect to server. Check if backend is running.";

/// Which operation failed; messages and the 400 parsing rules differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow {
    Login,
    Register,
}

impl Flow {
    const fn unauthorized_message(self) -> &'static str {
        match self {
            Flow::Login => "Invalid credentials. Check your username and password.",
            Flow::Register => "Unauthorized. Check your credentials or if the server is running.",
        }
    }

    const fn unknown_message(self) -> &'static str {
        match self {
            Flow::Login => "Unknown error logging in",
            Flow::Register => "Unknown error registering",
        }
    }
}

/// Classifies a failed login or registration call.
pub fn classify(err: &ApiError, flow: Flow) -> AuthError {
    match (err.status(), err.payload()) {
        (Some(401), _) => AuthError::Auth {
            message: flow.unauthorized_message().to_string(),
        },
        (Some(400), Some(payload)) => AuthError::Validation {
            message: validation_message(payload, flow),
            details: payload.clone(),
        },
        (Some(status), _) if status >= 500 => AuthError::Server {
            message: SERVER_ERROR_MESSAGE.to_string(),
        },
        _ if err.is_no_response() => AuthError::Network {
            message: NETWORK_ERROR_MESSAGE.to_string(),
        },
        _ => AuthError::Unknown {
            message: unknown_message(err, flow),
        },
    }
}

fn validation_message(payload: &Value, flow: Flow) -> String {
    let Value::Object(fields) = payload else {
        return payload_text(payload);
    };

    // Login endpoints answer `{"error": "..."}` for non-field failures.
    if flow == Flow::Login {
        if let Some(Value::String(message)) = fields.get("error") {
            return message.clone();
        }
    }

    fields
        .iter()
        .filter_map(|(field, messages)| {
            let text = match messages {
                Value::Array(items) => items.iter().map(item_text).collect::<Vec<_>>().join(", "),
                Value::String(message) => message.clone(),
                other if flow == Flow::Register => other.to_string(),
                _ => return None,
            };
            Some(format!("{field}: {text}"))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn item_text(item: &Value) -> String {
    match item {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn unknown_message(err: &ApiError, flow: Flow) -> String {
    let payload = err.payload().filter(|payload| is_truthy(payload));

    let non_field_errors = match flow {
        Flow::Login => payload
            .and_then(|payload| payload.get("non_field_errors"))
            .filter(|value| is_truthy(value)),
        Flow::Register => None,
    };

    let message = match (non_field_errors, payload) {
        (Some(Value::Array(items)), _) => items.iter().map(item_text).collect::<Vec<_>>().join(", "),
        (Some(value), _) | (None, Some(value)) => payload_text(value),
        (None, None) => err.to_string(),
    };

    if message.is_empty() {
        flow.unknown_message().to_string()
    } else {
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::errors::ErrorKind;
    use serde_json::json;

    fn http(status: u16, payload: Value) -> ApiError {
        ApiError::Http { status, payload }
    }

    #[test]
    fn unauthorized_login() {
        let err = classify(&http(401, json!({"detail": "nope"})), Flow::Login);
        assert_eq!(
            err,
            AuthError::Auth {
                message: "Invalid credentials. Check your username and password.".into()
            }
        );
    }

    #[test]
    fn unauthorized_register_has_its_own_message() {
        let err = classify(&http(401, Value::Null), Flow::Register);
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(
            err.message(),
            "Unauthorized. Check your credentials or if the server is running."
        );
    }

    #[test]
    fn login_error_field_is_used_verbatim() {
        let payload = json!({"error": "username required"});
        let err = classify(&http(400, payload.clone()), Flow::Login);
        assert_eq!(
            err,
            AuthError::Validation {
                message: "username required".into(),
                details: payload,
            }
        );
    }

    #[test]
    fn register_field_errors_are_joined() {
        let err = classify(
            &http(400, json!({"email": ["Enter a valid email."]})),
            Flow::Register,
        );
        assert_eq!(err.message(), "email: Enter a valid email.");
        assert_eq!(err.details(), Some(&json!({"email": ["Enter a valid email."]})));
    }

    #[test]
    fn multiple_fields_keep_server_order() {
        let payload = json!({
            "username": ["A user with that username already exists."],
            "password": ["This password is too short.", "This password is too common."],
            "email": "Enter a valid email."
        });
        let err = classify(&http(400, payload), Flow::Register);
        assert_eq!(
            err.message(),
            "username: A user with that username already exists.\n\
             password: This password is too short., This password is too common.\n\
             email: Enter a valid email."
        );
    }

    #[test]
    fn non_string_values_only_rendered_for_register() {
        let payload = json!({"birth_date": {"code": "invalid"}, "phone": ["Invalid."]});

        let login = classify(&http(400, payload.clone()), Flow::Login);
        assert_eq!(login.message(), "phone: Invalid.");

        let register = classify(&http(400, payload), Flow::Register);
        assert_eq!(
            register.message(),
            "birth_date: {\"code\":\"invalid\"}\nphone: Invalid."
        );
    }

    #[test]
    fn register_ignores_error_shortcut() {
        let err = classify(&http(400, json!({"error": "boom"})), Flow::Register);
        assert_eq!(err.message(), "error: boom");
    }

    #[test]
    fn non_object_validation_payload_is_rendered_as_text() {
        let err = classify(&http(400, json!("Bad request")), Flow::Login);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "Bad request");
    }

    #[test]
    fn server_errors() {
        for status in [500, 502, 503] {
            let err = classify(&http(status, json!("<html>")), Flow::Login);
            assert_eq!(
                err,
                AuthError::Server {
                    message: SERVER_ERROR_MESSAGE.into()
                }
            );
        }
    }

    #[test]
    fn no_response_is_network() {
        let err = classify(&ApiError::Network("connection refused".into()), Flow::Login);
        assert_eq!(
            err,
            AuthError::Network {
                message: "Unable to connect to server. Check if backend is running.".into()
            }
        );

        let err = classify(&ApiError::Timeout("slow".into()), Flow::Register);
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[test]
    fn unknown_prefers_non_field_errors_on_login() {
        let err = classify(
            &http(403, json!({"non_field_errors": ["Account is disabled."]})),
            Flow::Login,
        );
        assert_eq!(
            err,
            AuthError::Unknown {
                message: "Account is disabled.".into()
            }
        );
    }

    #[test]
    fn unknown_falls_back_to_payload_then_error() {
        let err = classify(&http(404, json!({"detail": "Not found."})), Flow::Register);
        assert_eq!(err.message(), r#"{"detail":"Not found."}"#);

        let err = classify(&http(403, json!("Forbidden")), Flow::Login);
        assert_eq!(err.message(), "Forbidden");

        let err = classify(&http(404, Value::Null), Flow::Login);
        assert_eq!(err.message(), "Request failed (404): ");

        let err = classify(&ApiError::Parse("Failed to decode response".into()), Flow::Login);
        assert_eq!(err.kind(), ErrorKind::Unknown);
        assert_eq!(err.message(), "Response error: Failed to decode response");
    }
}
