//! Session state and the payloads exchanged with the auth endpoints. Request
//! types carry passwords, so they must never be logged; `SecretString` keeps
//! them out of `Debug` output.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    Client,
    Barber,
    Admin,
}

impl UserType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            UserType::Client => "client",
            UserType::Barber => "barber",
            UserType::Admin => "admin",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "client" => Ok(UserType::Client),
            "barber" => Ok(UserType::Barber),
            "admin" => Ok(UserType::Admin),
            other => Err(format!("unknown user type: {other}")),
        }
    }
}

/// User record as returned by the API. Only `user_type` is interpreted; every
/// other profile field is kept verbatim (and in server order).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub user_type: UserType,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl User {
    #[must_use]
    pub fn new(user_type: UserType) -> Self {
        Self {
            user_type,
            profile: Map::new(),
        }
    }

    #[must_use]
    pub fn with_field(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.profile.insert(name.to_string(), value.into());
        self
    }

    pub fn id(&self) -> Option<u64> {
        self.profile.get("id").and_then(Value::as_u64)
    }

    pub fn username(&self) -> Option<&str> {
        self.profile.get("username").and_then(Value::as_str)
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.profile.get(name)
    }
}

/// The signed-in state. Token and user are set and cleared together by login,
/// registration and logout; authentication is derived, never stored.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Session {
    token: Option<String>,
    user: Option<User>,
}

impl Session {
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn authenticated(token: String, user: User) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Role of the current user, if any.
    pub fn role(&self) -> Option<UserType> {
        self.user.as_ref().map(|user| user.user_type)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|token| !token.is_empty()) && self.user.is_some()
    }

    /// Replaces the user record, keeping the token.
    #[must_use]
    pub(crate) fn with_user(&self, user: User) -> Self {
        Self {
            token: self.token.clone(),
            user: Some(user),
        }
    }
}

fn serialize_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_secret_ref<S: Serializer>(
    secret: &&SecretString,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serialize_secret(secret, serializer)
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    #[serde(serialize_with = "serialize_secret_ref")]
    pub password: &'a SecretString,
}

/// Full registration form, mirroring the backend registration serializer.
#[derive(Debug, Serialize)]
pub struct RegisterProfile {
    pub username: String,
    pub email: String,
    #[serde(serialize_with = "serialize_secret")]
    pub password: SecretString,
    #[serde(serialize_with = "serialize_secret")]
    pub password2: SecretString,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl RegisterProfile {
    /// A profile with the required fields set and everything else empty.
    #[must_use]
    pub fn new(username: &str, email: &str, password: SecretString, password2: SecretString) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password,
            password2,
            first_name: String::new(),
            last_name: String::new(),
            user_type: UserType::default(),
            phone: None,
            birth_date: None,
        }
    }

    #[must_use]
    pub fn with_user_type(mut self, user_type: UserType) -> Self {
        self.user_type = user_type;
        self
    }
}

/// Partial profile update; only present fields are sent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Response of `/login/` and `/register/`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
