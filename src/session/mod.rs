//! Authentication state for the booking client.
//!
//! [`SessionStore`] is the single source of truth for who is signed in. It
//! hydrates from durable storage on construction, writes back on every
//! login, registration and profile update, and broadcasts changes through a
//! `watch` channel so routing decisions always see the latest state.

pub mod classify;
pub mod errors;
pub mod store;
pub mod types;

pub use classify::{classify, Flow};
pub use errors::{AuthError, ErrorKind, UpdateUserError};
pub use store::{SessionStore, LOGIN_PATH, LOGOUT_PATH, ME_PATH, REGISTER_PATH};
pub use types::{AuthResponse, LoginRequest, RegisterProfile, Session, User, UserType, UserUpdate};
