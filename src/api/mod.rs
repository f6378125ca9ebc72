//! HTTP access to the booking API: configuration, the error type every call
//! returns, and the client that injects credentials. Feature code goes through
//! [`ApiClient`] so header handling stays in one place.

pub mod client;
pub mod config;
pub mod errors;

pub use client::{is_public_endpoint, ApiClient, PUBLIC_ENDPOINTS};
pub use config::{ApiConfig, DEFAULT_API_URL};
pub use errors::ApiError;
