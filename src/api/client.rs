//! HTTP client for the booking API with a request interceptor that owns the
//! credential header. The interceptor runs before every send: public
//! endpoints (`/login/`, `/register/`) never carry `Authorization`; every
//! other request carries `Authorization: Token <token>` when a token is
//! persisted, and no `Authorization` at all otherwise, even if a default was
//! set earlier. Errors propagate unchanged; nothing is retried.

use super::{config::ApiConfig, errors::ApiError};
use crate::storage::{keys, Storage};
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Response,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info_span, warn, Instrument};

/// Path suffixes that must never carry credentials.
pub const PUBLIC_ENDPOINTS: [&str; 2] = ["/login/", "/register/"];

/// True when `path` targets a public endpoint.
pub fn is_public_endpoint(path: &str) -> bool {
    PUBLIC_ENDPOINTS
        .iter()
        .any(|endpoint| path.ends_with(endpoint))
}

/// Formats the credential header value, `None` if the token is not a valid
/// header value.
pub fn token_header(token: &str) -> Option<HeaderValue> {
    HeaderValue::from_str(&format!("Token {token}"))
        .ok()
        .map(|mut value| {
            value.set_sensitive(true);
            value
        })
}

pub struct ApiClient {
    config: ApiConfig,
    http: Client,
    storage: Arc<dyn Storage>,
    defaults: RwLock<HeaderMap>,
}

impl ApiClient {
    /// Creates a client reading the token from `storage` on every request.
    ///
    /// # Errors
    /// Returns `ApiError::Config` if the underlying HTTP client cannot be built.
    pub fn new(config: ApiConfig, storage: Arc<dyn Storage>) -> Result<Self, ApiError> {
        let mut builder = Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| ApiError::Config(format!("Failed to build HTTP client: {err}")))?;

        let mut defaults = HeaderMap::new();
        defaults.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            config,
            http,
            storage,
            defaults: RwLock::new(defaults),
        })
    }

    /// Sets the default credential header, used after login or registration.
    pub fn set_default_token(&self, token: &str) {
        let mut defaults = self
            .defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = token_header(token) {
            defaults.insert(AUTHORIZATION, value);
        } else {
            warn!("token is not a valid header value; default credential header not set");
            defaults.remove(AUTHORIZATION);
        }
    }

    /// Removes the default credential header.
    pub fn clear_default_token(&self) {
        self.defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(AUTHORIZATION);
    }

    /// Snapshot of the default headers before interception.
    pub fn default_headers(&self) -> HeaderMap {
        self.defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The request interceptor: headers actually sent for a request to `path`.
    pub fn request_headers(&self, path: &str) -> HeaderMap {
        let mut headers = self.default_headers();

        if is_public_endpoint(path) {
            headers.remove(AUTHORIZATION);
            return headers;
        }

        match self.stored_token().as_deref().and_then(token_header) {
            Some(value) => {
                headers.insert(AUTHORIZATION, value);
            }
            None => {
                headers.remove(AUTHORIZATION);
            }
        }

        headers
    }

    fn stored_token(&self) -> Option<String> {
        match self.storage.get_item(keys::TOKEN) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(err) => {
                warn!("failed to read token from storage: {err}");
                None
            }
        }
    }

    /// Posts JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns an `ApiError` if the request cannot be encoded or sent, the
    /// server answers with a non-success status, or the body cannot be decoded.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = encode(body)?;
        let response = self.send(Method::POST, path, Some(payload)).await?;
        handle_json_response(response).await
    }

    /// Posts an empty body and ignores the response body.
    ///
    /// # Errors
    /// Returns an `ApiError` if the request fails or the status is not a success.
    pub async fn post_empty(&self, path: &str) -> Result<(), ApiError> {
        let response = self.send(Method::POST, path, None).await?;
        handle_empty_response(response).await
    }

    /// Patches JSON and parses a JSON response.
    ///
    /// # Errors
    /// Returns an `ApiError` if the request cannot be encoded or sent, the
    /// server answers with a non-success status, or the body cannot be decoded.
    pub async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let payload = encode(body)?;
        let response = self.send(Method::PATCH, path, Some(payload)).await?;
        handle_json_response(response).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<Response, ApiError> {
        let url = self.config.build_url(path);
        let headers = self.request_headers(path);

        debug!(
            "{method} {url} (credentials: {})",
            headers.contains_key(AUTHORIZATION)
        );

        let span = info_span!(
            "api.request",
            http.method = %method,
            url = %url
        );

        let mut request = self.http.request(method, &url).headers(headers);
        if let Some(body) = body {
            request = request.body(body);
        }

        request.send().instrument(span).await.map_err(map_request_error)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Vec<u8>, ApiError> {
    serde_json::to_vec(body)
        .map_err(|err| ApiError::Serialization(format!("Failed to encode request: {err}")))
}

/// Maps transport errors into `ApiError` variants with timeout detection.
fn map_request_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() {
        ApiError::Timeout("Request timed out. Please try again.".to_string())
    } else if err.is_builder() {
        ApiError::Config(format!("Failed to build request: {err}"))
    } else {
        ApiError::Network(format!("Unable to reach the server: {err}"))
    }
}

async fn handle_json_response<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.status().is_success() {
        return Err(http_error(response).await);
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| ApiError::Network(format!("Failed to read response: {err}")))?;
    serde_json::from_slice(&body)
        .map_err(|err| ApiError::Parse(format!("Failed to decode response: {err}")))
}

async fn handle_empty_response(response: Response) -> Result<(), ApiError> {
    if response.status().is_success() {
        Ok(())
    } else {
        Err(http_error(response).await)
    }
}

async fn http_error(response: Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::Http {
        status,
        payload: decode_payload(&body),
    }
}

/// Error bodies are kept raw: JSON when they parse, a JSON string otherwise.
fn decode_payload(body: &str) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
}
