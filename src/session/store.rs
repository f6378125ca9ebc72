//! The session store: owns the signed-in state, talks to the auth endpoints
//! and mirrors the session into durable storage.
//!
//! State lives in a `tokio::sync::watch` channel; every completed operation
//! replaces the whole [`Session`] at once, so subscribers (the router, UI code)
//! never observe a token without its user. Operations are not serialized: two
//! concurrent logins both run and the last one to finish wins.

use super::{
    classify::{classify, Flow},
    errors::{AuthError, UpdateUserError},
    types::{AuthResponse, LoginRequest, RegisterProfile, Session, User, UserType, UserUpdate},
};
use crate::{
    api::ApiClient,
    storage::{keys, Storage},
};
use secrecy::SecretString;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

pub const LOGIN_PATH: &str = "/login/";
pub const REGISTER_PATH: &str = "/register/";
pub const LOGOUT_PATH: &str = "/logout/";
pub const ME_PATH: &str = "/users/me/";

pub struct SessionStore {
    api: Arc<ApiClient>,
    storage: Arc<dyn Storage>,
    tab_storage: Arc<dyn Storage>,
    state: watch::Sender<Session>,
}

impl SessionStore {
    /// Builds the store and hydrates it once from `storage`.
    ///
    /// `storage` must be the same durable store the `api` client reads its
    /// token from; `tab_storage` holds per-process markers. A missing or
    /// corrupt persisted user leaves the session anonymous.
    pub fn restore(
        api: Arc<ApiClient>,
        storage: Arc<dyn Storage>,
        tab_storage: Arc<dyn Storage>,
    ) -> Self {
        let session = load_session(storage.as_ref());
        if let Some(token) = session.token() {
            api.set_default_token(token);
        }
        debug!(
            "session restored (authenticated: {})",
            session.is_authenticated()
        );

        let (state, _) = watch::channel(session);
        Self {
            api,
            storage,
            tab_storage,
            state,
        }
    }

    /// Current session snapshot.
    pub fn session(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user().cloned()
    }

    /// Receiver notified on every session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// Signs in with username and password.
    ///
    /// # Errors
    /// Returns a classified `AuthError`; the session is left untouched.
    pub async fn login(
        &self,
        username: &str,
        password: &SecretString,
    ) -> Result<AuthResponse, AuthError> {
        let request = LoginRequest { username, password };

        let response: AuthResponse = self
            .api
            .post_json(LOGIN_PATH, &request)
            .await
            .map_err(|err| {
                let classified = classify(&err, Flow::Login);
                error!("Login error: {} ({})", classified.message(), classified.kind());
                classified
            })?;

        self.establish(&response);
        info!("logged in as {}", response.user.username().unwrap_or("<unknown>"));
        Ok(response)
    }

    /// Creates an account and signs in with it. A barber registration also
    /// leaves a one-shot marker in tab storage for onboarding.
    ///
    /// # Errors
    /// Returns a classified `AuthError`; the session is left untouched.
    pub async fn register(&self, profile: &RegisterProfile) -> Result<AuthResponse, AuthError> {
        let response: AuthResponse = self
            .api
            .post_json(REGISTER_PATH, profile)
            .await
            .map_err(|err| {
                let classified = classify(&err, Flow::Register);
                error!(
                    "Registration error: {} ({})",
                    classified.message(),
                    classified.kind()
                );
                classified
            })?;

        if profile.user_type == UserType::Barber {
            if let Err(err) = self
                .tab_storage
                .set_item(keys::NEW_BARBER_REGISTRATION, "true")
            {
                warn!("failed to record new barber registration: {err}");
            }
        }

        self.establish(&response);
        info!(
            "registered {} as {}",
            response.user.username().unwrap_or("<unknown>"),
            response.user.user_type
        );
        Ok(response)
    }

    /// Signs out. The remote call is best effort: whatever it returns, local
    /// state, persisted entries and the default credential header are cleared.
    pub async fn logout(&self) {
        if let Err(err) = self.api.post_empty(LOGOUT_PATH).await {
            warn!("Logout error: {err}");
        }

        self.state.send_replace(Session::anonymous());

        for key in [keys::TOKEN, keys::USER] {
            if let Err(err) = self.storage.remove_item(key) {
                warn!("failed to remove {key} from storage: {err}");
            }
        }

        self.api.clear_default_token();
        info!("logged out");
    }

    /// Sends a partial profile update and stores the server's user record.
    ///
    /// # Errors
    /// Returns the server payload (or the error message) unmodified.
    pub async fn update_user(&self, update: &UserUpdate) -> Result<User, UpdateUserError> {
        let user: User = self.api.patch_json(ME_PATH, update).await?;

        // Token and user change together: an anonymous session adopts the
        // persisted token the request was sent with, otherwise it stays
        // anonymous and only the stored record is refreshed.
        let current = self.session();
        if current.token().is_some() {
            self.state.send_replace(current.with_user(user.clone()));
        } else if let Some(token) = self.stored_token() {
            self.api.set_default_token(&token);
            self.state
                .send_replace(Session::authenticated(token, user.clone()));
        } else {
            debug!("profile updated without a persisted token; session stays anonymous");
        }

        self.persist_user(&user);
        Ok(user)
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

    /// Reads and clears the marker left by a barber registration.
    pub fn take_new_barber_registration(&self) -> bool {
        let marker = match self.tab_storage.get_item(keys::NEW_BARBER_REGISTRATION) {
            Ok(marker) => marker,
            Err(err) => {
                warn!("failed to read new barber marker: {err}");
                return false;
            }
        };

        if marker.is_none() {
            return false;
        }

        if let Err(err) = self.tab_storage.remove_item(keys::NEW_BARBER_REGISTRATION) {
            warn!("failed to clear new barber marker: {err}");
        }
        marker.as_deref() == Some("true")
    }

    fn establish(&self, response: &AuthResponse) {
        self.state.send_replace(Session::authenticated(
            response.token.clone(),
            response.user.clone(),
        ));

        if let Err(err) = self.storage.set_item(keys::TOKEN, &response.token) {
            warn!("failed to persist token: {err}");
        }
        self.persist_user(&response.user);

        self.api.set_default_token(&response.token);
    }

    fn persist_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(encoded) => {
                if let Err(err) = self.storage.set_item(keys::USER, &encoded) {
                    warn!("failed to persist user: {err}");
                }
            }
            Err(err) => warn!("failed to encode user: {err}"),
        }
    }
}

fn load_session(storage: &dyn Storage) -> Session {
    let token = match storage.get_item(keys::TOKEN) {
        Ok(token) => token.filter(|token| !token.is_empty()),
        Err(err) => {
            error!("Error loading token from storage: {err}");
            None
        }
    };

    let user = match storage.get_item(keys::USER) {
        Ok(Some(raw)) => match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(err) => {
                error!("Error loading user from storage: {err}");
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            error!("Error loading user from storage: {err}");
            None
        }
    };

    match (token, user) {
        (Some(token), Some(user)) => Session::authenticated(token, user),
        _ => Session::anonymous(),
    }
}
