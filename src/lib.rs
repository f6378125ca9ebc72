//! # Barbershop (booking client session layer)
//!
//! Client-side authentication and routing for the barbershop booking
//! application. Clients, barbers and admins share one front end; this crate
//! owns who is signed in and where they are allowed to go.
//!
//! ## Session
//!
//! [`session::SessionStore`] wraps the remote `/login/`, `/register/`,
//! `/logout/` and `/users/me/` endpoints. A completed login or registration
//! stores the token and the user record together, mirrors both into durable
//! [`storage::Storage`] and publishes the new [`session::Session`] on a
//! `tokio::sync::watch` channel. Logout always clears local state, even when the
//! remote call fails.
//!
//! ## HTTP
//!
//! [`api::ApiClient`] intercepts every request: public endpoints (`/login/`,
//! `/register/`) never carry credentials, every other request carries
//! `Authorization: Token <token>` when a token is persisted and nothing
//! otherwise.
//!
//! ## Routing
//!
//! [`router::Router`] resolves a path against the static route table and runs
//! the [`router::guards::before_each`] guard on every hop. The guard is a pure
//! function of the route's access descriptor and the session; it proceeds or
//! redirects to `/login` or `/dashboard`.

pub mod api;
pub mod cli;
pub mod router;
pub mod session;
pub mod storage;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
