//! Path resolution and navigation guarding.
//!
//! Every navigation resolves the path against the route table, follows
//! route-level redirects, then asks [`guards::before_each`] whether the
//! current session may enter. Guard redirects are navigations too, so the
//! guard runs again on the redirect target.

pub mod guards;
pub mod routes;

pub use guards::{before_each, GuardDecision};
pub use routes::{AccessDescriptor, Route, RouteTarget, ROUTES};

use crate::session::Session;
use std::fmt;
use tokio::sync::watch;
use tracing::debug;

/// Upper bound on redirects followed by a single navigation.
pub const MAX_REDIRECTS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouterError {
    NotFound(String),
    RedirectLoop(Vec<String>),
}

impl fmt::Display for RouterError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::NotFound(path) => write!(formatter, "No route matches {path}"),
            RouterError::RedirectLoop(chain) => {
                write!(formatter, "Too many redirects: {}", chain.join(" -> "))
            }
        }
    }
}

impl std::error::Error for RouterError {}

/// Where a navigation ended up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Navigation {
    /// The path as requested, normalized.
    pub requested: String,
    /// The route finally rendered.
    pub route: &'static Route,
    /// Paths visited before `route`, in order, starting with `requested`.
    pub redirects: Vec<String>,
}

impl Navigation {
    #[must_use]
    pub fn path(&self) -> &'static str {
        self.route.path
    }

    #[must_use]
    pub fn was_redirected(&self) -> bool {
        !self.redirects.is_empty()
    }
}

pub struct Router {
    routes: &'static [Route],
    session: watch::Receiver<Session>,
}

impl Router {
    /// Router over the booking client's route table, reading session state
    /// from `session` (see `SessionStore::subscribe`).
    #[must_use]
    pub fn new(session: watch::Receiver<Session>) -> Self {
        Self::with_routes(ROUTES, session)
    }

    #[must_use]
    pub fn with_routes(routes: &'static [Route], session: watch::Receiver<Session>) -> Self {
        Self { routes, session }
    }

    /// Resolves a navigation to `path` against the latest session.
    ///
    /// # Errors
    /// `NotFound` when a path in the chain has no route, `RedirectLoop` when
    /// more than [`MAX_REDIRECTS`] redirects are needed.
    pub fn navigate(&self, path: &str) -> Result<Navigation, RouterError> {
        let session = self.session.borrow().clone();
        let requested = normalize_path(path);
        let mut current = requested.clone();
        let mut redirects = Vec::new();

        loop {
            let route = self
                .routes
                .iter()
                .find(|route| route.path == current)
                .ok_or_else(|| RouterError::NotFound(current.clone()))?;

            let next = match route.target {
                RouteTarget::Redirect(to) => to,
                RouteTarget::View(name) => match before_each(&route.access, &session) {
                    GuardDecision::Proceed => {
                        debug!("navigation to {requested} resolved to {name}");
                        return Ok(Navigation {
                            requested,
                            route,
                            redirects,
                        });
                    }
                    GuardDecision::RedirectLogin => routes::LOGIN,
                    GuardDecision::RedirectDashboard => routes::DASHBOARD,
                },
            };

            redirects.push(current);
            if redirects.len() > MAX_REDIRECTS {
                return Err(RouterError::RedirectLoop(redirects));
            }
            debug!("redirecting to {next}");
            current = next.to_string();
        }
    }
}

/// Drops query and fragment, ensures a leading `/` and strips trailing ones.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let trimmed = path[..end].trim().trim_end_matches('/');

    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}
