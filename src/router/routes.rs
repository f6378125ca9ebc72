//! Static route table of the booking client.

use crate::session::UserType;

/// Which session conditions permit entering a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccessDescriptor {
    pub requires_auth: bool,
    pub requires_guest: bool,
    pub requires_client: bool,
    pub requires_barber: bool,
    pub requires_admin: bool,
}

impl AccessDescriptor {
    pub const OPEN: Self = Self {
        requires_auth: false,
        requires_guest: false,
        requires_client: false,
        requires_barber: false,
        requires_admin: false,
    };

    #[must_use]
    pub const fn guest() -> Self {
        Self {
            requires_guest: true,
            ..Self::OPEN
        }
    }

    #[must_use]
    pub const fn auth() -> Self {
        Self {
            requires_auth: true,
            ..Self::OPEN
        }
    }

    /// Signed in with the given role.
    #[must_use]
    pub const fn role(user_type: UserType) -> Self {
        let base = Self::auth();
        match user_type {
            UserType::Client => Self {
                requires_client: true,
                ..base
            },
            UserType::Barber => Self {
                requires_barber: true,
                ..base
            },
            UserType::Admin => Self {
                requires_admin: true,
                ..base
            },
        }
    }

    /// Names of the set requirements, in guard evaluation order.
    #[must_use]
    pub fn requirements(&self) -> Vec<&'static str> {
        [
            (self.requires_auth, "auth"),
            (self.requires_guest, "guest"),
            (self.requires_client, "client"),
            (self.requires_barber, "barber"),
            (self.requires_admin, "admin"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteTarget {
    /// Renders the named view.
    View(&'static str),
    /// Forwards to another path before any guard runs.
    Redirect(&'static str),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub target: RouteTarget,
    pub access: AccessDescriptor,
}

impl Route {
    const fn view(path: &'static str, name: &'static str, access: AccessDescriptor) -> Self {
        Self {
            path,
            target: RouteTarget::View(name),
            access,
        }
    }

    const fn redirect(path: &'static str, to: &'static str) -> Self {
        Self {
            path,
            target: RouteTarget::Redirect(to),
            access: AccessDescriptor::OPEN,
        }
    }

    /// View name, `None` for redirect routes.
    #[must_use]
    pub fn name(&self) -> Option<&'static str> {
        match self.target {
            RouteTarget::View(name) => Some(name),
            RouteTarget::Redirect(_) => None,
        }
    }
}

pub const LOGIN: &str = "/login";
pub const DASHBOARD: &str = "/dashboard";

pub static ROUTES: &[Route] = &[
    Route::redirect("/", LOGIN),
    Route::view(LOGIN, "Login", AccessDescriptor::guest()),
    Route::view("/register", "Register", AccessDescriptor::guest()),
    Route::view(DASHBOARD, "Dashboard", AccessDescriptor::auth()),
    Route::view("/appointments", "Appointments", AccessDescriptor::auth()),
    Route::view(
        "/appointments/new",
        "NewAppointment",
        AccessDescriptor::role(UserType::Client),
    ),
    Route::view("/barbers", "Barbers", AccessDescriptor::auth()),
    Route::view("/services", "Services", AccessDescriptor::auth()),
    Route::view(
        "/barber-profile",
        "BarberProfile",
        AccessDescriptor::role(UserType::Barber),
    ),
    Route::view(
        "/admin/barbers",
        "AdminBarbers",
        AccessDescriptor::role(UserType::Admin),
    ),
    Route::view(
        "/admin/services",
        "AdminServices",
        AccessDescriptor::role(UserType::Admin),
    ),
];

/// Route registered at exactly `path` (already normalized).
#[must_use]
pub fn find(path: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.path == path)
}

#[must_use]
pub fn by_name(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.name() == Some(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn paths_and_names_are_unique() {
        let paths: HashSet<_> = ROUTES.iter().map(|route| route.path).collect();
        assert_eq!(paths.len(), ROUTES.len());

        let names: Vec<_> = ROUTES.iter().filter_map(Route::name).collect();
        let unique: HashSet<_> = names.iter().collect();
        assert_eq!(unique.len(), names.len());
    }

    #[test]
    fn root_redirects_to_login() {
        let root = find("/").map(|route| route.target);
        assert_eq!(root, Some(RouteTarget::Redirect("/login")));
    }

    #[test]
    fn role_routes_also_require_auth() {
        for route in ROUTES {
            let access = route.access;
            if access.requires_client || access.requires_barber || access.requires_admin {
                assert!(access.requires_auth, "{} must require auth", route.path);
            }
            assert!(!(access.requires_auth && access.requires_guest));
        }
    }

    #[test]
    fn lookup_by_name() {
        let route = by_name("AdminServices").map(|route| route.path);
        assert_eq!(route, Some("/admin/services"));
        assert_eq!(
            by_name("NewAppointment").map(|route| route.access),
            Some(AccessDescriptor::role(UserType::Client))
        );
        assert!(by_name("Missing").is_none());
    }

    #[test]
    fn requirement_names() {
        assert!(AccessDescriptor::OPEN.requirements().is_empty());
        assert_eq!(AccessDescriptor::guest().requirements(), ["guest"]);
        assert_eq!(
            AccessDescriptor::role(UserType::Barber).requirements(),
            ["auth", "barber"]
        );
    }

    #[test]
    fn guest_routes() {
        let guests: Vec<_> = ROUTES
            .iter()
            .filter(|route| route.access.requires_guest)
            .map(|route| route.path)
            .collect();
        assert_eq!(guests, ["/login", "/register"]);
    }
}
