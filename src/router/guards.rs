use super::routes::AccessDescriptor;
use crate::session::{Session, UserType};

/// Outcome of the navigation guard.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Proceed,
    RedirectLogin,
    RedirectDashboard,
}

/// Decides whether a navigation to a route with `access` may proceed.
///
/// Rules are evaluated in a fixed order and the first match wins. An absent
/// user never satisfies a role requirement.
#[must_use]
pub fn before_each(access: &AccessDescriptor, session: &Session) -> GuardDecision {
    let authenticated = session.is_authenticated();
    let role = session.role();

    if access.requires_auth && !authenticated {
        return GuardDecision::RedirectLogin;
    }
    if access.requires_guest && authenticated {
        return GuardDecision::RedirectDashboard;
    }

    let role_checks = [
        (access.requires_client, UserType::Client),
        (access.requires_barber, UserType::Barber),
        (access.requires_admin, UserType::Admin),
    ];
    if role_checks
        .iter()
        .any(|(required, user_type)| *required && role != Some(*user_type))
    {
        return GuardDecision::RedirectDashboard;
    }

    GuardDecision::Proceed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::User;

    fn signed_in(user_type: UserType) -> Session {
        Session::authenticated("tok".into(), User::new(user_type))
    }

    fn all_descriptors() -> Vec<AccessDescriptor> {
        (0u8..32)
            .map(|bits| AccessDescriptor {
                requires_auth: bits & 1 != 0,
                requires_guest: bits & 2 != 0,
                requires_client: bits & 4 != 0,
                requires_barber: bits & 8 != 0,
                requires_admin: bits & 16 != 0,
            })
            .collect()
    }

    #[test]
    fn open_routes_always_proceed() {
        let open = AccessDescriptor::OPEN;
        assert_eq!(before_each(&open, &Session::anonymous()), GuardDecision::Proceed);
        assert_eq!(
            before_each(&open, &signed_in(UserType::Barber)),
            GuardDecision::Proceed
        );
    }

    #[test]
    fn auth_required() {
        let access = AccessDescriptor::auth();
        assert_eq!(
            before_each(&access, &Session::anonymous()),
            GuardDecision::RedirectLogin
        );
        assert_eq!(
            before_each(&access, &signed_in(UserType::Client)),
            GuardDecision::Proceed
        );
    }

    #[test]
    fn guest_only() {
        let access = AccessDescriptor::guest();
        assert_eq!(
            before_each(&access, &Session::anonymous()),
            GuardDecision::Proceed
        );
        assert_eq!(
            before_each(&access, &signed_in(UserType::Admin)),
            GuardDecision::RedirectDashboard
        );
    }

    #[test]
    fn role_mismatch_goes_to_dashboard() {
        let admin = AccessDescriptor::role(UserType::Admin);
        assert_eq!(
            before_each(&admin, &signed_in(UserType::Client)),
            GuardDecision::RedirectDashboard
        );
        assert_eq!(
            before_each(&admin, &signed_in(UserType::Admin)),
            GuardDecision::Proceed
        );

        let barber = AccessDescriptor::role(UserType::Barber);
        assert_eq!(
            before_each(&barber, &signed_in(UserType::Admin)),
            GuardDecision::RedirectDashboard
        );
    }

    #[test]
    fn absent_user_is_a_role_mismatch() {
        let access = AccessDescriptor {
            requires_client: true,
            ..AccessDescriptor::OPEN
        };
        assert_eq!(
            before_each(&access, &Session::anonymous()),
            GuardDecision::RedirectDashboard
        );
    }

    #[test]
    fn auth_rule_wins_over_role_rules() {
        let access = AccessDescriptor::role(UserType::Client);
        assert_eq!(
            before_each(&access, &Session::anonymous()),
            GuardDecision::RedirectLogin
        );
    }

    #[test]
    fn decision_is_deterministic_for_every_combination() {
        let sessions = [
            Session::anonymous(),
            signed_in(UserType::Client),
            signed_in(UserType::Barber),
            signed_in(UserType::Admin),
        ];
        for access in all_descriptors() {
            for session in &sessions {
                let first = before_each(&access, session);
                assert_eq!(first, before_each(&access, session));

                // Login redirects only ever come from the auth rule.
                if first == GuardDecision::RedirectLogin {
                    assert!(access.requires_auth && !session.is_authenticated());
                }
            }
        }
    }
}
