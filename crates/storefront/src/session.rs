//! Signed-in user flag.
//!
//! The service issues no tokens; a session is simply the profile returned by
//! the last successful login, kept until logout.

use serde::{Deserialize, Serialize};

use crate::api::UserProfile;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    user: Option<UserProfile>,
}

impl Session {
    #[must_use]
    pub const fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.role.is_admin())
    }

    pub fn login(&mut self, profile: UserProfile) {
        self.user = Some(profile);
    }

    /// Returns the profile that was signed in, if any.
    pub const fn logout(&mut self) -> Option<UserProfile> {
        self.user.take()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{UserId, UserRole};

    use super::*;

    fn profile(role: UserRole) -> UserProfile {
        UserProfile {
            id: UserId::new(1),
            email: "asha@example.com".to_string(),
            first_name: Some("Asha".to_string()),
            last_name: None,
            role,
        }
    }

    #[test]
    fn test_login_logout() {
        let mut session = Session::default();
        assert!(!session.is_authenticated());

        session.login(profile(UserRole::Customer));
        assert!(session.is_authenticated());
        assert!(!session.is_admin());

        assert!(session.logout().is_some());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_admin_flag_follows_role() {
        let mut session = Session::default();
        session.login(profile(UserRole::Admin));
        assert!(session.is_admin());
    }

    #[test]
    fn test_persisted_as_bare_profile() {
        let mut session = Session::default();
        assert_eq!(serde_json::to_value(&session).unwrap(), serde_json::Value::Null);

        session.login(profile(UserRole::Admin));
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["role"], "ADMIN");

        let reloaded: Session = serde_json::from_value(json).unwrap();
        assert!(reloaded.is_admin());
    }
}
