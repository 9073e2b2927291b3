//! Process-wide user session.
//!
//! One [`Session`] handle is constructed at startup and shared through
//! [`crate::context::AppContext`]; login and logout swap the
//! authenticated user atomically. There is no singleton mutated from
//! arbitrary call sites.

use std::sync::{Arc, PoisonError, RwLock};

use jiff::Timestamp;
use uuid::Uuid;

/// The authenticated user carried by a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Backend user identifier.
    pub id: Uuid,

    /// Name shown in the dashboard header.
    pub display_name: String,

    /// When this sign-in happened.
    pub signed_in_at: Timestamp,
}

/// Shared handle to the current session state.
///
/// Cheap to clone; all clones observe the same login/logout lifecycle.
#[derive(Debug, Clone, Default)]
pub struct Session {
    inner: Arc<RwLock<Option<CurrentUser>>>,
}

impl Session {
    /// Create an unauthenticated session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sign a user in, replacing any previously authenticated user.
    pub fn login(&self, user: CurrentUser) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        *guard = Some(user);
    }

    /// Sign out, returning the user that was signed in.
    ///
    /// The swap is atomic: no observer can see a half-cleared session.
    pub fn logout(&self) -> Option<CurrentUser> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        guard.take()
    }

    /// Snapshot of the currently authenticated user.
    #[must_use]
    pub fn current(&self) -> Option<CurrentUser> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Whether anyone is signed in.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn user(name: &str) -> CurrentUser {
        CurrentUser {
            id: Uuid::now_v7(),
            display_name: name.to_owned(),
            signed_in_at: Timestamp::now(),
        }
    }

    #[test]
    fn starts_unauthenticated() {
        let session = Session::new();

        assert!(!session.is_authenticated());
        assert_eq!(session.current(), None);
    }

    #[test]
    fn login_then_logout_round_trips_the_user() -> TestResult {
        let session = Session::new();
        let alex = user("Alex");

        session.login(alex.clone());

        assert!(session.is_authenticated());
        assert_eq!(session.current(), Some(alex.clone()));

        let signed_out = session.logout();

        assert_eq!(signed_out, Some(alex));
        assert!(!session.is_authenticated());

        Ok(())
    }

    #[test]
    fn fresh_login_replaces_the_previous_user() {
        let session = Session::new();

        session.login(user("Alex"));
        session.login(user("Sam"));

        assert_eq!(
            session.current().map(|u| u.display_name),
            Some("Sam".to_owned())
        );
    }

    #[test]
    fn clones_share_the_same_lifecycle() {
        let session = Session::new();
        let observer = session.clone();

        session.login(user("Alex"));
        assert!(observer.is_authenticated());

        observer.logout();
        assert!(!session.is_authenticated());
    }
}
