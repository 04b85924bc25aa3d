//! Session state: who is signed in and which theme is active.
//!
//! The state transition is a pure function, [`reduce`], that returns the
//! next [`Session`] together with the persistence [`Effect`]s it implies.
//! [`SessionStore`] owns the single process-wide session, runs the reducer,
//! and applies the effects to a [`Storage`](crate::storage::Storage).

mod store;

pub use store::SessionStore;

use elmis_core::{Theme, UserRole};
use thiserror::Error;

use crate::models::{CurrentUser, PersistedAuth};

/// The in-memory session.
///
/// `is_authenticated` is derived from the presence of a user, so the two
/// can never disagree. Fields are private: outside this module a session
/// can only be read; changes go through [`SessionStore`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<CurrentUser>,
    theme: Theme,
}

impl Session {
    /// The signed-in user, if any.
    #[must_use]
    pub const fn user(&self) -> Option<&CurrentUser> {
        self.user.as_ref()
    }

    /// Returns `true` iff a user is present.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Role of the signed-in user.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Active theme.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }
}

/// Operations accepted by the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionAction {
    /// Sign `user` in, replacing any current user.
    Login(CurrentUser),
    /// Sign out. A no-op on the state when already signed out.
    Logout,
    /// Flip light and dark.
    ToggleTheme,
    /// Set the theme explicitly.
    SetTheme(Theme),
}

/// Persistence side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Write the `{user, isAuthenticated}` pair.
    WriteAuth(PersistedAuth),
    /// Remove the persisted pair.
    ClearAuth,
    /// Write the theme string.
    WriteTheme(Theme),
}

/// Result of applying an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Session after the action.
    pub next: Session,
    /// Effects to apply to durable storage, in order.
    pub effects: Vec<Effect>,
}

/// Compute the next session for `action`.
///
/// User and authentication flag always move together; the theme is never
/// touched by login or logout.
#[must_use]
pub fn reduce(current: &Session, action: SessionAction) -> Transition {
    match action {
        SessionAction::Login(user) => Transition {
            next: Session {
                user: Some(user.clone()),
                theme: current.theme,
            },
            effects: vec![Effect::WriteAuth(PersistedAuth::signed_in(user))],
        },
        SessionAction::Logout => Transition {
            next: Session {
                user: None,
                theme: current.theme,
            },
            effects: vec![Effect::ClearAuth],
        },
        SessionAction::ToggleTheme => {
            let theme = current.theme.toggled();
            Transition {
                next: Session {
                    user: current.user.clone(),
                    theme,
                },
                effects: vec![Effect::WriteTheme(theme)],
            }
        }
        SessionAction::SetTheme(theme) => Transition {
            next: Session {
                user: current.user.clone(),
                theme,
            },
            effects: vec![Effect::WriteTheme(theme)],
        },
    }
}

/// Why a persisted session was rejected at startup.
#[derive(Debug, Error)]
pub enum RestoreError {
    /// The stored text is not a valid `{user, isAuthenticated}` document.
    #[error("malformed persisted session: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The document parsed but has no user or is not flagged authenticated.
    #[error("persisted session is not authenticated")]
    NotAuthenticated,
}

/// Parse the persisted auth pair into the user it identifies.
///
/// There is no expiry check: a well-formed identity is restored verbatim.
///
/// # Errors
///
/// Returns `RestoreError` if the payload is malformed or inconsistent.
pub fn parse_persisted_auth(raw: &str) -> Result<CurrentUser, RestoreError> {
    let auth: PersistedAuth = serde_json::from_str(raw)?;
    auth.into_user().ok_or(RestoreError::NotAuthenticated)
}

/// Rebuild a session from restored parts.
pub(crate) const fn hydrated(user: Option<CurrentUser>, theme: Theme) -> Session {
    Session { user, theme }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::UserId;
    use elmis_core::Email;

    fn operator() -> CurrentUser {
        CurrentUser {
            id: UserId::new("2"),
            name: "John Doe".to_string(),
            email: Email::parse("john.doe@library.com").unwrap(),
            role: UserRole::Operator,
            avatar: None,
        }
    }

    fn admin() -> CurrentUser {
        CurrentUser {
            id: UserId::new("1"),
            name: "Admin User".to_string(),
            email: Email::parse("admin@library.com").unwrap(),
            role: UserRole::Admin,
            avatar: Some("https://example.org/a.png".to_string()),
        }
    }

    #[test]
    fn test_default_session() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert_eq!(session.theme(), Theme::Dark);
    }

    #[test]
    fn test_login_sets_user_and_persists_pair() {
        let t = reduce(&Session::default(), SessionAction::Login(operator()));
        assert!(t.next.is_authenticated());
        assert_eq!(t.next.user(), Some(&operator()));
        assert_eq!(t.next.theme(), Theme::Dark);
        assert_eq!(
            t.effects,
            vec![Effect::WriteAuth(PersistedAuth::signed_in(operator()))]
        );
    }

    #[test]
    fn test_relogin_overwrites() {
        let first = reduce(&Session::default(), SessionAction::Login(operator())).next;
        let second = reduce(&first, SessionAction::Login(admin())).next;
        assert_eq!(second.role(), Some(UserRole::Admin));
    }

    #[test]
    fn test_logout_keeps_theme() {
        let light = reduce(&Session::default(), SessionAction::SetTheme(Theme::Light)).next;
        let signed_in = reduce(&light, SessionAction::Login(admin())).next;
        let t = reduce(&signed_in, SessionAction::Logout);
        assert!(!t.next.is_authenticated());
        assert_eq!(t.next.theme(), Theme::Light);
        assert_eq!(t.effects, vec![Effect::ClearAuth]);
    }

    #[test]
    fn test_logout_is_idempotent() {
        let signed_in = reduce(&Session::default(), SessionAction::Login(admin())).next;
        let once = reduce(&signed_in, SessionAction::Logout);
        let twice = reduce(&once.next, SessionAction::Logout);
        assert_eq!(once.next, twice.next);
        assert_eq!(once.effects, twice.effects);
    }

    #[test]
    fn test_theme_actions_keep_user() {
        let signed_in = reduce(&Session::default(), SessionAction::Login(operator())).next;

        let toggled = reduce(&signed_in, SessionAction::ToggleTheme);
        assert_eq!(toggled.next.theme(), Theme::Light);
        assert_eq!(toggled.next.user(), Some(&operator()));
        assert_eq!(toggled.effects, vec![Effect::WriteTheme(Theme::Light)]);

        let set = reduce(&toggled.next, SessionAction::SetTheme(Theme::Dark));
        assert_eq!(set.next.theme(), Theme::Dark);
        assert_eq!(set.effects, vec![Effect::WriteTheme(Theme::Dark)]);
    }

    #[test]
    fn test_parse_persisted_auth() {
        let raw = r#"{"user":{"id":"1","name":"Admin User","email":"admin@library.com","role":"admin"},"isAuthenticated":true}"#;
        let user = parse_persisted_auth(raw).unwrap();
        assert_eq!(user.role, UserRole::Admin);
        assert_eq!(user.avatar, None);
    }

    #[test]
    fn test_parse_persisted_auth_rejects_garbage() {
        assert!(matches!(
            parse_persisted_auth("{not json"),
            Err(RestoreError::Malformed(_))
        ));
        assert!(matches!(
            parse_persisted_auth(r#"{"user":{"id":"1"},"isAuthenticated":true}"#),
            Err(RestoreError::Malformed(_))
        ));
        assert!(matches!(
            parse_persisted_auth(r#"{"user":{"id":"1","name":"A","email":"a@b.c","role":"root"},"isAuthenticated":true}"#),
            Err(RestoreError::Malformed(_))
        ));
    }

    #[test]
    fn test_parse_persisted_auth_rejects_inconsistent_pairs() {
        assert!(matches!(
            parse_persisted_auth(r#"{"user":null,"isAuthenticated":true}"#),
            Err(RestoreError::NotAuthenticated)
        ));
        assert!(matches!(
            parse_persisted_auth(
                r#"{"user":{"id":"1","name":"A","email":"a@b.c","role":"admin"},"isAuthenticated":false}"#
            ),
            Err(RestoreError::NotAuthenticated)
        ));
    }
}
