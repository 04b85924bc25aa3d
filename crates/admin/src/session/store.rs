//! The process-wide session container.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use elmis_core::Theme;

use super::{Effect, Session, SessionAction, Transition, hydrated, parse_persisted_auth, reduce};
use crate::models::CurrentUser;
use crate::storage::{Storage, keys};

/// Single source of truth for the signed-in user and the active theme.
///
/// Every mutation runs [`reduce`] and applies the resulting effects to
/// durable storage while holding the state lock, so memory and storage are
/// updated in the same order as the calls. Storage failures are logged and
/// swallowed: no operation on the store returns an error.
///
/// Cloning is cheap and shares the same session.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: watch::Sender<Session>,
    storage: Arc<dyn Storage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &*self.inner.state.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    /// Open the store, restoring whatever `storage` holds.
    ///
    /// The auth pair and the theme are restored independently. A malformed
    /// or inconsistent auth entry is removed and the store starts signed
    /// out; an unknown theme value is ignored and the default applies.
    #[must_use]
    pub fn open(storage: Arc<dyn Storage>) -> Self {
        let user = restore_user(storage.as_ref());
        let theme = restore_theme(storage.as_ref());
        debug!(
            authenticated = user.is_some(),
            theme = %theme,
            "Session restored"
        );

        let (state, _) = watch::channel(hydrated(user, theme));
        Self {
            inner: Arc::new(Inner { state, storage }),
        }
    }

    /// Current session (cloned).
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.inner.state.borrow().clone()
    }

    /// Receive a notification after every mutation that changes the session.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.inner.state.subscribe()
    }

    /// Sign `user` in and persist the pair.
    pub fn login(&self, user: CurrentUser) -> Session {
        info!(email = %user.email, role = %user.role, "User logged in");
        self.dispatch(SessionAction::Login(user))
    }

    /// Sign out and remove the persisted pair.
    pub fn logout(&self) -> Session {
        if let Some(user) = self.inner.state.borrow().user() {
            info!(email = %user.email, "User logged out");
        }
        self.dispatch(SessionAction::Logout)
    }

    /// Flip the theme and persist it. Returns the new theme.
    pub fn toggle_theme(&self) -> Theme {
        self.dispatch(SessionAction::ToggleTheme).theme()
    }

    /// Set the theme and persist it.
    pub fn set_theme(&self, theme: Theme) -> Session {
        self.dispatch(SessionAction::SetTheme(theme))
    }

    fn dispatch(&self, action: SessionAction) -> Session {
        let mut next = None;
        self.inner.state.send_if_modified(|session| {
            let Transition {
                next: updated,
                effects,
            } = reduce(session, action);
            for effect in &effects {
                apply_effect(self.inner.storage.as_ref(), effect);
            }
            let changed = *session != updated;
            *session = updated;
            next = Some(session.clone());
            changed
        });
        next.unwrap_or_else(|| self.snapshot())
    }
}

fn apply_effect(storage: &dyn Storage, effect: &Effect) {
    let result = match effect {
        Effect::WriteAuth(auth) => match serde_json::to_string(auth) {
            Ok(json) => storage.set_item(keys::AUTH, &json),
            Err(e) => {
                warn!(error = %e, "Failed to serialize session");
                return;
            }
        },
        Effect::ClearAuth => storage.remove_item(keys::AUTH),
        Effect::WriteTheme(theme) => storage.set_item(keys::THEME, theme.as_str()),
    };

    if let Err(e) = result {
        warn!(error = %e, ?effect, "Failed to persist session change");
    }
}

fn restore_user(storage: &dyn Storage) -> Option<CurrentUser> {
    let raw = match storage.get_item(keys::AUTH) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(error = %e, "Failed to read persisted session");
            return None;
        }
    };

    match parse_persisted_auth(&raw) {
        Ok(user) => Some(user),
        Err(e) => {
            warn!(error = %e, "Discarding persisted session");
            if let Err(e) = storage.remove_item(keys::AUTH) {
                warn!(error = %e, "Failed to remove persisted session");
            }
            None
        }
    }
}

fn restore_theme(storage: &dyn Storage) -> Theme {
    match storage.get_item(keys::THEME) {
        Ok(Some(raw)) => raw.trim().parse().unwrap_or_else(|e| {
            warn!(error = %e, "Ignoring persisted theme");
            Theme::default()
        }),
        Ok(None) => Theme::default(),
        Err(e) => {
            warn!(error = %e, "Failed to read persisted theme");
            Theme::default()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::models::{PersistedAuth, UserId};
    use crate::storage::{FileStorage, MemoryStorage};
    use elmis_core::{Email, UserRole};

    fn admin() -> CurrentUser {
        CurrentUser {
            id: UserId::new("1"),
            name: "Admin User".to_string(),
            email: Email::parse("admin@library.com").unwrap(),
            role: UserRole::Admin,
            avatar: None,
        }
    }

    fn memory() -> Arc<MemoryStorage> {
        Arc::new(MemoryStorage::new())
    }

    #[test]
    fn test_login_persists_pair() {
        let storage = memory();
        let store = SessionStore::open(storage.clone());

        let session = store.login(admin());
        assert!(session.is_authenticated());
        assert_eq!(session.user(), Some(&admin()));

        let raw = storage.get_item(keys::AUTH).unwrap().unwrap();
        let persisted: PersistedAuth = serde_json::from_str(&raw).unwrap();
        assert_eq!(persisted, PersistedAuth::signed_in(admin()));
        assert!(raw.contains("\"isAuthenticated\":true"));
    }

    #[test]
    fn test_logout_clears_and_removes() {
        let storage = memory();
        let store = SessionStore::open(storage.clone());
        store.login(admin());

        let session = store.logout();
        assert!(!session.is_authenticated());
        assert!(session.user().is_none());
        assert_eq!(storage.get_item(keys::AUTH).unwrap(), None);
    }

    #[test]
    fn test_double_logout_matches_single() {
        let storage = memory();
        let store = SessionStore::open(storage.clone());
        store.login(admin());

        let once = store.logout();
        let twice = store.logout();
        assert_eq!(once, twice);
        assert_eq!(storage.get_item(keys::AUTH).unwrap(), None);
    }

    #[test]
    fn test_set_theme_round_trips_through_restart() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = Arc::new(FileStorage::new(tmp.path()));

        let store = SessionStore::open(storage.clone());
        store.set_theme(Theme::Light);
        assert_eq!(storage.get_item(keys::THEME).unwrap().as_deref(), Some("light"));

        let restarted = SessionStore::open(Arc::new(FileStorage::new(tmp.path())));
        assert_eq!(restarted.snapshot().theme(), Theme::Light);
    }

    #[test]
    fn test_login_survives_restart() {
        let tmp = tempfile::tempdir().unwrap();
        SessionStore::open(Arc::new(FileStorage::new(tmp.path()))).login(admin());

        let restarted = SessionStore::open(Arc::new(FileStorage::new(tmp.path())));
        assert_eq!(restarted.snapshot().user(), Some(&admin()));
    }

    #[test]
    fn test_toggle_theme() {
        let store = SessionStore::open(memory());
        assert_eq!(store.toggle_theme(), Theme::Light);
        assert_eq!(store.toggle_theme(), Theme::Dark);
    }

    #[test]
    fn test_malformed_session_starts_logged_out_and_is_discarded() {
        let storage = Arc::new(MemoryStorage::with_items([
            (keys::AUTH, "{\"user\": "),
            (keys::THEME, "light"),
        ]));
        let store = SessionStore::open(storage.clone());

        let session = store.snapshot();
        assert!(!session.is_authenticated());
        // Theme restoration does not depend on the auth entry.
        assert_eq!(session.theme(), Theme::Light);
        assert_eq!(storage.get_item(keys::AUTH).unwrap(), None);
    }

    #[test]
    fn test_unknown_theme_falls_back_to_dark() {
        let storage = Arc::new(MemoryStorage::with_items([(keys::THEME, "sepia")]));
        assert_eq!(SessionStore::open(storage).snapshot().theme(), Theme::Dark);
    }

    #[test]
    fn test_storage_failures_are_absorbed() {
        let store = SessionStore::open(Arc::new(MemoryStorage::failing()));
        assert!(!store.snapshot().is_authenticated());

        let session = store.login(admin());
        assert!(session.is_authenticated());
        assert_eq!(store.set_theme(Theme::Light).theme(), Theme::Light);
        assert!(!store.logout().is_authenticated());
    }

    #[test]
    fn test_subscribers_see_logout() {
        let store = SessionStore::open(memory());
        store.login(admin());
        let mut rx = store.subscribe();
        assert!(!rx.has_changed().unwrap());

        store.logout();
        assert!(rx.has_changed().unwrap());
        assert!(!rx.borrow_and_update().is_authenticated());

        // Logging out again changes nothing, so nobody is woken.
        store.logout();
        assert!(!rx.has_changed().unwrap());
    }
}
