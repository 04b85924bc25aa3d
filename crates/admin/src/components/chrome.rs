//! Page chrome: theme, title, signed-in user badge and sidebar.
//!
//! Every page template extends `base.html`, which reads a `chrome` field of
//! this type.

use crate::models::CurrentUser;
use crate::navigation::{AppRoute, MenuItem, menu_for};
use crate::session::Session;

/// Signed-in user as shown in the header.
#[derive(Debug, Clone)]
pub struct UserView {
    pub name: String,
    pub email: String,
    pub role: String,
    pub initials: String,
    pub avatar: Option<String>,
    pub is_admin: bool,
}

impl From<&CurrentUser> for UserView {
    fn from(user: &CurrentUser) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.to_string(),
            role: user.role.to_string(),
            initials: user.initials(),
            avatar: user.avatar.clone(),
            is_admin: user.is_admin(),
        }
    }
}

/// Everything `base.html` needs to frame a page.
#[derive(Debug, Clone)]
pub struct PageChrome {
    /// Root element class: `light` or `dark`.
    pub theme: &'static str,
    pub title: &'static str,
    pub user: Option<UserView>,
    pub menu: Vec<MenuItem>,
}

impl PageChrome {
    /// Chrome for `route` as seen by `session`.
    #[must_use]
    pub fn new(session: &Session, route: AppRoute) -> Self {
        let menu = session
            .role()
            .map(|role| menu_for(role, route))
            .unwrap_or_default();

        Self {
            theme: session.theme().as_str(),
            title: route.title(),
            user: session.user().map(UserView::from),
            menu,
        }
    }

    /// Returns `true` when an admin is signed in. Gates edit controls.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|user| user.is_admin)
    }

    /// Returns `true` when the sidebar should be drawn.
    #[must_use]
    pub fn has_sidebar(&self) -> bool {
        !self.menu.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use elmis_core::{Email, UserRole};

    use super::*;
    use crate::models::UserId;
    use crate::session::{SessionAction, reduce};

    #[test]
    fn test_signed_out_chrome() {
        let chrome = PageChrome::new(&Session::default(), AppRoute::Login);
        assert_eq!(chrome.theme, "dark");
        assert_eq!(chrome.title, "Sign In");
        assert!(chrome.user.is_none());
        assert!(!chrome.has_sidebar());
        assert!(!chrome.is_admin());
    }

    #[test]
    fn test_operator_chrome() {
        let user = CurrentUser {
            id: UserId::new("2"),
            name: "John Doe".to_string(),
            email: Email::parse("john.doe@library.com").unwrap(),
            role: UserRole::Operator,
            avatar: None,
        };
        let session = reduce(&Session::default(), SessionAction::Login(user)).next;
        let session = reduce(&session, SessionAction::ToggleTheme).next;

        let chrome = PageChrome::new(&session, AppRoute::Books);
        assert_eq!(chrome.theme, "light");
        let user = chrome.user.as_ref().unwrap();
        assert_eq!(user.initials, "JD");
        assert_eq!(user.role, "operator");
        assert!(!user.is_admin);
        assert!(!chrome.is_admin());
        assert_eq!(chrome.menu.len(), 4);
        assert!(chrome.menu.iter().any(|item| item.active && item.href == "/books"));
    }

    #[test]
    fn test_admin_chrome_enables_edit_controls() {
        let user = CurrentUser {
            id: UserId::new("1"),
            name: "Admin User".to_string(),
            email: Email::parse("admin@library.com").unwrap(),
            role: UserRole::Admin,
            avatar: None,
        };
        let session = reduce(&Session::default(), SessionAction::Login(user)).next;
        let chrome = PageChrome::new(&session, AppRoute::Rentals);
        assert!(chrome.is_admin());
        assert_eq!(chrome.menu.len(), 7);
    }
}
