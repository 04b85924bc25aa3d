//! The console's navigation surface.
//!
//! Every logical route, the roles allowed to view it, and the sidebar menu
//! derived from those roles.

use elmis_core::UserRole;

/// Roles allowed on admin-only views.
const ADMIN_ONLY: &[UserRole] = &[UserRole::Admin];

/// A logical route of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppRoute {
    Login,
    Dashboard,
    Books,
    Reviews,
    Profile,
    Rentals,
    Employees,
    Announcements,
    Reports,
    Unauthorized,
    /// Anything not listed above.
    NotFound,
}

impl AppRoute {
    /// Every route with a fixed path.
    pub const ALL: [Self; 10] = [
        Self::Login,
        Self::Dashboard,
        Self::Books,
        Self::Reviews,
        Self::Profile,
        Self::Rentals,
        Self::Employees,
        Self::Announcements,
        Self::Reports,
        Self::Unauthorized,
    ];

    /// Path of the route. `NotFound` has no path of its own and maps to `*`.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Dashboard => "/dashboard",
            Self::Books => "/books",
            Self::Reviews => "/reviews",
            Self::Profile => "/profile",
            Self::Rentals => "/rentals",
            Self::Employees => "/employees",
            Self::Announcements => "/announcements",
            Self::Reports => "/reports",
            Self::Unauthorized => "/unauthorized",
            Self::NotFound => "*",
        }
    }

    /// Resolve a request path. A single trailing slash is ignored.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };
        Self::ALL
            .into_iter()
            .find(|route| route.path() == path)
            .unwrap_or(Self::NotFound)
    }

    /// Resolve a request path to the route that owns it.
    ///
    /// Like [`AppRoute::from_path`], but nested paths such as
    /// `/announcements/3/edit` belong to their section.
    #[must_use]
    pub fn owner_of(path: &str) -> Self {
        match Self::from_path(path) {
            Self::NotFound => Self::ALL
                .into_iter()
                .find(|route| {
                    path.strip_prefix(route.path())
                        .is_some_and(|rest| rest.starts_with('/'))
                })
                .unwrap_or(Self::NotFound),
            route => route,
        }
    }

    /// Roles allowed to view the route. Empty means any signed-in role.
    #[must_use]
    pub const fn allowed_roles(self) -> &'static [UserRole] {
        match self {
            Self::Employees | Self::Announcements | Self::Reports => ADMIN_ONLY,
            _ => &[],
        }
    }

    /// Whether the route requires a signed-in user.
    #[must_use]
    pub const fn is_protected(self) -> bool {
        !matches!(self, Self::Login | Self::Unauthorized | Self::NotFound)
    }

    /// Page title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Login => "Sign In",
            Self::Dashboard => "Dashboard",
            Self::Books => "Books",
            Self::Reviews => "Reviews",
            Self::Profile => "Profile",
            Self::Rentals => "Rentals",
            Self::Employees => "Employees",
            Self::Announcements => "Announcements",
            Self::Reports => "Reports",
            Self::Unauthorized => "Access Denied",
            Self::NotFound => "Not Found",
        }
    }
}

/// Sidebar order.
const MENU: [AppRoute; 7] = [
    AppRoute::Dashboard,
    AppRoute::Books,
    AppRoute::Employees,
    AppRoute::Rentals,
    AppRoute::Reviews,
    AppRoute::Announcements,
    AppRoute::Reports,
];

/// A sidebar entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub title: &'static str,
    pub href: &'static str,
    pub active: bool,
}

/// Sidebar entries visible to `role`, marking the one for `current`.
#[must_use]
pub fn menu_for(role: UserRole, current: AppRoute) -> Vec<MenuItem> {
    MENU.into_iter()
        .filter(|route| {
            let allowed = route.allowed_roles();
            allowed.is_empty() || allowed.contains(&role)
        })
        .map(|route| MenuItem {
            title: route.title(),
            href: route.path(),
            active: route == current,
        })
        .collect()
}

/// Where a freshly signed-in user lands.
#[must_use]
pub const fn landing_for(role: UserRole) -> AppRoute {
    match role {
        UserRole::Admin => AppRoute::Dashboard,
        UserRole::Operator => AppRoute::Books,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_round_trip() {
        for route in AppRoute::ALL {
            assert_eq!(AppRoute::from_path(route.path()), route);
        }
    }

    #[test]
    fn test_from_path() {
        assert_eq!(AppRoute::from_path("/employees/"), AppRoute::Employees);
        assert_eq!(AppRoute::from_path("/employees/12"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn test_owner_of_nested_paths() {
        assert_eq!(AppRoute::owner_of("/announcements/3/edit"), AppRoute::Announcements);
        assert_eq!(AppRoute::owner_of("/rentals/10/return"), AppRoute::Rentals);
        assert_eq!(AppRoute::owner_of("/employees"), AppRoute::Employees);
        assert_eq!(AppRoute::owner_of("/employeesx"), AppRoute::NotFound);
        assert_eq!(AppRoute::owner_of("/nope/1"), AppRoute::NotFound);
    }

    #[test]
    fn test_admin_only_routes() {
        let admin_only: Vec<_> = AppRoute::ALL
            .into_iter()
            .filter(|r| !r.allowed_roles().is_empty())
            .collect();
        assert_eq!(
            admin_only,
            vec![AppRoute::Employees, AppRoute::Announcements, AppRoute::Reports]
        );
        assert_eq!(AppRoute::Reports.allowed_roles(), &[UserRole::Admin]);
    }

    #[test]
    fn test_protection() {
        assert!(!AppRoute::Login.is_protected());
        assert!(!AppRoute::Unauthorized.is_protected());
        assert!(!AppRoute::NotFound.is_protected());
        assert!(AppRoute::Profile.is_protected());
        assert!(AppRoute::Employees.is_protected());
    }

    #[test]
    fn test_menu_for_operator_hides_admin_views() {
        let titles: Vec<_> = menu_for(UserRole::Operator, AppRoute::Books)
            .into_iter()
            .map(|item| item.title)
            .collect();
        assert_eq!(titles, vec!["Dashboard", "Books", "Rentals", "Reviews"]);
    }

    #[test]
    fn test_menu_for_admin_marks_active() {
        let menu = menu_for(UserRole::Admin, AppRoute::Reports);
        assert_eq!(menu.len(), 7);
        let active: Vec<_> = menu.iter().filter(|i| i.active).collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].href, "/reports");
    }

    #[test]
    fn test_landing() {
        assert_eq!(landing_for(UserRole::Admin), AppRoute::Dashboard);
        assert_eq!(landing_for(UserRole::Operator), AppRoute::Books);
    }
}
