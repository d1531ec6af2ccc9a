//! Navigation shell model: the route list and the logout action.
//!
//! The shell reads the authenticated flag and calls `logout`; it keeps no
//! authentication state of its own beyond a latch against repeated logout
//! activation.

use tracing::debug;

use crate::auth::SessionScope;
use crate::routes::{Route, SHELL_ROUTES};

/// One entry in the shell's route list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellItem {
    pub route: Route,
    /// Shortcut key shown next to the label (1-based position).
    pub shortcut: char,
    pub selected: bool,
}

impl ShellItem {
    pub fn label(&self) -> &'static str {
        self.route.title()
    }
}

#[derive(Debug, Default)]
pub struct NavShell {
    logout_latched: bool,
}

impl NavShell {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route list with the current route marked.
    pub fn items(&self, current: Route) -> Vec<ShellItem> {
        SHELL_ROUTES
            .iter()
            .enumerate()
            .map(|(i, route)| ShellItem {
                route: *route,
                shortcut: char::from_digit(i as u32 + 1, 10).unwrap_or('?'),
                selected: *route == current,
            })
            .collect()
    }

    /// Route bound to a shortcut key, if any.
    pub fn route_for_shortcut(&self, key: char) -> Option<Route> {
        let index = key.to_digit(10)?.checked_sub(1)? as usize;
        SHELL_ROUTES.get(index).copied()
    }

    /// The shell only shows for an authenticated session.
    pub fn is_visible(&self, scope: &SessionScope<'_>) -> bool {
        scope.read().is_authenticated()
    }

    /// Handle one activation of the logout action.
    ///
    /// Returns true if `logout` was invoked. Further activations are ignored
    /// until the session is authenticated again.
    pub fn activate_logout(&mut self, scope: &SessionScope<'_>) -> bool {
        let store = scope.session();
        if self.logout_latched && !store.read().is_authenticated() {
            debug!("Ignoring repeated logout activation");
            return false;
        }
        self.logout_latched = true;
        store.logout();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::tests::store_with;
    use crate::navigation::Navigation;
    use crate::storage::MemoryStorage;

    #[test]
    fn test_items_mark_current_route() {
        let shell = NavShell::new();
        let items = shell.items(Route::Articles);
        assert_eq!(items.len(), 5);
        assert_eq!(items[0].route, Route::Home);
        assert_eq!(items[0].shortcut, '1');
        assert_eq!(items[4].shortcut, '5');
        let selected: Vec<_> = items.iter().filter(|i| i.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].label(), "Articles");
    }

    #[test]
    fn test_route_for_shortcut() {
        let shell = NavShell::new();
        assert_eq!(shell.route_for_shortcut('1'), Some(Route::Home));
        assert_eq!(shell.route_for_shortcut('5'), Some(Route::Awards));
        assert_eq!(shell.route_for_shortcut('0'), None);
        assert_eq!(shell.route_for_shortcut('6'), None);
        assert_eq!(shell.route_for_shortcut('x'), None);
    }

    #[test]
    fn test_visible_only_when_signed_in() {
        let (store, _) = store_with(MemoryStorage::new());
        store.initialize();
        let shell = NavShell::new();
        assert!(!shell.is_visible(&SessionScope::provided(&store)));
        store.login("t").unwrap();
        assert!(shell.is_visible(&SessionScope::provided(&store)));
    }

    #[test]
    fn test_rapid_logout_invokes_once() {
        let (store, nav) = store_with(MemoryStorage::new());
        store.initialize();
        store.login("t").unwrap();
        nav.taken();

        let mut shell = NavShell::new();
        let scope = SessionScope::provided(&store);
        assert!(shell.activate_logout(&scope));
        assert!(!shell.activate_logout(&scope));
        assert!(!shell.activate_logout(&scope));

        assert_eq!(nav.taken(), vec![Navigation::replace(Route::SignIn)]);
        assert!(!store.read().is_authenticated());
    }

    #[test]
    fn test_logout_rearms_after_new_login() {
        let (store, nav) = store_with(MemoryStorage::new());
        store.initialize();
        let mut shell = NavShell::new();

        store.login("first").unwrap();
        assert!(shell.activate_logout(&SessionScope::provided(&store)));

        store.login("second").unwrap();
        nav.taken();
        assert!(shell.activate_logout(&SessionScope::provided(&store)));
        assert_eq!(nav.taken(), vec![Navigation::replace(Route::SignIn)]);
    }
}
