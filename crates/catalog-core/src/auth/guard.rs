//! Route guards.
//!
//! Each guard has two halves. `view` is pure and tells the renderer what to
//! draw. `react` runs in the effect phase after state has settled and returns
//! the redirect, if any, for the root to apply.

use tracing::debug;

use crate::navigation::Navigation;
use crate::routes::Destinations;

use super::{AuthState, SessionScope};

/// What a guard lets the renderer draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardView {
    /// The wrapped screen.
    Children,
    /// A neutral placeholder while the guard has not decided yet.
    Loading,
    /// Nothing. A redirect is on its way.
    Nothing,
}

/// Keeps an authenticated session off the sign-in and sign-up screens.
#[derive(Debug, Clone)]
pub struct PublicGuard {
    destinations: Destinations,
}

impl PublicGuard {
    pub fn new(destinations: Destinations) -> Self {
        Self { destinations }
    }

    pub fn view(&self, scope: &SessionScope<'_>) -> GuardView {
        match scope.read().state() {
            AuthState::Unknown => GuardView::Loading,
            AuthState::Unauthenticated => GuardView::Children,
            AuthState::Authenticated => GuardView::Nothing,
        }
    }

    /// Evaluated on every pass; an authenticated session is always sent to the landing route.
    pub fn react(&self, scope: &SessionScope<'_>) -> Option<Navigation> {
        if scope.read().is_authenticated() {
            debug!(to = ?self.destinations.landing, "Public guard redirecting");
            Some(Navigation::replace(self.destinations.landing))
        } else {
            None
        }
    }
}

/// Keeps an unauthenticated session out of the protected shell.
#[derive(Debug, Clone)]
pub struct PrivateGuard {
    destinations: Destinations,
    /// Authenticated flag seen at the last check; `None` until mounted.
    checked: Option<bool>,
}

impl PrivateGuard {
    pub fn new(destinations: Destinations) -> Self {
        Self {
            destinations,
            checked: None,
        }
    }

    pub fn view(&self, scope: &SessionScope<'_>) -> GuardView {
        let authenticated = scope.read().is_authenticated();
        match (self.checked, authenticated) {
            (Some(true), true) => GuardView::Children,
            (Some(false), false) => GuardView::Nothing,
            _ => GuardView::Loading,
        }
    }

    /// Runs on mount and whenever the authenticated flag differs from the last check.
    pub fn react(&mut self, scope: &SessionScope<'_>) -> Option<Navigation> {
        let session = scope.read();
        if session.state() == AuthState::Unknown {
            return None;
        }

        let authenticated = session.is_authenticated();
        if self.checked == Some(authenticated) {
            return None;
        }
        self.checked = Some(authenticated);

        if authenticated {
            None
        } else {
            debug!(to = ?self.destinations.sign_in, "Private guard redirecting");
            Some(Navigation::replace(self.destinations.sign_in))
        }
    }

    /// Forget the last check. The next `react` behaves like a fresh mount.
    pub fn unmount(&mut self) {
        self.checked = None;
    }
}
