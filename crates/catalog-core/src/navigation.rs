//! Navigation requests and the history-keeping router that applies them.
//!
//! Components never move the router directly. They emit a [`Navigation`]
//! through a [`Navigator`]; the application root drains those requests and
//! applies them to its [`Router`] once per event-loop pass.

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::routes::Route;

/// How a navigation affects history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigateMode {
    /// Append to history; `back` returns to the previous route.
    Push,
    /// Overwrite the current entry; the replaced route is not reachable by `back`.
    Replace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    pub to: Route,
    pub mode: NavigateMode,
}

impl Navigation {
    pub fn push(to: Route) -> Self {
        Self {
            to,
            mode: NavigateMode::Push,
        }
    }

    pub fn replace(to: Route) -> Self {
        Self {
            to,
            mode: NavigateMode::Replace,
        }
    }
}

/// Sink for navigation side effects.
pub trait Navigator {
    fn navigate(&self, navigation: Navigation);
}

impl Navigator for mpsc::UnboundedSender<Navigation> {
    fn navigate(&self, navigation: Navigation) {
        if self.send(navigation).is_err() {
            warn!(to = ?navigation.to, "Navigation dropped: router is gone");
        }
    }
}

/// Route history. Always holds at least one entry.
#[derive(Debug, Clone)]
pub struct Router {
    history: Vec<Route>,
}

impl Router {
    pub fn new(initial: Route) -> Self {
        Self {
            history: vec![initial],
        }
    }

    pub fn current(&self) -> Route {
        // history is never empty
        self.history[self.history.len() - 1]
    }

    /// Apply a navigation. Returns true if the current route changed.
    pub fn apply(&mut self, navigation: Navigation) -> bool {
        let before = self.current();
        match navigation.mode {
            NavigateMode::Push => {
                if before != navigation.to {
                    self.history.push(navigation.to);
                }
            }
            NavigateMode::Replace => {
                let last = self.history.len() - 1;
                self.history[last] = navigation.to;
                // Collapse a duplicate left behind by the replacement.
                if last > 0 && self.history[last - 1] == navigation.to {
                    self.history.pop();
                }
            }
        }
        debug!(from = ?before, to = ?navigation.to, mode = ?navigation.mode, "Navigated");
        before != self.current()
    }

    /// Step back one entry. Returns false if already at the oldest entry.
    pub fn back(&mut self) -> bool {
        if self.history.len() > 1 {
            self.history.pop();
            true
        } else {
            false
        }
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new(Route::SignIn)
    }
}
