//! Route identifiers shared by the guards, the shell and the router.

use serde::{Deserialize, Serialize};

/// Every screen the console can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Route {
    SignIn,
    SignUp,
    Home,
    Authors,
    Articles,
    Institutions,
    Awards,
}

/// Routes listed by the navigation shell, in display order.
pub const SHELL_ROUTES: [Route; 5] = [
    Route::Home,
    Route::Authors,
    Route::Articles,
    Route::Institutions,
    Route::Awards,
];

impl Route {
    /// Path component for this route.
    pub fn path(&self) -> &'static str {
        match self {
            Route::SignIn => "/sign-in",
            Route::SignUp => "/sign-up",
            Route::Home => "/",
            Route::Authors => "/Author",
            Route::Articles => "/Article",
            Route::Institutions => "/Institution",
            Route::Awards => "/Award",
        }
    }

    /// Display title for this route.
    pub fn title(&self) -> &'static str {
        match self {
            Route::SignIn => "Sign In",
            Route::SignUp => "Sign Up",
            Route::Home => "Home",
            Route::Authors => "Authors",
            Route::Articles => "Articles",
            Route::Institutions => "Institutions",
            Route::Awards => "Awards",
        }
    }

    /// Public routes sit behind the public guard; everything else behind the private guard.
    pub fn is_public(&self) -> bool {
        matches!(self, Route::SignIn | Route::SignUp)
    }

    /// Next shell route (wrapping). Public routes map to the first shell route.
    pub fn next(&self) -> Self {
        match shell_position(*self) {
            Some(i) => SHELL_ROUTES[(i + 1) % SHELL_ROUTES.len()],
            None => SHELL_ROUTES[0],
        }
    }

    /// Previous shell route (wrapping). Public routes map to the first shell route.
    pub fn prev(&self) -> Self {
        match shell_position(*self) {
            Some(i) => SHELL_ROUTES[(i + SHELL_ROUTES.len() - 1) % SHELL_ROUTES.len()],
            None => SHELL_ROUTES[0],
        }
    }
}

fn shell_position(route: Route) -> Option<usize> {
    SHELL_ROUTES.iter().position(|r| *r == route)
}

/// The two named destinations the guards and the session store navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destinations {
    pub sign_in: Route,
    pub landing: Route,
}

impl Destinations {
    pub fn new(sign_in: Route, landing: Route) -> Self {
        Self { sign_in, landing }
    }
}

impl Default for Destinations {
    fn default() -> Self {
        Self {
            sign_in: Route::SignIn,
            landing: Route::Home,
        }
    }
}
