use std::cell::Cell;
use std::fmt;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::navigation::{Navigation, Navigator};
use crate::routes::Destinations;
use crate::storage::{TokenStorage, TOKEN_KEY};

use super::AuthError;

/// Coarse authentication state shared by both route guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// The store exists but `initialize` has not run yet.
    Unknown,
    Unauthenticated,
    Authenticated,
}

/// Immutable snapshot of the session.
///
/// `is_authenticated` is derived from the token, so a snapshot can never
/// carry a token without being authenticated or the reverse.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    initialized: bool,
}

impl Session {
    fn unknown() -> Self {
        Self {
            token: None,
            initialized: false,
        }
    }

    fn settled(token: Option<String>) -> Self {
        Self {
            token: token.filter(|t| !t.is_empty()),
            initialized: true,
        }
    }

    /// The bearer token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn state(&self) -> AuthState {
        if !self.initialized {
            AuthState::Unknown
        } else if self.is_authenticated() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("is_authenticated", &self.is_authenticated())
            .field("state", &self.state())
            .finish()
    }
}

/// Whether the persisted token record tracks the in-memory session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persistence {
    Durable,
    /// A storage operation failed. The in-memory session is authoritative
    /// and will not survive a restart.
    MemoryOnly,
}

/// Single source of truth for authentication state.
///
/// All operations take `&self` so one store can be lent to every component
/// through a [`SessionScope`](super::SessionScope). State changes are
/// published as whole snapshots over a `watch` channel.
pub struct SessionStore {
    storage: Box<dyn TokenStorage + Send>,
    navigator: Box<dyn Navigator + Send>,
    destinations: Destinations,
    state: watch::Sender<Session>,
    persistence: Cell<Persistence>,
}

impl SessionStore {
    pub fn new<S, N>(storage: S, navigator: N, destinations: Destinations) -> Self
    where
        S: TokenStorage + Send + 'static,
        N: Navigator + Send + 'static,
    {
        let (state, _) = watch::channel(Session::unknown());
        Self {
            storage: Box::new(storage),
            navigator: Box::new(navigator),
            destinations,
            state,
            persistence: Cell::new(Persistence::Durable),
        }
    }

    /// Load the persisted token. Only the first call reads storage.
    pub fn initialize(&self) -> Session {
        if self.state.borrow().initialized {
            warn!("Session store already initialized; ignoring");
            return self.read();
        }

        let token = match self.storage.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Token storage unavailable, starting signed out");
                self.persistence.set(Persistence::MemoryOnly);
                None
            }
        };

        let session = Session::settled(token);
        debug!(state = ?session.state(), "Session initialized");
        self.state.send_replace(session.clone());
        session
    }

    /// Record a token obtained from a successful sign-in and go to the landing route.
    pub fn login(&self, token: &str) -> Result<(), AuthError> {
        if token.is_empty() {
            return Err(AuthError::EmptyToken);
        }

        match self.storage.set(TOKEN_KEY, token) {
            Ok(()) => self.persistence.set(Persistence::Durable),
            Err(e) => {
                warn!(error = %e, "Failed to persist token; session will not survive restart");
                self.persistence.set(Persistence::MemoryOnly);
            }
        }

        let next = Session::settled(Some(token.to_string()));
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            info!("Signed in");
        }

        self.navigator
            .navigate(Navigation::replace(self.destinations.landing));
        Ok(())
    }

    /// Forget the token and go to sign-in. Safe to call in any state.
    pub fn logout(&self) {
        match self.storage.remove(TOKEN_KEY) {
            Ok(()) => self.persistence.set(Persistence::Durable),
            Err(e) => {
                warn!(error = %e, "Failed to remove persisted token");
                self.persistence.set(Persistence::MemoryOnly);
            }
        }

        let next = Session::settled(None);
        let changed = self.state.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
        if changed {
            info!("Signed out");
        }

        self.navigator
            .navigate(Navigation::replace(self.destinations.sign_in));
    }

    /// Current snapshot.
    pub fn read(&self) -> Session {
        self.state.borrow().clone()
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    pub fn persistence(&self) -> Persistence {
        self.persistence.get()
    }

    pub fn destinations(&self) -> Destinations {
        self.destinations
    }
}
