//! Authentication module for the client-side session gate.
//!
//! This module provides:
//! - `SessionStore`: owns the bearer token and persists it through a `TokenStorage`
//! - `SessionScope`: lends the store to components that need to read it
//! - `PublicGuard` / `PrivateGuard`: decide between rendering and redirecting
//!
//! Tokens are opaque; expiry is only discovered when the backend answers 401.

pub mod guard;
pub mod scope;
pub mod session;

use thiserror::Error;

pub use guard::{GuardView, PrivateGuard, PublicGuard};
pub use scope::SessionScope;
pub use session::{AuthState, Persistence, Session, SessionStore};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AuthError {
    #[error("Refusing to sign in with an empty token")]
    EmptyToken,

    #[error("Session read outside of a session provider")]
    OutsideProvider,
}
