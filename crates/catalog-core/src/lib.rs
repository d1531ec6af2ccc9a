//! Core library for the catalog admin console.
//!
//! Holds everything that does not touch the terminal: the session store and
//! route guards, token storage backends, the REST client, data models, and
//! configuration. The TUI crate drives these from its event loop.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod navigation;
pub mod routes;
pub mod shell;
pub mod storage;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, GuardView, PrivateGuard, PublicGuard, SessionScope, SessionStore};
pub use config::Config;
pub use navigation::{Navigation, Navigator, Router};
pub use routes::{Destinations, Route};
pub use shell::NavShell;
