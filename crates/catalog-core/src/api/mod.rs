//! REST API client module for the catalog backend.
//!
//! This module provides the `ApiClient` for signing in and fetching the
//! author, article, institution and award lists.
//!
//! Data endpoints expect the session token as a bearer credential. A 401
//! from any of them surfaces as `ApiError::Unauthorized`, which callers
//! answer by signing the session out.

pub mod client;
pub mod error;

pub use client::ApiClient;
pub use error::ApiError;
