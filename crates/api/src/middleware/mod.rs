//! Request extractors that run before handlers.
//!
//! - [`auth::AuthUser`] -- Resolves a Bearer session token to its user.

pub mod auth;
