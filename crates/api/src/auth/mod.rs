//! Google sign-in and session tokens.
//!
//! - [`google`] -- HTTP client for the identity provider.
//! - [`oauth`] -- Login flow state machine and token issue/verify/revoke.
//! - [`store`] -- Ephemeral storage behind the flow.

pub mod google;
pub mod oauth;
pub mod store;
