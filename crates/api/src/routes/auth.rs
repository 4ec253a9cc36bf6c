//! Route definitions for `/auth`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// GET  /google/login      -> google_login (redirect to consent screen)
/// GET  /google/callback   -> google_callback (redirect to frontend)
/// GET  /verify            -> verify (Bearer token)
/// POST /logout            -> logout (Bearer token)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/google/login", get(auth::google_login))
        .route("/google/callback", get(auth::google_callback))
        .route("/verify", get(auth::verify))
        .route("/logout", post(auth::logout))
}
