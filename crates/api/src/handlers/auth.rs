//! Handlers for the `/auth` resource (Google login, verify, logout).
//!
//! Login and callback always answer with a redirect: failures send the
//! browser back to the frontend with `?error=<reason>`, success with
//! `?token=<token>`.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use ordo_core::types::Timestamp;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::auth::oauth::TokenUser;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query string Google sends to the callback.
#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenInfo {
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
}

/// Response for `GET /auth/verify`.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub user: TokenUser,
    pub token_info: TokenInfo,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /auth/google/login
pub async fn google_login(State(state): State<AppState>) -> Redirect {
    match state.oauth.begin().await {
        Ok(url) => Redirect::temporary(url.as_str()),
        Err(e) => {
            tracing::error!(error = %e, "Could not start OAuth login");
            frontend_redirect(&state.config.frontend_url, "error", "token_generation_failed")
        }
    }
}

/// GET /auth/google/callback
pub async fn google_callback(
    State(state): State<AppState>,
    params: Result<Query<CallbackParams>, QueryRejection>,
) -> Redirect {
    let frontend = &state.config.frontend_url;
    let params = params.map(|Query(p)| p).unwrap_or_default();

    if let Some(error) = params.error.as_deref() {
        tracing::warn!(error, "Identity provider returned an error");
        return frontend_redirect(frontend, "error", error);
    }

    match state
        .oauth
        .complete(&state.pool, params.code.as_deref(), params.state.as_deref())
        .await
    {
        Ok(token) => frontend_redirect(frontend, "token", &token),
        Err(e) => {
            tracing::warn!(error = %e, reason = e.reason(), "OAuth callback failed");
            frontend_redirect(frontend, "error", e.reason())
        }
    }
}

/// GET /auth/verify
pub async fn verify(auth: AuthUser) -> Json<VerifyResponse> {
    let session = auth.session;
    Json(VerifyResponse {
        user: session.value,
        token_info: TokenInfo {
            created_at: session.created_at,
            expires_at: session.expires_at,
        },
    })
}

/// POST /auth/logout
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    state.oauth.revoke(&auth.token).await;
    tracing::info!(user_id = auth.session.value.id, "Session token revoked");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `<frontend>/?<key>=<value>`, with `value` query-encoded.
fn frontend_redirect(frontend: &Url, key: &str, value: &str) -> Redirect {
    Redirect::temporary(frontend_url_with(frontend, key, value).as_str())
}

fn frontend_url_with(frontend: &Url, key: &str, value: &str) -> Url {
    let mut url = frontend.clone();
    let path = format!("{}/", url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_query(None);
    url.query_pairs_mut().append_pair(key, value);
    url
}
