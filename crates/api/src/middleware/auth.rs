//! Session-token authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use crate::auth::oauth::{AuthToken, VerifyError};
use crate::error::AppError;
use crate::state::AppState;

pub const HEADER_MISSING: &str = "Authorization header missing";
pub const HEADER_MALFORMED: &str = "Invalid authorization header format";

/// Caller identified by an `Authorization: Bearer <token>` header.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.session.value.id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The raw token, needed to revoke it.
    pub token: String,
    pub session: AuthToken,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or_else(|| AppError::unauthorized(HEADER_MISSING))?;

        let token = header
            .to_str()
            .ok()
            .and_then(|v| v.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::unauthorized(HEADER_MALFORMED))?;

        let session = state.oauth.verify(token).await.map_err(|e| {
            if e == VerifyError::Expired {
                tracing::debug!("Rejected expired session token");
            }
            AppError::unauthorized(&e.to_string())
        })?;

        Ok(AuthUser {
            token: token.to_string(),
            session,
        })
    }
}
