//! OAuth login flow and the session tokens it issues.
//!
//! One login attempt moves through: start (state recorded, consent URL
//! returned) → callback (state consumed, code exchanged, profile fetched,
//! user upserted) → token issued. Tokens have a fixed lifetime set at issue
//! and are evicted lazily the first time they are seen expired.

use std::sync::Arc;

use chrono::TimeDelta;
use ordo_core::token::{generate_token, TokenGenerationError, SESSION_TOKEN_BYTES, STATE_BYTES};
use ordo_core::types::DbId;
use ordo_db::models::user::{UpsertOAuthUser, User};
use ordo_db::repositories::UserRepo;
use ordo_db::{DbError, DbPool};
use reqwest::Url;
use serde::Serialize;

use crate::auth::google::{GoogleClient, GoogleError};
use crate::auth::store::{EphemeralStore, Expiring};

/// How long a login attempt may take between start and callback, in seconds.
pub const STATE_TTL_SECS: i64 = 10 * 60;

/// Lifetime of an issued session token, in seconds.
pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Identity bound to an issued token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TokenUser {
    pub id: DbId,
    pub email: String,
    pub name: String,
    pub picture: String,
    pub verified_email: bool,
}

impl From<&User> for TokenUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            picture: user.picture.clone().unwrap_or_default(),
            verified_email: user.verified_email,
        }
    }
}

/// A live session: the bound identity plus issue and expiry times.
pub type AuthToken = Expiring<TokenUser>;

/// Why a callback could not complete. Each maps to a short reason code that
/// is passed back to the frontend.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("authorization code not provided")]
    MissingCode,

    #[error("state missing, unknown or expired")]
    InvalidState,

    #[error("token exchange failed: {0}")]
    TokenExchange(#[source] GoogleError),

    #[error("user info request failed: {0}")]
    UserInfo(#[source] GoogleError),

    #[error("user upsert failed: {0}")]
    Database(#[source] DbError),

    #[error(transparent)]
    TokenGeneration(#[from] TokenGenerationError),
}

impl CallbackError {
    pub fn reason(&self) -> &'static str {
        match self {
            CallbackError::MissingCode => "authorization_code_not_provided",
            CallbackError::InvalidState => "invalid_state",
            CallbackError::TokenExchange(_) => "token_exchange_failed",
            CallbackError::UserInfo(_) => "user_info_failed",
            CallbackError::Database(_) => "database_error",
            CallbackError::TokenGeneration(_) => "token_generation_failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    #[error("Invalid token")]
    Invalid,

    #[error("Token expired")]
    Expired,
}

pub struct OAuthManager {
    google: GoogleClient,
    states: Arc<dyn EphemeralStore<()>>,
    tokens: Arc<dyn EphemeralStore<TokenUser>>,
    token_ttl: TimeDelta,
}

impl OAuthManager {
    pub fn new(
        google: GoogleClient,
        states: Arc<dyn EphemeralStore<()>>,
        tokens: Arc<dyn EphemeralStore<TokenUser>>,
    ) -> Self {
        Self {
            google,
            states,
            tokens,
            token_ttl: TimeDelta::seconds(TOKEN_TTL_SECS),
        }
    }

    /// Override the lifetime of tokens issued from now on.
    pub fn with_token_ttl(mut self, ttl: TimeDelta) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Record a fresh state value and return the consent URL carrying it.
    pub async fn begin(&self) -> Result<Url, TokenGenerationError> {
        let state = generate_token(STATE_BYTES)?;
        self.states
            .put(state.clone(), (), TimeDelta::seconds(STATE_TTL_SECS))
            .await;
        Ok(self.google.authorization_url(&state))
    }

    /// Finish a login attempt and return the new session token.
    pub async fn complete(
        &self,
        pool: &DbPool,
        code: Option<&str>,
        state: Option<&str>,
    ) -> Result<String, CallbackError> {
        let code = code.filter(|c| !c.is_empty()).ok_or(CallbackError::MissingCode)?;
        self.consume_state(state).await?;

        let tokens = self
            .google
            .exchange_code(code)
            .await
            .map_err(CallbackError::TokenExchange)?;

        let profile = self
            .google
            .fetch_profile(&tokens.access_token)
            .await
            .map_err(CallbackError::UserInfo)?;

        let user = UserRepo::upsert_by_google_id(
            pool,
            &UpsertOAuthUser {
                google_id: profile.id,
                email: profile.email,
                name: profile.name,
                picture: profile.picture,
                verified_email: profile.verified_email,
            },
        )
        .await
        .map_err(CallbackError::Database)?;

        let token = self.issue(&user).await?;
        tracing::info!(user_id = user.id, "OAuth login completed");
        Ok(token)
    }

    async fn consume_state(&self, state: Option<&str>) -> Result<(), CallbackError> {
        let state = state.filter(|s| !s.is_empty()).ok_or(CallbackError::InvalidState)?;
        match self.states.take(state).await {
            Some(entry) if !entry.is_expired() => Ok(()),
            _ => Err(CallbackError::InvalidState),
        }
    }

    /// Issue a session token bound to `user`.
    pub async fn issue(&self, user: &User) -> Result<String, TokenGenerationError> {
        let token = generate_token(SESSION_TOKEN_BYTES)?;
        self.tokens
            .put(token.clone(), TokenUser::from(user), self.token_ttl)
            .await;
        Ok(token)
    }

    /// Look up a session token. An expired token is evicted on this call,
    /// so the next lookup reports it as unknown.
    pub async fn verify(&self, token: &str) -> Result<AuthToken, VerifyError> {
        let entry = self.tokens.get(token).await.ok_or(VerifyError::Invalid)?;
        if entry.is_expired() {
            self.tokens.delete(token).await;
            return Err(VerifyError::Expired);
        }
        Ok(entry)
    }

    /// Drop a session token. Returns whether it existed.
    pub async fn revoke(&self, token: &str) -> bool {
        self.tokens.delete(token).await
    }
}
