use std::sync::Arc;

use crate::auth::oauth::OAuthManager;
use crate::config::ServerConfig;
use crate::proxy::ShapeProxy;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ordo_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Login flow plus the session token store.
    pub oauth: Arc<OAuthManager>,
    /// Client for the upstream shape API.
    pub shape_proxy: ShapeProxy,
}
