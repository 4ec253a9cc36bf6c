//! Handler for the `/shape` reverse proxy.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use ordo_core::error::CoreError;

use crate::error::{AppError, AppResult};
use crate::proxy::UpstreamResponse;
use crate::state::AppState;

/// GET /shape
///
/// Forwards the query string (plus credentials) to the upstream shape API and
/// replays its response.
pub async fn shape(
    State(state): State<AppState>,
    params: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> AppResult<UpstreamResponse> {
    let Query(params) = params.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected shape query");
        AppError::BadRequest("Invalid request parameters".into())
    })?;

    state.shape_proxy.forward(params).await.map_err(|e| {
        tracing::error!(error = %e, "Shape proxy request failed");
        AppError::Core(CoreError::Upstream(
            "Failed to fetch data from upstream".into(),
        ))
    })
}
