use axum::routing::get;
use axum::Router;

use crate::handlers::shape;
use crate::state::AppState;

/// Mount the shape proxy at root level.
pub fn router() -> Router<AppState> {
    Router::new().route("/shape", get(shape::shape))
}
