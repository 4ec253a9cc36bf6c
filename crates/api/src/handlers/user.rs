//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ordo_db::models::user::{CreateUser, UpdateUser, User};
use ordo_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{UserId, ValidJson};
use crate::response::DeleteResponse;
use crate::state::AppState;

/// POST /api/users
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateUser>,
) -> AppResult<(StatusCode, Json<User>)> {
    input.validate()?;
    let user = UserRepo::create(&state.pool, &input).await?;
    tracing::info!(user_id = user.id, "User created");
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<User>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/users/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> AppResult<Json<User>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("User"))?;
    Ok(Json(user))
}

/// PUT /api/users/{id}
pub async fn update(
    State(state): State<AppState>,
    UserId(id): UserId,
    ValidJson(input): ValidJson<UpdateUser>,
) -> AppResult<Json<User>> {
    input.validate()?;
    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("User"))?;
    Ok(Json(user))
}

/// DELETE /api/users/{id}
pub async fn delete(
    State(state): State<AppState>,
    UserId(id): UserId,
) -> AppResult<Json<DeleteResponse>> {
    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("User"));
    }
    tracing::info!(user_id = id, "User deleted");
    Ok(Json(DeleteResponse::new("User", id)))
}
