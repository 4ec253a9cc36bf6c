//! Handlers for the `/tasks` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ordo_core::error::CoreError;
use ordo_core::types::DbId;
use ordo_db::models::task::{CreateTask, Task, UpdateTask};
use ordo_db::repositories::{ProjectRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{TaskId, ValidJson};
use crate::response::DeleteResponse;
use crate::state::AppState;

/// POST /api/tasks
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    input.validate()?;
    ensure_project_exists(&state, input.project_id).await?;
    let task = TaskRepo::create(&state.pool, &input).await?;
    tracing::info!(task_id = task.id, project_id = task.project_id, "Task created");
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/tasks
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Task>>> {
    let tasks = TaskRepo::list(&state.pool).await?;
    Ok(Json(tasks))
}

/// GET /api/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    TaskId(id): TaskId,
) -> AppResult<Json<Task>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Task"))?;
    Ok(Json(task))
}

/// PUT /api/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    TaskId(id): TaskId,
    ValidJson(input): ValidJson<UpdateTask>,
) -> AppResult<Json<Task>> {
    input.validate()?;
    ensure_project_exists(&state, input.project_id).await?;
    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Task"))?;
    Ok(Json(task))
}

/// DELETE /api/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    TaskId(id): TaskId,
) -> AppResult<Json<DeleteResponse>> {
    if !TaskRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Task"));
    }
    Ok(Json(DeleteResponse::new("Task", id)))
}

/// A task's project is a reference, so its absence is a bad request.
async fn ensure_project_exists(state: &AppState, project_id: DbId) -> AppResult<()> {
    if ProjectRepo::exists(&state.pool, project_id).await? {
        Ok(())
    } else {
        Err(CoreError::Referential("Project not found".into()).into())
    }
}
