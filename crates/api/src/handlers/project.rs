//! Handlers for the `/projects` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use ordo_db::models::project::{CreateProject, Project, ProjectWithTasks, UpdateProject};
use ordo_db::models::task::Task;
use ordo_db::repositories::{ProjectRepo, TaskRepo};

use crate::error::{AppError, AppResult};
use crate::extract::{ProjectId, ValidJson};
use crate::response::{DeleteResponse, ProjectDeleteResponse};
use crate::state::AppState;

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    input.validate()?;
    let project = ProjectRepo::create(&state.pool, &input).await?;
    tracing::info!(project_id = project.id, "Project created");
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(projects))
}

/// GET /api/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    ProjectId(id): ProjectId,
) -> AppResult<Json<Project>> {
    let project = ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project"))?;
    Ok(Json(project))
}

/// PUT /api/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    ProjectId(id): ProjectId,
    ValidJson(input): ValidJson<UpdateProject>,
) -> AppResult<Json<Project>> {
    input.validate()?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::not_found("Project"))?;
    Ok(Json(project))
}

/// DELETE /api/projects/{id}
///
/// Tasks are removed together with the project and counted in the response.
pub async fn delete(
    State(state): State<AppState>,
    ProjectId(id): ProjectId,
) -> AppResult<Json<ProjectDeleteResponse>> {
    let tasks_deleted = ProjectRepo::delete_with_tasks(&state.pool, id)
        .await?
        .ok_or(AppError::not_found("Project"))?;
    tracing::info!(project_id = id, tasks_deleted, "Project deleted");

    Ok(Json(ProjectDeleteResponse {
        deleted: DeleteResponse::new("Project", id),
        tasks_deleted,
    }))
}

/// GET /api/projects/{id}/with-tasks
pub async fn get_with_tasks(
    State(state): State<AppState>,
    ProjectId(id): ProjectId,
) -> AppResult<Json<ProjectWithTasks>> {
    let loaded = ProjectRepo::find_with_tasks(&state.pool, id).await?;
    Ok(Json(loaded))
}

/// GET /api/projects/{id}/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    ProjectId(id): ProjectId,
) -> AppResult<Json<Vec<Task>>> {
    if !ProjectRepo::exists(&state.pool, id).await? {
        return Err(AppError::not_found("Project"));
    }
    let tasks = TaskRepo::list_by_project(&state.pool, id).await?;
    Ok(Json(tasks))
}
