pub mod auth;
pub mod health;
pub mod project;
pub mod shape;
pub mod task;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /users                       list, create
/// /users/{id}                  get, update, delete
///
/// /projects                    list, create
/// /projects/{id}               get, update, delete
/// /projects/{id}/with-tasks    project plus its tasks
/// /projects/{id}/tasks         tasks of one project
///
/// /tasks                       list, create
/// /tasks/{id}                  get, update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/users", user::router())
        .nest("/projects", project::router())
        .nest("/tasks", task::router())
}
