//! Repository for the `tasks` table.

use ordo_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::error::{run, DbError};
use crate::models::task::{CreateTask, Task, UpdateTask};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, project_id, title, description, start_date, finish_date, created_at, updated_at";

/// Ordering for tasks listed under a project. Undated tasks sort last.
const PROJECT_ORDER: &str = "start_date ASC NULLS LAST, created_at ASC, id ASC";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task, returning the created row.
    ///
    /// A `project_id` with no matching project fails with a foreign-key
    /// violation.
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, DbError> {
        let query = format!(
            "INSERT INTO tasks (project_id, title, description, start_date, finish_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        run(
            "task.create",
            sqlx::query_as::<_, Task>(&query)
                .bind(input.project_id)
                .bind(&input.title)
                .bind(&input.description)
                .bind(input.start_date.to_storage_form())
                .bind(input.finish_date.to_storage_form())
                .fetch_one(pool),
        )
        .await
    }

    /// Find a task by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        run(
            "task.find_by_id",
            sqlx::query_as::<_, Task>(&query).bind(id).fetch_optional(pool),
        )
        .await
    }

    /// List all tasks ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Task>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM tasks ORDER BY created_at DESC, id DESC");
        run("task.list", sqlx::query_as::<_, Task>(&query).fetch_all(pool)).await
    }

    /// List the tasks of one project, earliest start date first.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Task>, DbError> {
        run(
            "task.list_by_project",
            Self::fetch_by_project(pool, project_id),
        )
        .await
    }

    /// Replace every mutable field of a task, including its project.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, DbError> {
        let query = format!(
            "UPDATE tasks SET
                project_id = $2,
                title = $3,
                description = $4,
                start_date = $5,
                finish_date = $6,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        run(
            "task.update",
            sqlx::query_as::<_, Task>(&query)
                .bind(id)
                .bind(input.project_id)
                .bind(&input.title)
                .bind(&input.description)
                .bind(input.start_date.to_storage_form())
                .bind(input.finish_date.to_storage_form())
                .fetch_optional(pool),
        )
        .await
    }

    /// Delete a task by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        let result = run(
            "task.delete",
            sqlx::query("DELETE FROM tasks WHERE id = $1")
                .bind(id)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every task of a project, returning how many were removed.
    pub async fn delete_for_project(pool: &PgPool, project_id: DbId) -> Result<u64, DbError> {
        let result = run(
            "task.delete_for_project",
            sqlx::query("DELETE FROM tasks WHERE project_id = $1")
                .bind(project_id)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected())
    }

    /// Count the tasks of a project.
    pub async fn count_for_project(pool: &PgPool, project_id: DbId) -> Result<i64, DbError> {
        run(
            "task.count_for_project",
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM tasks WHERE project_id = $1")
                .bind(project_id)
                .fetch_one(pool),
        )
        .await
    }

    pub(crate) async fn fetch_by_project<'e, E>(
        executor: E,
        project_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE project_id = $1 ORDER BY {PROJECT_ORDER}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }
}
