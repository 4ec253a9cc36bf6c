//! Repository for the `projects` table.

use ordo_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::error::{query_error, run, with_deadline, DbError, COMPOSITE_QUERY_TIMEOUT};
use crate::models::project::{CreateProject, Project, ProjectWithTasks, UpdateProject};
use crate::repositories::TaskRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, start_date, finish_date, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, DbError> {
        let query = format!(
            "INSERT INTO projects (title, start_date, finish_date)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        run(
            "project.create",
            sqlx::query_as::<_, Project>(&query)
                .bind(&input.title)
                .bind(input.start_date.to_storage_form())
                .bind(input.finish_date.to_storage_form())
                .fetch_one(pool),
        )
        .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, DbError> {
        run("project.find_by_id", Self::fetch_by_id(pool, id)).await
    }

    /// Whether a project with the given ID exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        run(
            "project.exists",
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM projects WHERE id = $1)")
                .bind(id)
                .fetch_one(pool),
        )
        .await
    }

    /// List all projects ordered by most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY created_at DESC, id DESC");
        run(
            "project.list",
            sqlx::query_as::<_, Project>(&query).fetch_all(pool),
        )
        .await
    }

    /// Replace a project's title and dates.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, DbError> {
        let query = format!(
            "UPDATE projects SET
                title = $2,
                start_date = $3,
                finish_date = $4,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        run(
            "project.update",
            sqlx::query_as::<_, Project>(&query)
                .bind(id)
                .bind(&input.title)
                .bind(input.start_date.to_storage_form())
                .bind(input.finish_date.to_storage_form())
                .fetch_optional(pool),
        )
        .await
    }

    /// Delete a project by ID. Its tasks go with it (`ON DELETE CASCADE`).
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        let result = run(
            "project.delete",
            sqlx::query("DELETE FROM projects WHERE id = $1")
                .bind(id)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a project and its tasks in one transaction.
    ///
    /// The project row is locked first, so no task can be attached between
    /// the task delete and the project delete. Returns the number of tasks
    /// removed, or `None` when the project does not exist.
    pub async fn delete_with_tasks(pool: &PgPool, id: DbId) -> Result<Option<u64>, DbError> {
        const OPERATION: &str = "project.delete_with_tasks";

        with_deadline(OPERATION, COMPOSITE_QUERY_TIMEOUT, async {
            let mut tx = pool.begin().await.map_err(query_error(OPERATION))?;

            let locked = sqlx::query_scalar::<_, DbId>(
                "SELECT id FROM projects WHERE id = $1 FOR UPDATE",
            )
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_error(OPERATION))?;
            if locked.is_none() {
                return Ok(None);
            }

            let tasks_deleted = sqlx::query("DELETE FROM tasks WHERE project_id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(query_error(OPERATION))?
                .rows_affected();

            sqlx::query("DELETE FROM projects WHERE id = $1")
                .bind(id)
                .execute(&mut *tx)
                .await
                .map_err(query_error(OPERATION))?;

            tx.commit().await.map_err(query_error(OPERATION))?;
            Ok(Some(tasks_deleted))
        })
        .await
    }

    /// Load a project and its tasks as one consistent read.
    ///
    /// Both statements run in a single read-only repeatable-read transaction
    /// and share one deadline. Fails with [`DbError::NotFound`] when the
    /// project does not exist.
    pub async fn find_with_tasks(pool: &PgPool, id: DbId) -> Result<ProjectWithTasks, DbError> {
        const OPERATION: &str = "project.find_with_tasks";

        with_deadline(OPERATION, COMPOSITE_QUERY_TIMEOUT, async {
            let mut tx = pool.begin().await.map_err(query_error(OPERATION))?;
            sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ READ ONLY")
                .execute(&mut *tx)
                .await
                .map_err(query_error(OPERATION))?;

            let project = Self::fetch_by_id(&mut *tx, id)
                .await
                .map_err(query_error(OPERATION))?
                .ok_or(DbError::NotFound { entity: "Project" })?;

            let tasks = TaskRepo::fetch_by_project(&mut *tx, id)
                .await
                .map_err(query_error(OPERATION))?;

            tx.commit().await.map_err(query_error(OPERATION))?;
            Ok(ProjectWithTasks { project, tasks })
        })
        .await
    }

    async fn fetch_by_id<'e, E>(executor: E, id: DbId) -> Result<Option<Project>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
