//! Repository for the `users` table.

use ordo_core::types::DbId;
use sqlx::PgPool;

use crate::error::{run, DbError};
use crate::models::user::{CreateUser, UpdateUser, UpsertOAuthUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, email, name, google_id, picture, verified_email, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, DbError> {
        let query = format!(
            "INSERT INTO users (email, name)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        run(
            "user.create",
            sqlx::query_as::<_, User>(&query)
                .bind(&input.email)
                .bind(&input.name)
                .fetch_one(pool),
        )
        .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        run(
            "user.find_by_id",
            sqlx::query_as::<_, User>(&query).bind(id).fetch_optional(pool),
        )
        .await
    }

    /// Find a user by their Google account id.
    pub async fn find_by_google_id(
        pool: &PgPool,
        google_id: &str,
    ) -> Result<Option<User>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE google_id = $1");
        run(
            "user.find_by_google_id",
            sqlx::query_as::<_, User>(&query)
                .bind(google_id)
                .fetch_optional(pool),
        )
        .await
    }

    /// List all users ordered by ID ascending.
    pub async fn list(pool: &PgPool) -> Result<Vec<User>, DbError> {
        let query = format!("SELECT {COLUMNS} FROM users ORDER BY id ASC");
        run(
            "user.list",
            sqlx::query_as::<_, User>(&query).fetch_all(pool),
        )
        .await
    }

    /// Replace a user's email and name.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, DbError> {
        let query = format!(
            "UPDATE users SET
                email = $2,
                name = $3,
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        run(
            "user.update",
            sqlx::query_as::<_, User>(&query)
                .bind(id)
                .bind(&input.email)
                .bind(&input.name)
                .fetch_optional(pool),
        )
        .await
    }

    /// Delete a user by ID. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, DbError> {
        let result = run(
            "user.delete",
            sqlx::query("DELETE FROM users WHERE id = $1")
                .bind(id)
                .execute(pool),
        )
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Insert or refresh a user keyed on `google_id`, in one statement.
    ///
    /// On conflict the profile fields and `updated_at` are overwritten;
    /// `id` and `created_at` keep their original values. Concurrent callbacks
    /// for the same Google account resolve to the same row.
    pub async fn upsert_by_google_id(
        pool: &PgPool,
        input: &UpsertOAuthUser,
    ) -> Result<User, DbError> {
        let query = format!(
            "INSERT INTO users (google_id, email, name, picture, verified_email)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (google_id) DO UPDATE SET
                email = EXCLUDED.email,
                name = EXCLUDED.name,
                picture = EXCLUDED.picture,
                verified_email = EXCLUDED.verified_email,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        run(
            "user.upsert_by_google_id",
            sqlx::query_as::<_, User>(&query)
                .bind(&input.google_id)
                .bind(&input.email)
                .bind(&input.name)
                .bind(&input.picture)
                .bind(input.verified_email)
                .fetch_one(pool),
        )
        .await
    }
}
