//! Error type shared by all repositories, plus the deadline helpers that
//! produce it.

use std::future::Future;
use std::time::Duration;

/// Deadline for a single CRUD statement.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Deadline for reads that span several statements (project + tasks).
pub const COMPOSITE_QUERY_TIMEOUT: Duration = Duration::from_secs(15);

/// PostgreSQL `foreign_key_violation`.
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

/// PostgreSQL `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The statement reached the database and failed.
    #[error("{operation} failed: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    /// The operation did not finish before its deadline.
    #[error("{operation} timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    /// A composite read could not find its root row.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
}

impl DbError {
    fn database_code(&self) -> Option<String> {
        match self {
            DbError::Query {
                source: sqlx::Error::Database(db_err),
                ..
            } => db_err.code().map(|c| c.into_owned()),
            _ => None,
        }
    }

    /// Constraint named by the underlying database error, if any.
    pub fn constraint(&self) -> Option<&str> {
        match self {
            DbError::Query {
                source: sqlx::Error::Database(db_err),
                ..
            } => db_err.constraint(),
            _ => None,
        }
    }

    pub fn is_foreign_key_violation(&self) -> bool {
        self.database_code().as_deref() == Some(PG_FOREIGN_KEY_VIOLATION)
    }

    pub fn is_unique_violation(&self) -> bool {
        self.database_code().as_deref() == Some(PG_UNIQUE_VIOLATION)
    }
}

/// Run `fut` under `limit`, mapping expiry to [`DbError::Timeout`].
///
/// Dropping the timed-out future drops any pooled connection it holds, which
/// returns the connection to the pool.
pub(crate) async fn with_deadline<T, F>(
    operation: &'static str,
    limit: Duration,
    fut: F,
) -> Result<T, DbError>
where
    F: Future<Output = Result<T, DbError>>,
{
    match tokio::time::timeout(limit, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(operation, ?limit, "Database operation timed out");
            Err(DbError::Timeout {
                operation,
                after: limit,
            })
        }
    }
}

/// Run a single sqlx statement under [`QUERY_TIMEOUT`].
pub(crate) async fn run<T, F>(operation: &'static str, fut: F) -> Result<T, DbError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    with_deadline(operation, QUERY_TIMEOUT, async move {
        fut.await.map_err(|source| DbError::Query { operation, source })
    })
    .await
}

/// Wrap a sqlx error with the name of the operation that produced it.
pub(crate) fn query_error(operation: &'static str) -> impl FnOnce(sqlx::Error) -> DbError {
    move |source| DbError::Query { operation, source }
}
