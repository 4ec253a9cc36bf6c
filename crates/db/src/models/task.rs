//! Task entity model and DTOs.

use chrono::NaiveDate;
use ordo_core::date::NullableDate;
use ordo_core::error::CoreError;
use ordo_core::types::{DbId, Timestamp};
use ordo_core::validation::validate_task;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A task row from the `tasks` table. Always belongs to one project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: String,
    #[sqlx(try_from = "Option<NaiveDate>")]
    pub start_date: NullableDate,
    #[sqlx(try_from = "Option<NaiveDate>")]
    pub finish_date: NullableDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a task.
///
/// A missing `project_id` decodes as `0` and fails validation, so clients get
/// the rule message rather than a decode error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTask {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub project_id: DbId,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub description: String,
    #[serde(default)]
    pub start_date: NullableDate,
    #[serde(default)]
    pub finish_date: NullableDate,
}

impl CreateTask {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_task(self.project_id, &self.title, self.start_date, self.finish_date)
    }
}

/// DTO for `PUT /api/tasks/{id}`. A task may move to another project.
pub type UpdateTask = CreateTask;
