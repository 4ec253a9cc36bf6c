//! Project entity model and DTOs.

use chrono::NaiveDate;
use ordo_core::date::NullableDate;
use ordo_core::error::CoreError;
use ordo_core::types::{DbId, Timestamp};
use ordo_core::validation::validate_project;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::task::Task;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub title: String,
    #[sqlx(try_from = "Option<NaiveDate>")]
    pub start_date: NullableDate,
    #[sqlx(try_from = "Option<NaiveDate>")]
    pub finish_date: NullableDate,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub title: String,
    #[serde(default)]
    pub start_date: NullableDate,
    #[serde(default)]
    pub finish_date: NullableDate,
}

impl CreateProject {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_project(&self.title, self.start_date, self.finish_date)
    }
}

/// DTO for `PUT /api/projects/{id}`. An omitted date clears the column.
pub type UpdateProject = CreateProject;

/// A project together with all of its tasks.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectWithTasks {
    pub project: Project,
    pub tasks: Vec<Task>,
}
