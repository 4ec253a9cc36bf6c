//! User entity model and DTOs.

use ordo_core::error::CoreError;
use ordo_core::types::{DbId, Timestamp};
use ordo_core::validation::validate_user;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user row from the `users` table.
///
/// Users are created either directly through the API or by the Google OAuth
/// callback, in which case `google_id` is set and is the upsert key.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub google_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    pub verified_email: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a user. Missing fields decode as empty and are then
/// rejected by [`CreateUser::validate`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUser {
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub name: String,
}

impl CreateUser {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_user(&self.email, &self.name)
    }
}

/// DTO for `PUT /api/users/{id}`; same shape and rules as creation.
pub type UpdateUser = CreateUser;

/// Profile fields written by the OAuth callback.
#[derive(Debug, Clone)]
pub struct UpsertOAuthUser {
    pub google_id: String,
    pub email: String,
    pub name: String,
    pub picture: Option<String>,
    pub verified_email: bool,
}
