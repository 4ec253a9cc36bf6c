//! Extractors whose rejections use the JSON error body.
//!
//! Axum's stock `Json` and `Path` reject with plain-text 4xx responses;
//! these wrap them so a malformed body or id is a 400 [`AppError`].

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use ordo_core::types::DbId;
use serde::de::DeserializeOwned;

use crate::error::AppError;

pub const INVALID_BODY: &str = "Invalid request body";

/// JSON request body. Any decode failure is `400 Invalid request body`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ValidJson(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "Rejected request body");
                Err(AppError::BadRequest(INVALID_BODY.to_string()))
            }
        }
    }
}

/// Declares a newtype over a numeric `{id}` path segment that rejects
/// anything else with the given message.
macro_rules! path_id {
    ($(#[$meta:meta])* $name:ident, $message:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name(pub DbId);

        impl $name {
            pub const INVALID: &'static str = $message;
        }

        impl<S> FromRequestParts<S> for $name
        where
            S: Send + Sync,
        {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let Path(raw) = Path::<String>::from_request_parts(parts, state)
                    .await
                    .map_err(|_| AppError::BadRequest($message.to_string()))?;
                parse_id(&raw)
                    .map($name)
                    .ok_or_else(|| AppError::BadRequest($message.to_string()))
            }
        }
    };
}

path_id!(
    /// `{id}` of a user.
    UserId,
    "Invalid user ID"
);
path_id!(
    /// `{id}` of a project.
    ProjectId,
    "Invalid project ID"
);
path_id!(
    /// `{id}` of a task.
    TaskId,
    "Invalid task ID"
);

fn parse_id(raw: &str) -> Option<DbId> {
    raw.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("-3"), Some(-3));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("1.5"), None);
        assert_eq!(parse_id(""), None);
    }

    #[test]
    fn messages_name_the_entity() {
        assert_eq!(UserId::INVALID, "Invalid user ID");
        assert_eq!(ProjectId::INVALID, "Invalid project ID");
        assert_eq!(TaskId::INVALID, "Invalid task ID");
    }
}
