//! Response bodies shared by several handlers.

use ordo_core::types::DbId;
use serde::Serialize;

/// Body returned by every successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: DbId,
}

impl DeleteResponse {
    pub fn new(entity: &str, id: DbId) -> Self {
        Self {
            message: format!("{entity} deleted successfully"),
            id,
        }
    }
}

/// Delete body for projects, which also reports the cascaded tasks.
#[derive(Debug, Serialize)]
pub struct ProjectDeleteResponse {
    #[serde(flatten)]
    pub deleted: DeleteResponse,
    pub tasks_deleted: u64,
}
