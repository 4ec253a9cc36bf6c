//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO whose `validate` runs the domain rules
//! - An update DTO (PUT replaces every mutable field)

use serde::{Deserialize, Deserializer};

pub mod project;
pub mod task;
pub mod user;

/// Decode an explicit JSON `null` the same way as an omitted field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
