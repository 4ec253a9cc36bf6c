//! Domain layer for the Ordo backend.
//!
//! Pure types and rules with no I/O: the error taxonomy, the nullable date
//! value type, entity validation and opaque token generation.

pub mod date;
pub mod error;
pub mod token;
pub mod types;
pub mod validation;
