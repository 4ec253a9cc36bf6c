pub mod auth;
pub mod project;
pub mod shape;
pub mod task;
pub mod user;
