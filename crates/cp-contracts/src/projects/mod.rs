//! Project contracts

mod base;
mod create;
mod update;

pub use base::{validate_required, ProjectBaseContract};
pub use create::{validate_for_create, CreateProjectContract};
pub use update::{validate_for_update, UpdateProjectContract};
