//! # cp-models
//!
//! Domain models for carpentry-shop project records.
//!
//! A [`Project`] serializes to the stored document shape: the Spanish field
//! keys (`nombreProyecto`, `precioProducto`, ...) and the two literal status
//! strings are fixed so existing data keeps round-tripping.

pub mod dates;
pub mod project;
pub mod status;

mod lenient;

pub use dates::{format_display_date, parse_display_date};
pub use project::{Document, Project, ProjectField, ProjectId, ProjectInput, ProjectPatch};
pub use status::{ProjectStatus, StatusValue};
