//! # cp-contracts
//!
//! Contracts validate project records before they are written. Validation
//! never touches the document collection, so a rejected record costs no
//! round-trip.

pub mod base;
pub mod projects;

pub use base::*;
pub use projects::{validate_for_create, validate_for_update, validate_required};
