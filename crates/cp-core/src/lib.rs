//! # cp-core
//!
//! Core building blocks shared by every Carpinteria crate:
//! - Field-keyed validation errors
//! - Application configuration
//! - Idempotent subscription handles

pub mod config;
pub mod error;
pub mod subscription;

pub use config::{AppConfig, ConfigError};
pub use error::ValidationErrors;
pub use subscription::Subscription;
