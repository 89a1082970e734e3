//! Configuration types and loading
//!
//! Sources are layered: built-in defaults, then an optional TOML file, then
//! `CARPINTERIA__*` environment variables (`CARPINTERIA__REPORT__TITLE=...`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "CARPINTERIA";

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Project store configuration
    pub store: StoreConfig,

    /// Record validation options
    pub validation: ValidationConfig,

    /// Report layout and naming
    pub report: ReportConfig,

    /// Where exported reports land
    pub export: ExportConfig,

    /// Log output
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Name of the mirrored document collection
    pub collection: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            collection: "projects".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject records whose end date precedes their start date
    pub enforce_date_order: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Title line on the first page
    pub title: String,
    /// Heading above the per-project blocks
    pub details_heading: String,
    /// File name handed to the export collaborator
    pub file_name: String,
    /// Measure a whole block before placing it instead of checking the cursor
    /// only at block start
    pub strict_pagination: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "Cantidad de Proyectos por Estado".to_string(),
            details_heading: "Detalles del Proyecto:".to_string(),
            file_name: "proyectos_por_estado.pdf".to_string(),
            strict_pagination: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    /// Output directory for the local exporter
    pub directory: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("exports"),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info,cp_store=debug,cp_reports=debug".to_string(),
            json: false,
        }
    }
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    MissingFile(PathBuf),
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },
    #[error("Config source error: {0}")]
    Source(#[from] config::ConfigError),
}

impl AppConfig {
    /// Load defaults, then `file` (if given), then environment overrides
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&AppConfig::default())?);

        if let Some(path) = file {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
            debug!(path = %path.display(), "Loading config file");
            builder = builder.add_source(config::File::from(path));
        }

        let config: AppConfig = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.store.collection.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "store.collection".to_string(),
                message: "must not be blank".to_string(),
            });
        }
        if self.report.file_name.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "report.file_name".to_string(),
                message: "must not be blank".to_string(),
            });
        }
        Ok(())
    }
}
