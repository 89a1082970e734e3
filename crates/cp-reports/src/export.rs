//! Report export
//!
//! Exporters persist or share a finished [`ReportArtifact`]. The generator
//! never calls them; callers decide when a report leaves the process.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use crate::generator::ReportArtifact;

/// Export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid file name: {0}")]
    InvalidPath(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Where and what was written
#[derive(Debug, Clone)]
pub struct ExportReceipt {
    pub location: PathBuf,
    pub size: u64,
    /// SHA256 digest, hex
    pub digest: String,
    pub exported_at: DateTime<Utc>,
}

/// Destination for finished reports
#[async_trait]
pub trait ReportExporter: Send + Sync {
    async fn export(&self, artifact: &ReportArtifact) -> Result<ExportReceipt, ExportError>;

    /// Exporter name for logging
    fn name(&self) -> &str;
}

/// Writes reports into a local directory
pub struct LocalExporter {
    root: PathBuf,
}

impl LocalExporter {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve_path(&self, file_name: &str) -> Result<PathBuf, ExportError> {
        if file_name.is_empty()
            || file_name.contains("..")
            || file_name.starts_with('/')
            || file_name.starts_with('\\')
        {
            return Err(ExportError::InvalidPath(file_name.to_string()));
        }

        Ok(self.root.join(file_name))
    }

    async fn ensure_parent(&self, path: &Path) -> Result<(), ExportError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    fn calculate_digest(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }
}

#[async_trait]
impl ReportExporter for LocalExporter {
    #[instrument(skip(self, artifact), fields(exporter = "local", file_name = %artifact.file_name))]
    async fn export(&self, artifact: &ReportArtifact) -> Result<ExportReceipt, ExportError> {
        let path = self.resolve_path(&artifact.file_name)?;
        self.ensure_parent(&path).await?;

        let digest = Self::calculate_digest(&artifact.bytes);
        let size = artifact.bytes.len() as u64;

        let mut file = fs::File::create(&path).await?;
        file.write_all(&artifact.bytes).await?;
        file.sync_all().await?;

        debug!(path = ?path, size, "Report written");
        info!(path = ?path, "Report exported");

        Ok(ExportReceipt {
            location: path,
            size,
            digest,
            exported_at: Utc::now(),
        })
    }

    fn name(&self) -> &str {
        "local"
    }
}
