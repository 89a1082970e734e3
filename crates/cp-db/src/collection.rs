//! Document-collection adapter contract

use std::sync::Arc;

use async_trait::async_trait;
use cp_core::Subscription;
use cp_models::Document;
use thiserror::Error;

/// Error type for adapter calls
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("Document not found: {collection}/{id}")]
    NotFound { collection: String, id: String },

    #[error("Collection unavailable: {0}")]
    Unavailable(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

impl AdapterError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for adapter calls
pub type AdapterResult<T> = Result<T, AdapterError>;

/// What happened to a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// One document change as reported by the collection
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentChange {
    pub kind: ChangeKind,
    pub id: String,
    /// Full document after the change (the last known body for removals)
    pub data: Document,
}

impl DocumentChange {
    pub fn added(id: impl Into<String>, data: Document) -> Self {
        Self {
            kind: ChangeKind::Added,
            id: id.into(),
            data,
        }
    }

    pub fn modified(id: impl Into<String>, data: Document) -> Self {
        Self {
            kind: ChangeKind::Modified,
            id: id.into(),
            data,
        }
    }

    pub fn removed(id: impl Into<String>, data: Document) -> Self {
        Self {
            kind: ChangeKind::Removed,
            id: id.into(),
            data,
        }
    }
}

/// Callback receiving batches of changes, one batch per delivery
///
/// Batches arrive in the order the collection produced them. A listener must
/// not write to the collection from inside the callback.
pub type ChangeListener = Arc<dyn Fn(&[DocumentChange]) + Send + Sync>;

/// Remote document collection
///
/// The first delivery after `subscribe_collection` reports every existing
/// document as `Added` (an empty batch for an empty collection).
#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// Register for change batches on collection `name`
    async fn subscribe_collection(
        &self,
        name: &str,
        listener: ChangeListener,
    ) -> AdapterResult<Subscription>;

    /// Store a new document and return its generated id
    async fn add_document(&self, name: &str, data: Document) -> AdapterResult<String>;

    /// Merge `patch` into an existing document
    async fn update_document(&self, name: &str, id: &str, patch: Document) -> AdapterResult<()>;

    /// Remove a document
    async fn delete_document(&self, name: &str, id: &str) -> AdapterResult<()>;

    /// Fetch one document
    async fn get_document(&self, name: &str, id: &str) -> AdapterResult<Document>;

    /// Backend name for logging
    fn backend(&self) -> &str;
}
