//! # cp-db
//!
//! The remote document-collection contract the project store mirrors, plus an
//! in-memory implementation used for local runs and tests.
//!
//! ## Example
//!
//! ```ignore
//! use cp_db::{DocumentCollection, MemoryCollection};
//!
//! let collection = MemoryCollection::new();
//! let id = collection.add_document("projects", document).await?;
//! let stored = collection.get_document("projects", &id).await?;
//! ```

pub mod collection;
pub mod memory;

pub use collection::{
    AdapterError, AdapterResult, ChangeKind, ChangeListener, DocumentChange, DocumentCollection,
};
pub use cp_models::Document;
pub use memory::MemoryCollection;
