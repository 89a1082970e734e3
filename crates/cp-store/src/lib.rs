//! # cp-store
//!
//! The project store keeps one in-memory snapshot of every project record,
//! mirrored from a remote document collection, and exposes create / update /
//! delete / lookup plus snapshot subscriptions.
//!
//! The snapshot has exactly one writer: the handler receiving the
//! collection's change batches. It is replaced wholesale on every batch, so
//! readers always hold a complete, consistent [`Snapshot`].

pub mod error;
pub mod snapshot;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use snapshot::Snapshot;
pub use store::{DeleteConfirmation, ProjectStore, SnapshotListener};
