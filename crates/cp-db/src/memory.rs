//! In-memory document collection
//!
//! Keeps documents per collection in insertion order and delivers changes to
//! listeners synchronously, before the write call returns. The state lock is
//! held during delivery so batches reach every listener in write order.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use cp_core::Subscription;
use cp_models::Document;
use indexmap::IndexMap;
use tokio::sync::Mutex;
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::collection::{
    AdapterError, AdapterResult, ChangeListener, DocumentChange, DocumentCollection,
};

struct Registration {
    token: u64,
    collection: String,
    listener: ChangeListener,
}

type Registry = parking_lot::Mutex<Vec<Registration>>;

/// In-memory collection store
pub struct MemoryCollection {
    collections: Mutex<HashMap<String, IndexMap<String, Document>>>,
    listeners: Arc<Registry>,
    next_token: AtomicU64,
    available: AtomicBool,
}

impl Default for MemoryCollection {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            listeners: Arc::new(parking_lot::Mutex::new(Vec::new())),
            next_token: AtomicU64::new(1),
            available: AtomicBool::new(true),
        }
    }

    /// Simulate the backend going offline (`false`) or coming back (`true`)
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Insert documents as one batch; `None` ids are generated
    ///
    /// Returns the ids in input order. An existing id is overwritten and
    /// reported as modified.
    pub async fn seed(
        &self,
        name: &str,
        documents: impl IntoIterator<Item = (Option<String>, Document)>,
    ) -> AdapterResult<Vec<String>> {
        self.ensure_available()?;
        let mut collections = self.collections.lock().await;
        let collection = collections.entry(name.to_string()).or_default();

        let mut ids = Vec::new();
        let mut changes = Vec::new();
        for (id, data) in documents {
            let id = id.unwrap_or_else(generate_id);
            let change = if collection.contains_key(&id) {
                DocumentChange::modified(id.clone(), data.clone())
            } else {
                DocumentChange::added(id.clone(), data.clone())
            };
            collection.insert(id.clone(), data);
            ids.push(id);
            changes.push(change);
        }

        debug!(collection = name, count = ids.len(), "Seeded documents");
        self.notify(name, &changes);
        Ok(ids)
    }

    /// Number of documents in `name`
    pub async fn len(&self, name: &str) -> usize {
        self.collections
            .lock()
            .await
            .get(name)
            .map_or(0, |documents| documents.len())
    }

    /// Active listener count across all collections
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn ensure_available(&self) -> AdapterResult<()> {
        if self.available.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(AdapterError::Unavailable("memory collection is offline".to_string()))
        }
    }

    fn listeners_for(&self, name: &str) -> Vec<ChangeListener> {
        self.listeners
            .lock()
            .iter()
            .filter(|registration| registration.collection == name)
            .map(|registration| registration.listener.clone())
            .collect()
    }

    /// Deliver a batch; callers hold the collections lock
    fn notify(&self, name: &str, changes: &[DocumentChange]) {
        for listener in self.listeners_for(name) {
            listener(changes);
        }
    }
}

fn generate_id() -> String {
    Uuid::new_v4().simple().to_string()
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    #[instrument(skip(self, listener), fields(backend = "memory"))]
    async fn subscribe_collection(
        &self,
        name: &str,
        listener: ChangeListener,
    ) -> AdapterResult<Subscription> {
        self.ensure_available()?;
        let collections = self.collections.lock().await;

        let token = self.next_token.fetch_add(1, Ordering::SeqCst);
        self.listeners.lock().push(Registration {
            token,
            collection: name.to_string(),
            listener: listener.clone(),
        });

        let initial: Vec<DocumentChange> = collections
            .get(name)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, data)| DocumentChange::added(id.clone(), data.clone()))
                    .collect()
            })
            .unwrap_or_default();
        listener(&initial);
        drop(collections);

        debug!(collection = name, token, "Listener registered");

        let registry = Arc::downgrade(&self.listeners);
        Ok(Subscription::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.lock().retain(|registration| registration.token != token);
            }
        }))
    }

    #[instrument(skip(self, data), fields(backend = "memory"))]
    async fn add_document(&self, name: &str, data: Document) -> AdapterResult<String> {
        self.ensure_available()?;
        let mut collections = self.collections.lock().await;

        let id = generate_id();
        collections
            .entry(name.to_string())
            .or_default()
            .insert(id.clone(), data.clone());

        debug!(collection = name, id = %id, "Document added");
        self.notify(name, &[DocumentChange::added(id.clone(), data)]);
        Ok(id)
    }

    #[instrument(skip(self, patch), fields(backend = "memory"))]
    async fn update_document(&self, name: &str, id: &str, patch: Document) -> AdapterResult<()> {
        self.ensure_available()?;
        let mut collections = self.collections.lock().await;

        let document = collections
            .get_mut(name)
            .and_then(|documents| documents.get_mut(id))
            .ok_or_else(|| AdapterError::not_found(name, id))?;
        for (key, value) in patch {
            document.insert(key, value);
        }
        let updated = document.clone();

        debug!(collection = name, id, "Document updated");
        self.notify(name, &[DocumentChange::modified(id, updated)]);
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "memory"))]
    async fn delete_document(&self, name: &str, id: &str) -> AdapterResult<()> {
        self.ensure_available()?;
        let mut collections = self.collections.lock().await;

        let removed = collections
            .get_mut(name)
            .and_then(|documents| documents.shift_remove(id))
            .ok_or_else(|| AdapterError::not_found(name, id))?;

        debug!(collection = name, id, "Document deleted");
        self.notify(name, &[DocumentChange::removed(id, removed)]);
        Ok(())
    }

    async fn get_document(&self, name: &str, id: &str) -> AdapterResult<Document> {
        self.ensure_available()?;
        self.collections
            .lock()
            .await
            .get(name)
            .and_then(|documents| documents.get(id))
            .cloned()
            .ok_or_else(|| AdapterError::not_found(name, id))
    }

    fn backend(&self) -> &str {
        "memory"
    }
}
