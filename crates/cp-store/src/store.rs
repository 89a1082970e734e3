//! Project store
//!
//! Attaches to one collection on [`ProjectStore::connect`] and mirrors it.
//! Writes go to the collection only; the local snapshot changes when the
//! collection echoes the write back as a change batch.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use cp_contracts::{validate_for_create, validate_for_update};
use cp_core::config::ValidationConfig;
use cp_core::{AppConfig, Subscription};
use cp_db::{AdapterError, ChangeKind, ChangeListener, Document, DocumentChange, DocumentCollection};
use cp_models::{Project, ProjectId, ProjectInput, ProjectPatch};
use indexmap::IndexMap;
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::error::{StoreError, StoreResult};
use crate::snapshot::Snapshot;

/// Callback receiving every new snapshot
pub type SnapshotListener = Arc<dyn Fn(&Snapshot) + Send + Sync>;

/// Explicit confirmation required by [`ProjectStore::delete`]
///
/// Deletion is irreversible; callers obtain this only after the user
/// confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteConfirmation(());

impl DeleteConfirmation {
    pub fn confirmed() -> Self {
        Self(())
    }
}

/// State shared with the collection listener
struct Mirror {
    collection: String,
    records: Mutex<IndexMap<ProjectId, Project>>,
    current: RwLock<Snapshot>,
    synced: AtomicBool,
    // Serializes snapshot publication with initial delivery to new
    // subscribers. Reentrant so a callback may subscribe again.
    delivery: ReentrantMutex<()>,
    subscribers: Mutex<Vec<(u64, SnapshotListener)>>,
    next_token: AtomicU64,
}

impl Mirror {
    fn new(collection: String) -> Self {
        Self {
            collection,
            records: Mutex::new(IndexMap::new()),
            current: RwLock::new(Snapshot::default()),
            synced: AtomicBool::new(false),
            delivery: ReentrantMutex::new(()),
            subscribers: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(1),
        }
    }

    /// Fold one change batch into the records and publish the result
    fn apply(&self, changes: &[DocumentChange]) {
        let _delivery = self.delivery.lock();

        let snapshot = {
            let mut records = self.records.lock();
            for change in changes {
                let id = ProjectId::new(change.id.as_str());
                match change.kind {
                    ChangeKind::Added | ChangeKind::Modified => {
                        let project = Project::from_document(id.clone(), &change.data);
                        if !project.status.is_known() {
                            debug!(id = %id, status = project.status.as_str(), "Record has unrecognized status");
                        }
                        // Existing keys keep their position.
                        records.insert(id, project);
                    }
                    ChangeKind::Removed => {
                        if records.shift_remove(&id).is_none() {
                            warn!(id = %id, "Removal for unknown record");
                        }
                    }
                }
            }
            records.values().cloned().collect::<Snapshot>()
        };

        *self.current.write() = snapshot.clone();
        self.synced.store(true, Ordering::SeqCst);
        debug!(
            collection = %self.collection,
            changes = changes.len(),
            records = snapshot.len(),
            "Snapshot replaced"
        );

        self.publish(&snapshot);
    }

    fn publish(&self, snapshot: &Snapshot) {
        let listeners: Vec<SnapshotListener> = self
            .subscribers
            .lock()
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener(snapshot);
        }
    }

    fn snapshot(&self) -> Snapshot {
        self.current.read().clone()
    }
}

/// Live mirror of the project collection
pub struct ProjectStore {
    adapter: Arc<dyn DocumentCollection>,
    mirror: Arc<Mirror>,
    attachment: Subscription,
    validation: ValidationConfig,
}

impl ProjectStore {
    /// Attach to the configured collection
    ///
    /// The collection delivers its current contents before this returns, so
    /// lookups work immediately for adapters that deliver synchronously.
    #[instrument(skip_all, fields(collection = %config.store.collection))]
    pub async fn connect(
        adapter: Arc<dyn DocumentCollection>,
        config: &AppConfig,
    ) -> StoreResult<Self> {
        let mirror = Arc::new(Mirror::new(config.store.collection.clone()));

        let weak: Weak<Mirror> = Arc::downgrade(&mirror);
        let listener: ChangeListener = Arc::new(move |changes: &[DocumentChange]| {
            if let Some(mirror) = weak.upgrade() {
                mirror.apply(changes);
            }
        });

        let attachment = adapter
            .subscribe_collection(&mirror.collection, listener)
            .await
            .map_err(|e| {
                warn!(collection = %mirror.collection, error = %e, "Failed to attach");
                StoreError::Adapter(e)
            })?;

        info!(
            collection = %mirror.collection,
            records = mirror.snapshot().len(),
            "Project store attached"
        );

        Ok(Self {
            adapter,
            mirror,
            attachment,
            validation: config.validation.clone(),
        })
    }

    /// Name of the mirrored collection
    pub fn collection(&self) -> &str {
        &self.mirror.collection
    }

    /// Whether the first batch has arrived
    pub fn is_synced(&self) -> bool {
        self.mirror.synced.load(Ordering::SeqCst)
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.mirror.snapshot()
    }

    /// Register `listener` for every future snapshot
    ///
    /// Once the store is synced the current snapshot is delivered
    /// immediately, before this returns.
    pub fn subscribe(&self, listener: impl Fn(&Snapshot) + Send + Sync + 'static) -> Subscription {
        let listener: SnapshotListener = Arc::new(listener);
        let _delivery = self.mirror.delivery.lock();

        let token = self.mirror.next_token.fetch_add(1, Ordering::SeqCst);
        self.mirror.subscribers.lock().push((token, listener.clone()));
        debug!(token, "Snapshot subscriber added");

        if self.is_synced() {
            let snapshot = self.mirror.snapshot();
            listener(&snapshot);
        }

        let mirror = Arc::downgrade(&self.mirror);
        Subscription::new(move || {
            if let Some(mirror) = mirror.upgrade() {
                mirror.subscribers.lock().retain(|(t, _)| *t != token);
                debug!(token, "Snapshot subscriber removed");
            }
        })
    }

    /// Number of registered snapshot subscribers
    pub fn subscriber_count(&self) -> usize {
        self.mirror.subscribers.lock().len()
    }

    /// Validate and write a new record; returns the collection's id
    #[instrument(skip(self, input), fields(collection = %self.mirror.collection))]
    pub async fn create(&self, input: ProjectInput) -> StoreResult<ProjectId> {
        let project = validate_for_create(input, &self.validation)?;

        let id = self
            .adapter
            .add_document(&self.mirror.collection, project.to_document())
            .await
            .map_err(|e| {
                warn!(error = %e, "Create failed");
                StoreError::Adapter(e)
            })?;

        info!(id = %id, name = %project.name, "Project created");
        Ok(ProjectId::new(id))
    }

    /// Merge `patch` into the record `id`
    ///
    /// Only the supplied fields are sent. An empty patch writes nothing.
    #[instrument(skip(self, patch), fields(collection = %self.mirror.collection))]
    pub async fn update(&self, id: &ProjectId, patch: ProjectPatch) -> StoreResult<()> {
        let existing = self.get_by_id(id)?;
        let merged = validate_for_update(&existing, &patch, &self.validation)?;

        let fields = patch.fields();
        if fields.is_empty() {
            debug!(id = %id, "Empty patch, nothing to write");
            return Ok(());
        }

        let full = merged.to_document();
        let changes: Document = fields
            .iter()
            .filter_map(|field| {
                full.get(field.key())
                    .map(|value| (field.key().to_string(), value.clone()))
            })
            .collect();

        self.adapter
            .update_document(&self.mirror.collection, id.as_str(), changes)
            .await
            .map_err(|e| self.write_failed(id, e))?;

        info!(id = %id, fields = fields.len(), "Project updated");
        Ok(())
    }

    /// Remove the record `id`
    #[instrument(skip(self, _confirmation), fields(collection = %self.mirror.collection))]
    pub async fn delete(&self, id: &ProjectId, _confirmation: DeleteConfirmation) -> StoreResult<()> {
        if !self.mirror.snapshot().contains(id) {
            return Err(StoreError::NotFound(id.clone()));
        }

        self.adapter
            .delete_document(&self.mirror.collection, id.as_str())
            .await
            .map_err(|e| self.write_failed(id, e))?;

        info!(id = %id, "Project deleted");
        Ok(())
    }

    /// Record `id` from the local snapshot; never calls the collection
    pub fn get_by_id(&self, id: &ProjectId) -> StoreResult<Project> {
        self.mirror
            .snapshot()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    /// Detach from the collection. Later batches are ignored.
    pub fn close(&self) {
        if self.attachment.is_active() {
            self.attachment.unsubscribe();
            info!(collection = %self.mirror.collection, "Project store detached");
        }
    }

    fn write_failed(&self, id: &ProjectId, error: AdapterError) -> StoreError {
        if error.is_not_found() {
            StoreError::NotFound(id.clone())
        } else {
            warn!(id = %id, error = %error, "Collection write failed");
            StoreError::Adapter(error)
        }
    }
}

impl fmt::Debug for ProjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProjectStore")
            .field("collection", &self.mirror.collection)
            .field("backend", &self.adapter.backend())
            .field("synced", &self.is_synced())
            .finish()
    }
}

impl Drop for ProjectStore {
    fn drop(&mut self) {
        self.attachment.unsubscribe();
    }
}
