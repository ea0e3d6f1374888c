//! The canonical certificate collection.
//!
//! The store owns the only writable copy of the collection. Readers get
//! owned snapshots. Every mutation writes the full collection to durable
//! storage before returning.
//!
//! Writes are optimistic: when the durable write fails, the in-memory
//! change is kept and the error is returned to the caller. Until a later
//! write succeeds, [`CertificateStore::is_dirty`] reports that memory is
//! ahead of storage.

use std::sync::Arc;

use tokio::sync::broadcast;

use certdeck_common::id::generate_id;

use crate::error::StoreError;
use crate::events::StoreEvent;
use crate::model::{Certificate, CertificateData, CertificatePatch};
use crate::storage::DurableStore;

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "certificates";

/// Capacity of the change broadcast channel. Slow receivers lag, they
/// never block the store.
const EVENT_CHANNEL_CAPACITY: usize = 64;

type EventHandler = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

pub struct Builder<S> {
    storage: S,
    key: String,
    event_handler: Option<EventHandler>,
}

impl<S: DurableStore> Builder<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            key: DEFAULT_STORAGE_KEY.to_string(),
            event_handler: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Called synchronously for every event, including a load failure
    /// during [`Builder::build`].
    pub fn on_event<F>(mut self, handler: F) -> Self
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.event_handler = Some(Arc::new(handler));
        self
    }

    /// Load the persisted collection and construct the store.
    ///
    /// Never fails. A missing key yields an empty store; an unreadable or
    /// corrupt value also yields an empty store, recorded in
    /// [`CertificateStore::load_error`].
    pub fn build(self) -> CertificateStore<S> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let mut store = CertificateStore {
            storage: self.storage,
            key: self.key,
            certificates: Vec::new(),
            events,
            event_handler: self.event_handler,
            load_error: None,
            dirty: false,
        };

        match load_collection(&store.storage, &store.key) {
            Ok(certificates) => {
                tracing::debug!(key = %store.key, count = certificates.len(), "Certificates loaded");
                store.certificates = certificates;
            }
            Err(reason) => {
                tracing::warn!(
                    key = %store.key,
                    error = %reason,
                    "Persisted certificates unreadable, starting empty"
                );
                store.emit(StoreEvent::LoadFailed {
                    key: store.key.clone(),
                    reason: reason.clone(),
                });
                store.load_error = Some(StoreError::PersistenceRead {
                    key: store.key.clone(),
                    reason,
                });
            }
        }

        store
    }
}

fn load_collection<S: DurableStore>(storage: &S, key: &str) -> Result<Vec<Certificate>, String> {
    let Some(json) = storage.read(key).map_err(|e| e.to_string())? else {
        return Ok(Vec::new());
    };
    let certificates: Vec<Certificate> =
        serde_json::from_str(&json).map_err(|e| e.to_string())?;
    Ok(dedupe_ids(certificates))
}

/// Keep the first record for each id. Only reachable through hand-edited
/// storage, but the collection must never hold two records with one id.
fn dedupe_ids(certificates: Vec<Certificate>) -> Vec<Certificate> {
    let mut seen = std::collections::HashSet::new();
    let before = certificates.len();
    let kept: Vec<Certificate> = certificates
        .into_iter()
        .filter(|c| seen.insert(c.id.clone()))
        .collect();
    if kept.len() != before {
        tracing::warn!(dropped = before - kept.len(), "Dropped certificates with duplicate ids");
    }
    kept
}

/// Owner of the certificate collection.
pub struct CertificateStore<S> {
    storage: S,
    key: String,
    certificates: Vec<Certificate>,
    events: broadcast::Sender<StoreEvent>,
    event_handler: Option<EventHandler>,
    load_error: Option<StoreError>,
    dirty: bool,
}

impl<S: DurableStore> CertificateStore<S> {
    pub fn builder(storage: S) -> Builder<S> {
        Builder::new(storage)
    }

    /// Construct with default settings. See [`Builder::build`].
    pub fn open(storage: S) -> Self {
        Builder::new(storage).build()
    }

    /// Snapshot of the full collection.
    pub fn list(&self) -> Vec<Certificate> {
        self.certificates.clone()
    }

    /// Borrowed view of the collection, for derivations that do not need
    /// to outlive the next mutation.
    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    pub fn get(&self, id: &str) -> Option<Certificate> {
        self.certificates.iter().find(|c| c.id == id).cloned()
    }

    pub fn len(&self) -> usize {
        self.certificates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.certificates.is_empty()
    }

    /// Create a certificate with a fresh id and persist the collection.
    ///
    /// On a write failure the record stays in memory and the error is
    /// returned; [`CertificateStore::list`] still shows it.
    pub fn add(&mut self, data: CertificateData) -> Result<Certificate, StoreError> {
        let mut id = generate_id();
        while self.certificates.iter().any(|c| c.id == id) {
            id = generate_id();
        }
        let certificate = data.into_certificate(id);
        self.certificates.push(certificate.clone());
        tracing::info!(id = %certificate.id, name = %certificate.name, "Certificate added");

        self.emit(StoreEvent::Added {
            id: certificate.id.clone(),
        });
        self.persist()?;
        Ok(certificate)
    }

    /// Delete by id. Unknown ids are a no-op and do not touch storage.
    pub fn remove(&mut self, id: &str) -> Result<(), StoreError> {
        let before = self.certificates.len();
        self.certificates.retain(|c| c.id != id);
        if self.certificates.len() == before {
            tracing::debug!(id, "Remove ignored, no such certificate");
            return Ok(());
        }
        tracing::info!(id, "Certificate removed");

        self.emit(StoreEvent::Removed { id: id.to_string() });
        self.persist()
    }

    /// Merge `patch` into the matching certificate. Unknown ids are a no-op.
    pub fn update(&mut self, id: &str, patch: CertificatePatch) -> Result<(), StoreError> {
        let Some(certificate) = self.certificates.iter_mut().find(|c| c.id == id) else {
            tracing::debug!(id, "Update ignored, no such certificate");
            return Ok(());
        };
        patch.apply(certificate);
        tracing::info!(id, "Certificate updated");

        self.emit(StoreEvent::Updated { id: id.to_string() });
        self.persist()
    }

    /// Resolve a full id or an unambiguous id prefix.
    pub fn resolve_id(&self, prefix: &str) -> Result<String, StoreError> {
        if prefix.is_empty() {
            return Err(StoreError::NotFound(prefix.to_string()));
        }
        if let Some(exact) = self.certificates.iter().find(|c| c.id == prefix) {
            return Ok(exact.id.clone());
        }
        let mut matches = self
            .certificates
            .iter()
            .filter(|c| c.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Ok(only.id.clone()),
            (Some(_), Some(_)) => Err(StoreError::AmbiguousId(prefix.to_string())),
            (None, _) => Err(StoreError::NotFound(prefix.to_string())),
        }
    }

    /// Write the full collection to durable storage.
    ///
    /// Mutations call this themselves. Call it directly to retry after a
    /// failed write.
    pub fn persist(&mut self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.certificates)?;
        match self.storage.write(&self.key, &json) {
            Ok(()) => {
                tracing::debug!(key = %self.key, count = self.certificates.len(), "Certificates saved");
                if self.dirty {
                    self.dirty = false;
                    self.emit(StoreEvent::Recovered {
                        key: self.key.clone(),
                    });
                }
                Ok(())
            }
            Err(source) => {
                tracing::warn!(
                    key = %self.key,
                    error = %source,
                    "Certificate save failed, in-memory state is ahead of storage"
                );
                self.dirty = true;
                self.emit(StoreEvent::PersistFailed {
                    key: self.key.clone(),
                    reason: source.to_string(),
                });
                Err(StoreError::PersistenceWrite {
                    key: self.key.clone(),
                    source,
                })
            }
        }
    }

    /// Whether the last write failed and memory has unsaved changes.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Why the initial load fell back to an empty collection, if it did.
    pub fn load_error(&self) -> Option<&StoreError> {
        self.load_error.as_ref()
    }

    /// Receive every future [`StoreEvent`].
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.events.subscribe()
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn emit(&self, event: StoreEvent) {
        if let Some(handler) = &self.event_handler {
            handler(&event);
        }
        // No receivers is fine.
        let _ = self.events.send(event);
    }
}
