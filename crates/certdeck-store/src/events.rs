/// Change notifications emitted by the certificate store.
///
/// Delivered synchronously to the `on_event` handler and broadcast to
/// every receiver obtained from `CertificateStore::subscribe`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Added { id: String },
    Updated { id: String },
    Removed { id: String },
    /// The persisted collection could not be loaded; the store started empty.
    LoadFailed { key: String, reason: String },
    /// A write failed; memory is ahead of durable storage.
    PersistFailed { key: String, reason: String },
    /// A write succeeded after an earlier failure.
    Recovered { key: String },
}

impl StoreEvent {
    /// Whether the collection contents changed.
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Added { .. } | Self::Updated { .. } | Self::Removed { .. }
        )
    }
}
