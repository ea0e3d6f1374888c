//! Certificate records, expiration classification and the persisted
//! certificate store.

pub mod error;
pub mod events;
pub mod expiry;
pub mod model;
pub mod storage;
pub mod store;

pub use error::{StorageError, StoreError};
pub use events::StoreEvent;
pub use expiry::{classify, classify_days, days_remaining, ExpirationStatus, Expiry, WARNING_THRESHOLD_DAYS};
pub use model::{
    Certificate, CertificateData, CertificateIssuer, CertificatePatch, CertificateSubject,
    DistinguishedName, Timestamp,
};
pub use storage::{DurableStore, FileStore, MemoryStore};
pub use store::{Builder, CertificateStore, DEFAULT_STORAGE_KEY};
