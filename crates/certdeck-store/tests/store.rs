use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use certdeck_store::{
    Certificate, CertificateData, CertificatePatch, CertificateStore, DistinguishedName,
    DurableStore, FileStore, MemoryStore, StorageError, StoreError, StoreEvent, Timestamp,
    DEFAULT_STORAGE_KEY,
};

/// Storage whose writes can be switched to fail, to simulate a full disk.
#[derive(Clone, Default)]
struct FlakyStore {
    inner: Arc<Mutex<MemoryStore>>,
    fail_writes: Arc<AtomicBool>,
}

impl DurableStore for FlakyStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.lock().unwrap().read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.lock().unwrap().write(key, value)
    }
}

/// Storage whose reads always fail.
struct UnreadableStore;

impl DurableStore for UnreadableStore {
    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "access denied",
        )))
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

fn temp_data_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("certdeck-store-{name}-{nanos}"))
}

fn data(name: &str) -> CertificateData {
    CertificateData {
        name: name.to_string(),
        issuer: "LetsEncrypt".to_string(),
        issuer_details: DistinguishedName {
            common_name: Some("R3".to_string()),
            ..Default::default()
        },
        subject: DistinguishedName {
            common_name: Some(format!("{name}.example.com")),
            ..Default::default()
        },
        domains: vec![format!("{name}.example.com")],
        issued_at: Timestamp::new("2026-01-01T00:00:00.000Z"),
        expires_at: Timestamp::new("2026-12-31T00:00:00.000Z"),
        description: None,
        notes: None,
        serial_number: None,
        signature_algorithm: None,
    }
}

#[test]
fn add_then_list_has_exactly_one_more_with_fresh_id() {
    let mut store = CertificateStore::open(MemoryStore::new());
    store.add(data("a")).unwrap();
    let before = store.list();

    let created = store.add(data("b")).unwrap();
    let after = store.list();

    assert_eq!(after.len(), before.len() + 1);
    assert!(before.iter().all(|c| c.id != created.id));
    assert_eq!(after.iter().filter(|c| c.id == created.id).count(), 1);
}

#[test]
fn hundred_sequential_adds_yield_unique_ids() {
    let mut store = CertificateStore::open(MemoryStore::new());
    for i in 0..100 {
        store.add(data(&format!("cert-{i}"))).unwrap();
    }
    let ids: HashSet<String> = store.list().into_iter().map(|c| c.id).collect();
    assert_eq!(ids.len(), 100);
}

#[test]
fn list_is_a_snapshot() {
    let mut store = CertificateStore::open(MemoryStore::new());
    store.add(data("a")).unwrap();

    let mut snapshot = store.list();
    snapshot[0].name = "mutated".to_string();
    snapshot.clear();

    assert_eq!(store.len(), 1);
    assert_eq!(store.list()[0].name, "a");
}

#[test]
fn remove_absent_id_is_a_no_op() {
    let mut store = CertificateStore::open(MemoryStore::new());
    store.add(data("a")).unwrap();
    let before = store.list();

    store.remove("does-not-exist").unwrap();
    assert_eq!(store.list(), before);
}

#[test]
fn remove_twice_is_a_no_op_the_second_time() {
    let mut store = CertificateStore::open(MemoryStore::new());
    let keep = store.add(data("keep")).unwrap();
    let gone = store.add(data("gone")).unwrap();

    store.remove(&gone.id).unwrap();
    let after_first = store.list();
    store.remove(&gone.id).unwrap();

    assert_eq!(store.list(), after_first);
    assert_eq!(after_first, vec![keep]);
}

#[test]
fn update_name_changes_only_name() {
    let mut store = CertificateStore::open(MemoryStore::new());
    let mut full = data("a");
    full.description = Some("edge".to_string());
    full.serial_number = Some("04:AB".to_string());
    let original = store.add(full).unwrap();
    let original_json = serde_json::to_value(&original).unwrap();

    store
        .update(
            &original.id,
            CertificatePatch {
                name: Some("X".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let updated = store.get(&original.id).unwrap();
    assert_eq!(updated.name, "X");

    let mut updated_json = serde_json::to_value(&updated).unwrap();
    updated_json["name"] = original_json["name"].clone();
    assert_eq!(updated_json, original_json);
}

#[test]
fn update_absent_id_is_a_no_op() {
    let mut store = CertificateStore::open(MemoryStore::new());
    store.add(data("a")).unwrap();
    let before = store.list();

    store
        .update(
            "missing",
            CertificatePatch {
                name: Some("X".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    assert_eq!(store.list(), before);
}

#[test]
fn collection_of_five_round_trips_through_json() {
    let mut certs: Vec<Certificate> = Vec::new();
    for i in 0..5 {
        let mut d = data(&format!("c{i}"));
        if i % 2 == 0 {
            d.description = Some(format!("description {i}"));
            d.serial_number = Some(format!("0{i}:FF"));
        }
        if i % 3 == 0 {
            d.notes = Some("renew manually".to_string());
            d.issuer_details.country = Some("US".to_string());
            d.subject.email_address = Some("ops@example.com".to_string());
        }
        if i == 4 {
            d.signature_algorithm = Some("ECDSA-SHA384".to_string());
            d.domains.push(d.domains[0].clone());
            d.expires_at = Timestamp::new("garbage");
        }
        certs.push(d.into_certificate(format!("id-{i}")));
    }

    let json = serde_json::to_string(&certs).unwrap();
    let back: Vec<Certificate> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, certs);
}

#[test]
fn reopening_file_storage_restores_collection() {
    let dir = temp_data_dir("reopen");
    let created = {
        let mut store = CertificateStore::open(FileStore::new(&dir));
        let a = store.add(data("a")).unwrap();
        let b = store.add(data("b")).unwrap();
        store.remove(&a.id).unwrap();
        b
    };

    let reopened = CertificateStore::open(FileStore::new(&dir));
    assert!(reopened.load_error().is_none());
    assert_eq!(reopened.list(), vec![created]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn corrupt_storage_degrades_to_empty_and_reports() {
    let seen: Arc<Mutex<Vec<StoreEvent>>> = Arc::default();
    let sink = Arc::clone(&seen);

    let storage = MemoryStore::new().with_value(DEFAULT_STORAGE_KEY, "{not json");
    let store = CertificateStore::builder(storage)
        .on_event(move |e| sink.lock().unwrap().push(e.clone()))
        .build();

    assert!(store.is_empty());
    assert!(matches!(
        store.load_error(),
        Some(StoreError::PersistenceRead { key, .. }) if key == DEFAULT_STORAGE_KEY
    ));
    let events = seen.lock().unwrap();
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], StoreEvent::LoadFailed { .. }));
}

#[test]
fn wrong_shape_json_degrades_to_empty() {
    let storage = MemoryStore::new().with_value(DEFAULT_STORAGE_KEY, r#"{"certificates": []}"#);
    let store = CertificateStore::open(storage);
    assert!(store.is_empty());
    assert!(store.load_error().is_some());
}

#[test]
fn unreadable_storage_degrades_to_empty() {
    let store = CertificateStore::open(UnreadableStore);
    assert!(store.is_empty());
    let err = store.load_error().expect("load error recorded");
    assert!(err.to_string().contains("access denied"), "{err}");
}

#[test]
fn corrupt_storage_is_overwritten_by_next_successful_add() {
    let mut store = CertificateStore::open(
        MemoryStore::new().with_value(DEFAULT_STORAGE_KEY, "[[["),
    );
    let created = store.add(data("fresh")).unwrap();

    let json = store.storage().get(DEFAULT_STORAGE_KEY).unwrap();
    let persisted: Vec<Certificate> = serde_json::from_str(json).unwrap();
    assert_eq!(persisted, vec![created]);
}

#[test]
fn failed_write_keeps_change_in_memory_and_marks_dirty() {
    let storage = FlakyStore::default();
    let fail = Arc::clone(&storage.fail_writes);
    let mut store = CertificateStore::open(storage.clone());
    store.add(data("saved")).unwrap();

    fail.store(true, Ordering::SeqCst);
    let err = store.add(data("unsaved")).unwrap_err();
    assert!(matches!(err, StoreError::PersistenceWrite { .. }));

    assert_eq!(store.len(), 2, "optimistic: memory keeps the new record");
    assert!(store.is_dirty());

    let durable: Vec<Certificate> =
        serde_json::from_str(&storage.read(DEFAULT_STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(durable.len(), 1, "storage still has the last good write");
}

#[test]
fn persist_retry_clears_dirty_and_emits_recovered() {
    let storage = FlakyStore::default();
    let fail = Arc::clone(&storage.fail_writes);
    let mut store = CertificateStore::open(storage.clone());
    let mut rx = store.subscribe();

    fail.store(true, Ordering::SeqCst);
    let created = store.add(data("a")).unwrap_err();
    assert!(matches!(created, StoreError::PersistenceWrite { .. }));

    fail.store(false, Ordering::SeqCst);
    store.persist().unwrap();
    assert!(!store.is_dirty());

    let events: Vec<StoreEvent> = std::iter::from_fn(|| rx.try_recv().ok()).collect();
    assert!(matches!(events[0], StoreEvent::Added { .. }));
    assert!(matches!(events[1], StoreEvent::PersistFailed { .. }));
    assert!(matches!(events[2], StoreEvent::Recovered { .. }));

    let durable: Vec<Certificate> =
        serde_json::from_str(&storage.read(DEFAULT_STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(durable.len(), 1);
}

#[test]
fn failed_remove_and_update_still_apply_in_memory() {
    let storage = FlakyStore::default();
    let fail = Arc::clone(&storage.fail_writes);
    let mut store = CertificateStore::open(storage);
    let a = store.add(data("a")).unwrap();
    let b = store.add(data("b")).unwrap();

    fail.store(true, Ordering::SeqCst);
    assert!(store.remove(&a.id).is_err());
    assert!(store
        .update(
            &b.id,
            CertificatePatch {
                issuer: Some("Internal".to_string()),
                ..Default::default()
            }
        )
        .is_err());

    assert!(store.get(&a.id).is_none());
    assert_eq!(store.get(&b.id).unwrap().issuer, "Internal");
}

#[test]
fn event_handler_and_subscribers_both_receive_mutations() {
    let seen: Arc<Mutex<Vec<StoreEvent>>> = Arc::default();
    let sink = Arc::clone(&seen);
    let mut store = CertificateStore::builder(MemoryStore::new())
        .on_event(move |e| sink.lock().unwrap().push(e.clone()))
        .build();
    let mut rx = store.subscribe();

    let cert = store.add(data("a")).unwrap();
    store
        .update(
            &cert.id,
            CertificatePatch {
                notes: Some(Some("n".to_string())),
                ..Default::default()
            },
        )
        .unwrap();

    let expected = vec![
        StoreEvent::Added { id: cert.id.clone() },
        StoreEvent::Updated { id: cert.id.clone() },
    ];
    assert_eq!(*seen.lock().unwrap(), expected);
    assert_eq!(rx.try_recv().unwrap(), expected[0]);
    assert_eq!(rx.try_recv().unwrap(), expected[1]);
}

#[test]
fn boxed_storage_can_back_a_store() {
    let storage: Box<dyn DurableStore> = Box::new(MemoryStore::new());
    let mut store = CertificateStore::open(storage);
    store.add(data("a")).unwrap();
    assert!(store.storage().read(DEFAULT_STORAGE_KEY).unwrap().is_some());
}
