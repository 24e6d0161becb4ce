//! The credential store: whole-collection CRUD over two backends.
//!
//! Every mutation is a read-modify-write of the entire serialized
//! collection, the same unit of persistence the data has always had. All
//! operations go through a single async lock so two in-flight mutations
//! cannot clobber each other's write.

use crate::backend::{EncryptedFileBackend, KeyValueBackend, PlainFileBackend};
use crate::error::{PassError, Result};
use crate::models::Credential;
use std::path::Path;
use tokio::sync::Mutex;

/// Key the serialized credential array lives under, in both backends.
pub const COLLECTION_KEY: &str = "secure_passwords";
/// Key holding the schema version marker.
pub const VERSION_KEY: &str = "password_storage_version";
/// Current schema version.
pub const STORAGE_VERSION: &str = "v1";

/// Dual-backend credential store.
///
/// Writes try the encrypted primary first and transparently land in the
/// plaintext fallback when the primary fails; reads do the same and
/// degrade to an empty collection rather than erroring. The two tiers are
/// not reconciled: a read sees whichever single backend answers.
pub struct CredentialStore {
    primary: Box<dyn KeyValueBackend>,
    fallback: Box<dyn KeyValueBackend>,
    lock: Mutex<()>,
}

impl CredentialStore {
    pub fn new(primary: Box<dyn KeyValueBackend>, fallback: Box<dyn KeyValueBackend>) -> Self {
        Self {
            primary,
            fallback,
            lock: Mutex::new(()),
        }
    }

    /// Standard layout under a storage root: `primary/` holds encrypted
    /// values, `fallback/` plaintext ones.
    pub fn open_at(root: &Path, master_password: String) -> Self {
        Self::new(
            Box::new(EncryptedFileBackend::new(
                root.join("primary"),
                master_password,
            )),
            Box::new(PlainFileBackend::new(root.join("fallback"))),
        )
    }

    /// Record the schema version, migrating if an older one is found.
    /// No migrations exist yet, so this only writes the marker. Version
    /// bookkeeping lives in the fallback tier and failures here never
    /// block startup.
    pub async fn init(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        if let Ok(version) = self.fallback.get(VERSION_KEY) {
            if version.as_deref() != Some(STORAGE_VERSION) {
                let _ = self.fallback.set(VERSION_KEY, STORAGE_VERSION);
            }
        }
        Ok(())
    }

    /// Return the persisted collection, or an empty one if nothing is
    /// stored or neither backend can be read. Never fails.
    pub async fn get_all(&self) -> Vec<Credential> {
        let _guard = self.lock.lock().await;
        self.read_collection()
    }

    /// Append a credential. The store does not check `id` uniqueness;
    /// callers mint ids.
    pub async fn save(&self, credential: Credential) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut collection = self.read_collection();
        collection.push(credential);
        self.write_collection(&collection)
    }

    /// Replace the credential whose id matches. A missing id is a no-op,
    /// not an error.
    pub async fn update(&self, credential: Credential) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut collection = self.read_collection();
        for existing in collection.iter_mut() {
            if existing.id == credential.id {
                *existing = credential;
                break;
            }
        }
        self.write_collection(&collection)
    }

    /// Remove the credential whose id matches. A missing id is a no-op.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut collection = self.read_collection();
        collection.retain(|c| c.id != id);
        self.write_collection(&collection)
    }

    /// Drop the whole collection. Idempotent.
    pub async fn clear_all(&self) -> Result<()> {
        let _guard = self.lock.lock().await;
        if self.primary.remove(COLLECTION_KEY).is_ok() {
            return Ok(());
        }
        self.fallback
            .remove(COLLECTION_KEY)
            .map_err(|_| PassError::WriteFailed)
    }

    /// Primary first; a backend failure or an unparseable value falls
    /// back to the secondary. An absent value on the primary is an empty
    /// collection, not a reason to consult the fallback.
    fn read_collection(&self) -> Vec<Credential> {
        match self.primary.get(COLLECTION_KEY) {
            Ok(None) => Vec::new(),
            Ok(Some(data)) => match serde_json::from_str(&data) {
                Ok(collection) => collection,
                Err(_) => self.read_fallback(),
            },
            Err(_) => self.read_fallback(),
        }
    }

    fn read_fallback(&self) -> Vec<Credential> {
        match self.fallback.get(COLLECTION_KEY) {
            Ok(Some(data)) => serde_json::from_str(&data).unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Serialize once, then primary with fallback on backend failure.
    /// Serialization errors propagate as-is and never trigger fallback.
    fn write_collection(&self, collection: &[Credential]) -> Result<()> {
        let data = serde_json::to_string(collection)?;
        if self.primary.set(COLLECTION_KEY, &data).is_ok() {
            return Ok(());
        }
        self.fallback
            .set(COLLECTION_KEY, &data)
            .map_err(|_| PassError::WriteFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::StorageError;
    use tempfile::TempDir;

    /// Backend that refuses every call, standing in for an unavailable
    /// platform secure store.
    struct FailingBackend;

    impl KeyValueBackend for FailingBackend {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn get(&self, key: &str) -> std::result::Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable(key.to_string()))
        }
        fn set(&self, key: &str, _value: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Unavailable(key.to_string()))
        }
        fn remove(&self, key: &str) -> std::result::Result<(), StorageError> {
            Err(StorageError::Unavailable(key.to_string()))
        }
    }

    fn plain_store(dir: &TempDir) -> CredentialStore {
        CredentialStore::new(
            Box::new(PlainFileBackend::new(dir.path().join("primary"))),
            Box::new(PlainFileBackend::new(dir.path().join("fallback"))),
        )
    }

    fn credential(title: &str) -> Credential {
        Credential::new(
            title.to_string(),
            "user@example.com".to_string(),
            "pw".to_string(),
            None,
        )
    }

    #[tokio::test]
    async fn test_save_then_get_all_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = plain_store(&dir);

        assert!(store.get_all().await.is_empty());

        let c = credential("GitHub");
        store.save(c.clone()).await.unwrap();

        let all = store.get_all().await;
        assert_eq!(all, vec![c]);
    }

    #[tokio::test]
    async fn test_insertion_order_preserved() {
        let dir = TempDir::new().unwrap();
        let store = plain_store(&dir);

        for title in ["first", "second", "third"] {
            store.save(credential(title)).await.unwrap();
        }
        let titles: Vec<_> = store.get_all().await.into_iter().map(|c| c.title).collect();
        assert_eq!(titles, ["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_delete_removes_matching_id_only() {
        let dir = TempDir::new().unwrap();
        let store = plain_store(&dir);

        let keep = credential("keep");
        let drop = credential("drop");
        store.save(keep.clone()).await.unwrap();
        store.save(drop.clone()).await.unwrap();

        store.delete(&drop.id).await.unwrap();
        assert_eq!(store.get_all().await, vec![keep]);

        // Deleting an absent id is a no-op.
        store.delete("no-such-id").await.unwrap();
        assert_eq!(store.get_all().await.len(), 1);
    }

    #[tokio::test]
    async fn test_update_replaces_by_id() {
        let dir = TempDir::new().unwrap();
        let store = plain_store(&dir);

        let mut c = credential("Mail");
        store.save(c.clone()).await.unwrap();

        c.password = "rotated".to_string();
        store.update(c.clone()).await.unwrap();

        let all = store.get_all().await;
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].password, "rotated");
    }

    #[tokio::test]
    async fn test_update_unknown_id_leaves_collection_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = plain_store(&dir);

        let c = credential("Mail");
        store.save(c.clone()).await.unwrap();

        store.update(credential("stranger")).await.unwrap();
        assert_eq!(store.get_all().await, vec![c]);
    }

    #[tokio::test]
    async fn test_clear_all_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = plain_store(&dir);

        store.save(credential("a")).await.unwrap();
        store.clear_all().await.unwrap();
        assert!(store.get_all().await.is_empty());

        store.clear_all().await.unwrap();
        assert!(store.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_lands_in_fallback_when_primary_fails() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::new(
            Box::new(FailingBackend),
            Box::new(PlainFileBackend::new(dir.path().join("fallback"))),
        );

        let c = credential("only-copy");
        store.save(c.clone()).await.unwrap();

        // Read also falls back, so the credential is visible.
        assert_eq!(store.get_all().await, vec![c]);
    }

    #[tokio::test]
    async fn test_write_fails_when_both_backends_fail() {
        let store = CredentialStore::new(Box::new(FailingBackend), Box::new(FailingBackend));

        let result = store.save(credential("lost")).await;
        assert!(matches!(result, Err(PassError::WriteFailed)));

        // Reads still never error.
        assert!(store.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_primary_value_falls_back() {
        let dir = TempDir::new().unwrap();
        let primary = PlainFileBackend::new(dir.path().join("primary"));
        let fallback = PlainFileBackend::new(dir.path().join("fallback"));

        let c = credential("recovered");
        primary.set(COLLECTION_KEY, "{not json").unwrap();
        fallback
            .set(COLLECTION_KEY, &serde_json::to_string(&[c.clone()]).unwrap())
            .unwrap();

        let store = CredentialStore::new(Box::new(primary), Box::new(fallback));
        assert_eq!(store.get_all().await, vec![c]);
    }

    #[tokio::test]
    async fn test_absent_primary_value_is_empty_without_fallback_read() {
        // A primary that answers "nothing stored" wins over fallback data;
        // the tiers are not merged.
        let dir = TempDir::new().unwrap();
        let fallback = PlainFileBackend::new(dir.path().join("fallback"));
        fallback
            .set(
                COLLECTION_KEY,
                &serde_json::to_string(&[credential("shadowed")]).unwrap(),
            )
            .unwrap();

        let store = CredentialStore::new(
            Box::new(PlainFileBackend::new(dir.path().join("primary"))),
            Box::new(fallback),
        );
        assert!(store.get_all().await.is_empty());
    }

    #[tokio::test]
    async fn test_init_records_version_in_fallback() {
        let dir = TempDir::new().unwrap();
        let store = plain_store(&dir);
        store.init().await.unwrap();

        let fallback = PlainFileBackend::new(dir.path().join("fallback"));
        assert_eq!(
            fallback.get(VERSION_KEY).unwrap().as_deref(),
            Some(STORAGE_VERSION)
        );

        // Second init keeps the same marker.
        store.init().await.unwrap();
        assert_eq!(
            fallback.get(VERSION_KEY).unwrap().as_deref(),
            Some(STORAGE_VERSION)
        );
    }

    #[tokio::test]
    async fn test_encrypted_store_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = CredentialStore::open_at(dir.path(), "master".to_string());

        let c = credential("sealed");
        store.save(c.clone()).await.unwrap();
        assert_eq!(store.get_all().await, vec![c]);

        // Collection file exists under primary/ and is not plaintext JSON.
        let raw =
            std::fs::read_to_string(dir.path().join("primary").join(COLLECTION_KEY)).unwrap();
        assert!(!raw.contains("sealed"));
    }
}
