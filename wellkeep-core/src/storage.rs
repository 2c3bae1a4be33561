//! storage.rs - Timestamped envelopes over a simple key-value store.
//!
//! [`SecureStorage`] wraps each value in a `{data, timestamp}` envelope,
//! serializes it to JSON and base64-encodes it before handing it to a
//! [`KeyValueStore`]. The encoding is opaque, not encrypted. Entries older
//! than the configured maximum age, or whose envelope no longer decodes, are
//! removed on read and reported as absent. An intact entry that does not fit
//! the requested type is an error and stays in the store.
//!
//! License: MIT OR APACHE 2.0

use std::collections::{BTreeMap, HashMap};
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose, Engine as _};
use chrono::{Duration, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::{StoragePolicy, DEFAULT_STORAGE_MAX_AGE_MS};
use crate::errors::WellkeepError;

const TMP_SUFFIX: &str = ".tmp";

/// A string-to-string store, the shape of browser `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, WellkeepError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), WellkeepError>;
    fn remove(&mut self, key: &str) -> Result<(), WellkeepError>;
    fn clear(&mut self) -> Result<(), WellkeepError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, WellkeepError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), WellkeepError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), WellkeepError> {
        self.entries.remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), WellkeepError> {
        self.entries.clear();
        Ok(())
    }
}

/// A store persisted as a single JSON object on disk.
///
/// Every operation re-reads the file under a shared lock; writes go to a
/// sibling temp file under an exclusive lock and are renamed into place.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Result<Vec<String>, WellkeepError> {
        Ok(self.load()?.into_keys().collect())
    }

    fn load(&self) -> Result<BTreeMap<String, String>, WellkeepError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let mut f = OpenOptions::new().read(true).open(&self.path)?;
        fs2::FileExt::lock_shared(&f)?;
        let mut raw = Vec::new();
        f.read_to_end(&mut raw)?;
        fs2::FileExt::unlock(&f)?;

        if raw.iter().all(|b| b.is_ascii_whitespace()) {
            return Ok(BTreeMap::new());
        }

        serde_json::from_slice(&raw).map_err(|e| {
            WellkeepError::Storage(format!("{} is not a valid store file: {}", self.path.display(), e))
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), WellkeepError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let json = serde_json::to_vec_pretty(entries)?;
        let mut tmp_name = self.path.as_os_str().to_owned();
        tmp_name.push(TMP_SUFFIX);
        let tmp_path = PathBuf::from(tmp_name);
        {
            let mut tmp = OpenOptions::new().create(true).write(true).truncate(true).open(&tmp_path)?;
            fs2::FileExt::lock_exclusive(&tmp)?;
            tmp.write_all(&json)?;
            tmp.flush()?;
            fs2::FileExt::unlock(&tmp)?;
        }

        fs::rename(&tmp_path, &self.path)?;
        debug!("Wrote {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, WellkeepError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), WellkeepError> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<(), WellkeepError> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), WellkeepError> {
        self.save(&BTreeMap::new())
    }
}

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
    timestamp: i64,
}

/// Timestamped, base64-encoded values over any [`KeyValueStore`].
#[derive(Debug)]
pub struct SecureStorage<S: KeyValueStore> {
    store: S,
    max_age: Duration,
}

impl<S: KeyValueStore> SecureStorage<S> {
    /// Wraps `store` with the default seven-day maximum age.
    pub fn new(store: S) -> Self {
        Self::with_max_age(store, Duration::milliseconds(DEFAULT_STORAGE_MAX_AGE_MS))
    }

    pub fn with_max_age(store: S, max_age: Duration) -> Self {
        Self { store, max_age }
    }

    pub fn from_policy(store: S, policy: &StoragePolicy) -> Self {
        Self::with_max_age(store, Duration::milliseconds(policy.max_age_ms))
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), WellkeepError> {
        self.set_at(key, value, Utc::now().timestamp_millis())
    }

    /// Stores `value` stamped with an explicit epoch-millisecond timestamp.
    pub fn set_at<T: Serialize>(&mut self, key: &str, value: &T, timestamp: i64) -> Result<(), WellkeepError> {
        let envelope = Envelope { data: value, timestamp };
        let json = serde_json::to_vec(&envelope)?;
        self.store.set(key, &general_purpose::STANDARD.encode(json))
    }

    /// Reads and decodes `key`. Expired or undecodable entries are removed
    /// and reported as `None`. Store failures and data of the wrong shape for
    /// `T` surface as errors.
    pub fn get<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>, WellkeepError> {
        self.get_at(key, Utc::now().timestamp_millis())
    }

    /// Like [`SecureStorage::get`], evaluated at `now` (epoch milliseconds).
    pub fn get_at<T: DeserializeOwned>(&mut self, key: &str, now: i64) -> Result<Option<T>, WellkeepError> {
        self.get_within(key, self.max_age, now)
    }

    /// Like [`SecureStorage::get_at`] with a maximum age other than the
    /// store's own.
    pub fn get_within<T: DeserializeOwned>(
        &mut self,
        key: &str,
        max_age: Duration,
        now: i64,
    ) -> Result<Option<T>, WellkeepError> {
        let Some(encoded) = self.store.get(key)? else {
            return Ok(None);
        };

        let envelope = match decode_envelope(&encoded) {
            Ok(envelope) => envelope,
            Err(reason) => {
                warn!("Discarding unreadable stored entry '{}': {}", key, reason);
                self.store.remove(key)?;
                return Ok(None);
            }
        };

        if now.saturating_sub(envelope.timestamp) > max_age.num_milliseconds() {
            debug!("Stored entry '{}' expired; removing it.", key);
            self.store.remove(key)?;
            return Ok(None);
        }

        let data = serde_json::from_value(envelope.data)?;
        Ok(Some(data))
    }

    pub fn remove(&mut self, key: &str) -> Result<(), WellkeepError> {
        self.store.remove(key)
    }

    pub fn clear(&mut self) -> Result<(), WellkeepError> {
        self.store.clear()
    }
}

fn decode_envelope(encoded: &str) -> Result<Envelope<serde_json::Value>, String> {
    let bytes = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|e| e.to_string())?;
    serde_json::from_slice(&bytes).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    const DAY_MS: i64 = 24 * 60 * 60 * 1000;

    #[test]
    fn test_round_trip_through_memory_store() {
        let mut storage = SecureStorage::new(MemoryStore::new());
        storage.set("profile", &json!({"name": "Sam", "mood": 7})).unwrap();
        let value: Option<serde_json::Value> = storage.get("profile").unwrap();
        assert_eq!(value, Some(json!({"name": "Sam", "mood": 7})));
        assert_eq!(storage.get::<String>("missing").unwrap(), None);
    }

    #[test]
    fn test_stored_value_is_base64_envelope() {
        let mut storage = SecureStorage::new(MemoryStore::new());
        storage.set_at("k", &"v", 1_000).unwrap();
        let raw = storage.inner().get("k").unwrap().unwrap();
        let decoded = general_purpose::STANDARD.decode(raw).unwrap();
        let envelope: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(envelope, json!({"data": "v", "timestamp": 1_000}));
    }

    #[test]
    fn test_expired_entries_are_removed() {
        let mut storage = SecureStorage::new(MemoryStore::new());
        storage.set_at("token", &"abc", 0).unwrap();

        let fresh: Option<String> = storage.get_at("token", 7 * DAY_MS).unwrap();
        assert_eq!(fresh.as_deref(), Some("abc"));

        let stale: Option<String> = storage.get_at("token", 7 * DAY_MS + 1).unwrap();
        assert_eq!(stale, None);
        assert!(storage.inner().is_empty());
    }

    #[test]
    fn test_corrupt_entries_are_removed() {
        let mut store = MemoryStore::new();
        store.set("bad", "%%% not base64").unwrap();
        store.set("not_json", &general_purpose::STANDARD.encode("plain")).unwrap();
        let mut storage = SecureStorage::new(store);

        assert_eq!(storage.get::<String>("bad").unwrap(), None);
        assert_eq!(storage.get::<String>("not_json").unwrap(), None);
        assert!(storage.inner().is_empty());
    }

    #[test]
    fn test_wrong_type_is_an_error_and_keeps_the_entry() {
        let mut storage = SecureStorage::new(MemoryStore::new());
        storage.set("profile", &json!({"name": "Sam"})).unwrap();

        let err = storage.get::<u32>("profile").unwrap_err();
        assert!(matches!(err, WellkeepError::Serialization(_)));
        assert!(storage.inner().get("profile").unwrap().is_some());

        let value: Option<serde_json::Value> = storage.get("profile").unwrap();
        assert_eq!(value, Some(json!({"name": "Sam"})));
    }

    #[test]
    fn test_custom_max_age() {
        let mut storage = SecureStorage::with_max_age(MemoryStore::new(), Duration::milliseconds(10));
        storage.set_at("k", &1u32, 100).unwrap();
        assert_eq!(storage.get_at::<u32>("k", 110).unwrap(), Some(1));
        assert_eq!(storage.get_at::<u32>("k", 111).unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let mut storage = SecureStorage::new(FileStore::new(&path));
        storage.set("sessionId", &"abc").unwrap();
        storage.set("csrfToken", &"def").unwrap();
        storage.remove("csrfToken").unwrap();

        let mut reopened = SecureStorage::new(FileStore::new(&path));
        assert_eq!(reopened.get::<String>("sessionId").unwrap().as_deref(), Some("abc"));
        assert_eq!(reopened.get::<String>("csrfToken").unwrap(), None);
        assert_eq!(reopened.inner().keys().unwrap(), vec!["sessionId".to_string()]);

        reopened.clear().unwrap();
        assert!(FileStore::new(&path).keys().unwrap().is_empty());
        assert!(!dir.path().join("nested").join("store.json.tmp").exists());
    }

    #[test]
    fn test_file_store_rejects_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStore::new(&path).get("k").unwrap_err();
        assert!(matches!(err, WellkeepError::Storage(_)));
    }

    #[test]
    fn test_file_store_treats_blank_file_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "\n").unwrap();
        assert_eq!(FileStore::new(&path).get("k").unwrap(), None);
    }
}
