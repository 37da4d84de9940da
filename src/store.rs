//! Object store access.
//!
//! The composer only needs to read sibling set members; the CLI also writes
//! the finished thumbnail back. Both go through [`ObjectStore`], so the core
//! never holds a global client and tests run against [`MemoryStore`].
//!
//! [`FsStore`] maps containers to directories under a root:
//!
//! ```text
//! <root>/
//! └── campaigns/                          # container
//!     ├── spring-halfPage                 # object body
//!     ├── spring-halfPage.meta.json       # object metadata ({"key": "value"})
//!     └── spring-wideSkyscraper
//! ```

use crate::catalog::SizeKey;
use crate::metadata::{RawMetadata, sibling_key};
use std::collections::HashMap;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;

const META_SUFFIX: &str = ".meta.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Object not found: {container}/{key}")]
    NotFound { container: String, key: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Metadata error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid object name: {0:?}")]
    InvalidName(String),
}

/// Object body plus its string metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredObject {
    pub body: Vec<u8>,
    pub metadata: RawMetadata,
}

impl StoredObject {
    pub fn new(body: Vec<u8>, metadata: RawMetadata) -> Self {
        Self { body, metadata }
    }
}

/// Read/write access to a keyed object store.
///
/// Implementations are shared read-only across concurrent compositions, hence `Sync`.
pub trait ObjectStore: Sync {
    fn get(&self, container: &str, key: &str) -> Result<StoredObject, StoreError>;

    fn put(&self, container: &str, key: &str, object: StoredObject) -> Result<(), StoreError>;

    /// Remove an object. `NotFound` if it does not exist.
    fn delete(&self, container: &str, key: &str) -> Result<(), StoreError>;
}

/// Fetch the raw bytes of sibling `key` in the set named by `prefix`.
///
/// `NotFound` is returned as-is; there is no retry.
pub fn fetch_sibling(
    store: &impl ObjectStore,
    container: &str,
    prefix: &str,
    key: SizeKey,
) -> Result<Vec<u8>, StoreError> {
    let object_key = sibling_key(prefix, key);
    tracing::debug!(container, key = %object_key, "fetching sibling");
    store.get(container, &object_key).map(|o| o.body)
}

/// Filesystem-backed store, one directory per container.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn object_path(&self, container: &str, key: &str) -> Result<PathBuf, StoreError> {
        Ok(self
            .root
            .join(checked_name(container)?)
            .join(checked_name(key)?))
    }

    fn meta_path(&self, container: &str, key: &str) -> Result<PathBuf, StoreError> {
        Ok(self
            .root
            .join(checked_name(container)?)
            .join(format!("{}{META_SUFFIX}", checked_name(key)?)))
    }
}

/// Containers and keys must stay below the store root: relative, non-empty,
/// and free of `..` and root components.
fn checked_name(name: &str) -> Result<&str, StoreError> {
    let path = Path::new(name);
    let plain = !name.is_empty()
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
    if plain {
        Ok(name)
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

fn not_found(container: &str, key: &str) -> StoreError {
    StoreError::NotFound {
        container: container.to_string(),
        key: key.to_string(),
    }
}

impl ObjectStore for FsStore {
    fn get(&self, container: &str, key: &str) -> Result<StoredObject, StoreError> {
        let body = match std::fs::read(self.object_path(container, key)?) {
            Ok(body) => body,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(not_found(container, key));
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = match std::fs::read_to_string(self.meta_path(container, key)?) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => RawMetadata::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(StoredObject { body, metadata })
    }

    fn put(&self, container: &str, key: &str, object: StoredObject) -> Result<(), StoreError> {
        let path = self.object_path(container, key)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &object.body)?;

        let meta_path = self.meta_path(container, key)?;
        if object.metadata.is_empty() {
            remove_if_present(&meta_path)?;
        } else {
            std::fs::write(&meta_path, serde_json::to_string_pretty(&object.metadata)?)?;
        }
        Ok(())
    }

    fn delete(&self, container: &str, key: &str) -> Result<(), StoreError> {
        match std::fs::remove_file(self.object_path(container, key)?) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(not_found(container, key));
            }
            Err(e) => return Err(e.into()),
        }
        remove_if_present(&self.meta_path(container, key)?)
    }
}

fn remove_if_present(path: &Path) -> Result<(), StoreError> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
        _ => Ok(()),
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<(String, String), StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.read().map(|o| o.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::Io(io::Error::other("memory store lock poisoned"))
}

impl ObjectStore for MemoryStore {
    fn get(&self, container: &str, key: &str) -> Result<StoredObject, StoreError> {
        let objects = self.objects.read().map_err(|_| poisoned())?;
        objects
            .get(&(container.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| not_found(container, key))
    }

    fn put(&self, container: &str, key: &str, object: StoredObject) -> Result<(), StoreError> {
        let mut objects = self.objects.write().map_err(|_| poisoned())?;
        objects.insert((container.to_string(), key.to_string()), object);
        Ok(())
    }

    fn delete(&self, container: &str, key: &str) -> Result<(), StoreError> {
        let mut objects = self.objects.write().map_err(|_| poisoned())?;
        objects
            .remove(&(container.to_string(), key.to_string()))
            .map(|_| ())
            .ok_or_else(|| not_found(container, key))
    }
}

/// Move an uploaded set member to the key its siblings look it up by.
///
/// Writes `object` under `to`, then removes `from`. The copy comes first so
/// the member is never absent from the store.
pub fn promote(
    store: &impl ObjectStore,
    container: &str,
    from: &str,
    to: &str,
    object: StoredObject,
) -> Result<(), StoreError> {
    store.put(container, to, object)?;
    store.delete(container, from)?;
    tracing::debug!(container, from, to, "upload promoted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn meta(pairs: &[(&str, &str)]) -> RawMetadata {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn memory_store_roundtrip() {
        let store = MemoryStore::new();
        let object = StoredObject::new(vec![1, 2, 3], meta(&[("a", "b")]));
        store.put("c", "k", object.clone()).unwrap();

        assert_eq!(store.get("c", "k").unwrap(), object);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_store_missing_object() {
        let store = MemoryStore::new();
        let err = store.get("c", "nope").unwrap_err();
        assert!(matches!(
            err,
            StoreError::NotFound { ref container, ref key } if container == "c" && key == "nope"
        ));
    }

    #[test]
    fn fs_store_roundtrip_with_metadata() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path());
        let object = StoredObject::new(b"body".to_vec(), meta(&[("sizes", "halfPage")]));
        store.put("bucket", "set-halfPage", object.clone()).unwrap();

        assert!(tmp.path().join("bucket/set-halfPage.meta.json").exists());
        assert_eq!(store.get("bucket", "set-halfPage").unwrap(), object);
    }

    #[test]
    fn fs_store_without_sidecar_has_empty_metadata() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("bucket")).unwrap();
        std::fs::write(tmp.path().join("bucket/raw"), b"x").unwrap();

        let object = FsStore::new(tmp.path()).get("bucket", "raw").unwrap();
        assert_eq!(object.body, b"x");
        assert!(object.metadata.is_empty());
    }

    #[test]
    fn fs_store_overwrite_drops_stale_metadata() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path());
        store
            .put("b", "k", StoredObject::new(vec![1], meta(&[("x", "y")])))
            .unwrap();
        store
            .put("b", "k", StoredObject::new(vec![2], RawMetadata::new()))
            .unwrap();

        let object = store.get("b", "k").unwrap();
        assert_eq!(object.body, vec![2]);
        assert!(object.metadata.is_empty());
    }

    #[test]
    fn fs_store_missing_object_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = FsStore::new(tmp.path()).get("bucket", "missing").unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[test]
    fn memory_store_delete() {
        let store = MemoryStore::new();
        store
            .put("c", "k", StoredObject::new(vec![1], RawMetadata::new()))
            .unwrap();
        store.delete("c", "k").unwrap();

        assert!(store.is_empty());
        assert!(matches!(
            store.delete("c", "k"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn fs_store_delete_removes_sidecar() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path());
        store
            .put("b", "k", StoredObject::new(vec![1], meta(&[("x", "y")])))
            .unwrap();
        store.delete("b", "k").unwrap();

        assert!(!tmp.path().join("b/k").exists());
        assert!(!tmp.path().join("b/k.meta.json").exists());
        assert!(matches!(
            store.delete("b", "k"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn fs_store_rejects_names_escaping_root() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path().join("root"));
        let object = StoredObject::new(vec![1], RawMetadata::new());

        for (container, key) in [
            ("bucket", "../../outside"),
            ("..", "k"),
            ("bucket", "/etc/passwd"),
            ("", "k"),
            ("bucket", ""),
        ] {
            assert!(
                matches!(
                    store.put(container, key, object.clone()),
                    Err(StoreError::InvalidName(_))
                ),
                "{container}/{key}"
            );
            assert!(matches!(
                store.get(container, key),
                Err(StoreError::InvalidName(_))
            ));
            assert!(matches!(
                store.delete(container, key),
                Err(StoreError::InvalidName(_))
            ));
        }
        assert!(!tmp.path().join("outside").exists());
    }

    #[test]
    fn fs_store_allows_nested_keys() {
        let tmp = TempDir::new().unwrap();
        let store = FsStore::new(tmp.path());
        let object = StoredObject::new(vec![7], RawMetadata::new());
        store.put("bucket", "spring/set-halfPage", object.clone()).unwrap();
        assert_eq!(store.get("bucket", "spring/set-halfPage").unwrap(), object);
    }

    #[test]
    fn promote_moves_object_with_metadata() {
        let store = MemoryStore::new();
        let object = StoredObject::new(vec![4], meta(&[("validsize", "halfPage")]));
        store.put("c", "set-halfPage-bannerset", object.clone()).unwrap();

        promote(&store, "c", "set-halfPage-bannerset", "set-halfPage", object.clone()).unwrap();

        assert_eq!(store.get("c", "set-halfPage").unwrap(), object);
        assert!(matches!(
            store.get("c", "set-halfPage-bannerset"),
            Err(StoreError::NotFound { .. })
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn fetch_sibling_uses_prefix_and_key() {
        let store = MemoryStore::new();
        store
            .put(
                "c",
                "spring-leaderboard",
                StoredObject::new(vec![9], RawMetadata::new()),
            )
            .unwrap();

        let bytes = fetch_sibling(&store, "c", "spring", SizeKey::Leaderboard).unwrap();
        assert_eq!(bytes, vec![9]);

        let missing = fetch_sibling(&store, "c", "spring", SizeKey::HalfPage);
        assert!(matches!(missing, Err(StoreError::NotFound { .. })));
    }
}
