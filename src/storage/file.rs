use super::KeyValueStore;
use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{PoisonError, RwLock},
};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// JSON-file backed store. The whole map is rewritten on every mutation; the
/// file holds bearer tokens, so it is created owner-readable only on Unix.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing or unreadable file starts empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_else(|err| {
                warn!("Ignoring unreadable session file {}: {err}", path.display());
                BTreeMap::new()
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                warn!("Failed to read session file {}: {err}", path.display());
                BTreeMap::new()
            }
        };

        debug!("session file: {}", path.display());

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate(&self, change: impl FnOnce(&mut BTreeMap<String, String>)) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        change(&mut entries);
        if let Err(err) = persist(&self.path, &entries) {
            warn!("Failed to write session file {}: {err}", self.path.display());
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) {
        self.mutate(|entries| {
            entries.remove(key);
        });
    }

    fn clear(&self) {
        self.mutate(BTreeMap::clear);
    }
}

// Random sibling temp file plus rename: readers never see half a file.
fn persist(path: &Path, entries: &BTreeMap<String, String>) -> io::Result<()> {
    let parent = match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent)?;
            parent
        }
        None => Path::new("."),
    };

    let contents = serde_json::to_vec_pretty(entries).map_err(io::Error::other)?;
    // Created with 0600 on Unix.
    let mut temp_file = NamedTempFile::new_in(parent)?;
    temp_file.write_all(&contents)?;
    temp_file.persist(path)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{FileStore, KeyValueStore};
    use std::fs;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileStore::open(&path);
        store.set("ss_access", "t1");
        store.set("ss_user", r#"{"username":"alice","email":"a@x.com"}"#);
        drop(store);

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("ss_access").as_deref(), Some("t1"));
        assert_eq!(
            reopened.get("ss_user").as_deref(),
            Some(r#"{"username":"alice","email":"a@x.com"}"#)
        );
    }

    #[test]
    fn remove_and_clear_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let store = FileStore::open(&path);
        store.set("ss_access", "t1");
        store.set("ss_refresh", "r1");
        store.remove("ss_access");

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("ss_access"), None);
        assert_eq!(reopened.get("ss_refresh").as_deref(), Some("r1"));

        reopened.clear();
        assert_eq!(FileStore::open(&path).get("ss_refresh"), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("ss_access"), None);

        store.set("ss_access", "t1");
        assert_eq!(FileStore::open(&path).get("ss_access").as_deref(), Some("t1"));
    }

    #[cfg(unix)]
    #[test]
    fn file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileStore::open(&path);
        store.set("ss_access", "t1");

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn planted_temp_symlink_receives_nothing() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let target = dir.path().join("elsewhere.txt");
        fs::write(&target, "").unwrap();
        symlink(&target, dir.path().join("session.json.tmp")).unwrap();

        let store = FileStore::open(&path);
        store.set("ss_access", "t1");

        assert_eq!(fs::read_to_string(&target).unwrap(), "");
        assert!(!fs::symlink_metadata(&path).unwrap().file_type().is_symlink());
        assert_eq!(FileStore::open(&path).get("ss_access").as_deref(), Some("t1"));
    }
}
