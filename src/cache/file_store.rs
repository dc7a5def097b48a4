//! cache::file_store
//!
//! File-based cache storage.
//!
//! # Layout
//!
//! - One file per forge: `<cache-root>/<forge>-changesets.json`
//! - Freshness is the file's modification time plus the TTL
//! - The cache root is created with mode 0750 on Unix
//! - Cache files are created with mode 0644 on Unix
//! - All writes are atomic (write to a unique temp file, then rename)
//!
//! Concurrent writers are not serialized. The last rename wins, and every
//! rename installs a complete file.
//!
//! # Example
//!
//! ```ignore
//! use gitforge::cache::{CacheStore, FileCacheStore, DEFAULT_TTL};
//!
//! let store = FileCacheStore::new(cache_root, DEFAULT_TTL);
//! store.write("github", b"[]")?;
//!
//! if let Some(bytes) = store.read("github")? {
//!     // Fresh for the next three hours...
//! }
//! ```

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

#[cfg(unix)]
use std::os::unix::fs::{DirBuilderExt, OpenOptionsExt};

use uuid::Uuid;

use super::traits::{CacheError, CacheStore};
use crate::core::paths::cache_file_path;

/// Default freshness window: 180 minutes.
pub const DEFAULT_TTL: Duration = Duration::from_secs(180 * 60);

/// File-based cache store.
#[derive(Debug, Clone)]
pub struct FileCacheStore {
    /// Directory holding the cache files
    root: PathBuf,
    /// Freshness window
    ttl: Duration,
}

impl FileCacheStore {
    /// Create a store rooted at `root` with the given freshness window.
    ///
    /// Nothing is touched on disk until the first write.
    pub fn new(root: PathBuf, ttl: Duration) -> Self {
        Self { root, ttl }
    }

    /// Get the cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the cache file for `forge`.
    ///
    /// This is `<cache-root>/<forge>-changesets.json`.
    pub fn path(&self, forge: &str) -> PathBuf {
        cache_file_path(&self.root, forge)
    }

    /// Age of the entry for `forge`, or `None` if there is no entry.
    ///
    /// A modification time in the future counts as age zero.
    pub fn age(&self, forge: &str) -> Result<Option<Duration>, CacheError> {
        let path = self.path(forge);
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(CacheError::Read { path, source: e }),
        };

        let modified = metadata
            .modified()
            .map_err(|e| CacheError::Read { path, source: e })?;

        Ok(Some(
            SystemTime::now()
                .duration_since(modified)
                .unwrap_or(Duration::ZERO),
        ))
    }

    fn create_root(&self) -> io::Result<()> {
        #[cfg(unix)]
        {
            fs::DirBuilder::new()
                .recursive(true)
                .mode(0o750)
                .create(&self.root)
        }

        #[cfg(not(unix))]
        {
            fs::create_dir_all(&self.root)
        }
    }

}

fn write_temp(temp_path: &Path, payload: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    options.mode(0o644);

    let mut file = options.open(temp_path)?;
    file.write_all(payload)?;
    file.sync_all()
}

/// Write `payload` beside `path` and rename it into place.
///
/// Errors name `path`; the temporary file is removed on failure.
fn replace(path: &Path, temp_path: &Path, payload: &[u8]) -> Result<(), CacheError> {
    let result = write_temp(temp_path, payload).and_then(|()| fs::rename(temp_path, path));
    result.map_err(|e| {
        let _ = fs::remove_file(temp_path);
        CacheError::Write {
            path: path.to_path_buf(),
            source: e,
        }
    })
}

impl CacheStore for FileCacheStore {
    fn read(&self, forge: &str) -> Result<Option<Vec<u8>>, CacheError> {
        match self.age(forge)? {
            Some(age) if age < self.ttl => {}
            _ => return Ok(None),
        }

        let path = self.path(forge);
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            // Deleted between the metadata check and the read
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Read { path, source: e }),
        }
    }

    fn write(&self, forge: &str, payload: &[u8]) -> Result<(), CacheError> {
        let path = self.path(forge);

        self.create_root().map_err(|e| CacheError::Write {
            path: path.clone(),
            source: e,
        })?;

        let temp_path = self
            .root
            .join(format!(".{}-changesets.{}.tmp", forge, Uuid::new_v4()));

        replace(&path, &temp_path, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_store() -> (TempDir, FileCacheStore) {
        let temp = TempDir::new().expect("create temp dir");
        let store = FileCacheStore::new(temp.path().join("cache"), DEFAULT_TTL);
        (temp, store)
    }

    fn backdate(path: &Path, age: Duration) {
        let file = OpenOptions::new()
            .write(true)
            .open(path)
            .expect("open for mtime");
        file.set_modified(SystemTime::now() - age)
            .expect("set mtime");
    }

    #[test]
    fn path_layout() {
        let store = FileCacheStore::new(PathBuf::from("/c"), DEFAULT_TTL);
        assert_eq!(
            store.path("github"),
            PathBuf::from("/c/github-changesets.json")
        );
    }

    #[test]
    fn read_missing_returns_none() {
        let (_temp, store) = create_test_store();
        assert!(store.read("github").expect("read").is_none());
        assert!(store.age("github").expect("age").is_none());
    }

    #[test]
    fn write_then_read() {
        let (_temp, store) = create_test_store();

        store.write("github", b"[1, 2, 3]").expect("write");

        let bytes = store.read("github").expect("read");
        assert_eq!(bytes.as_deref(), Some(&b"[1, 2, 3]"[..]));
    }

    #[test]
    fn write_overwrites_wholesale() {
        let (_temp, store) = create_test_store();

        store.write("github", b"first payload, longer").expect("write");
        store.write("github", b"second").expect("write");

        assert_eq!(
            store.read("github").expect("read").as_deref(),
            Some(&b"second"[..])
        );
    }

    #[test]
    fn forges_are_independent() {
        let (_temp, store) = create_test_store();

        store.write("github", b"gh").expect("write github");
        store.write("gitlab", b"gl").expect("write gitlab");

        assert_eq!(store.read("github").unwrap().as_deref(), Some(&b"gh"[..]));
        assert_eq!(store.read("gitlab").unwrap().as_deref(), Some(&b"gl"[..]));
    }

    #[test]
    fn stale_entry_returns_none() {
        let (_temp, store) = create_test_store();

        store.write("github", b"[]").expect("write");
        backdate(&store.path("github"), Duration::from_secs(181 * 60));

        assert!(store.read("github").expect("read").is_none());
        // Stale entries are never deleted by the store
        assert!(store.path("github").exists());
    }

    #[test]
    fn entry_inside_window_is_fresh() {
        let (_temp, store) = create_test_store();

        store.write("github", b"[]").expect("write");
        backdate(&store.path("github"), Duration::from_secs(179 * 60));

        assert!(store.read("github").expect("read").is_some());
    }

    #[test]
    fn future_mtime_counts_as_fresh() {
        let (_temp, store) = create_test_store();

        store.write("github", b"[]").expect("write");
        let file = OpenOptions::new()
            .write(true)
            .open(store.path("github"))
            .unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(3600))
            .unwrap();

        assert_eq!(store.age("github").unwrap(), Some(Duration::ZERO));
        assert!(store.read("github").expect("read").is_some());
    }

    #[test]
    fn rewrite_refreshes_stale_entry() {
        let (_temp, store) = create_test_store();

        store.write("github", b"old").expect("write");
        backdate(&store.path("github"), Duration::from_secs(200 * 60));
        store.write("github", b"new").expect("rewrite");

        assert_eq!(store.read("github").unwrap().as_deref(), Some(&b"new"[..]));
    }

    #[test]
    fn creates_root_if_missing() {
        let (_temp, store) = create_test_store();
        assert!(!store.root().exists());

        store.write("github", b"[]").expect("write");

        assert!(store.root().is_dir());
        assert!(store.path("github").is_file());
    }

    #[test]
    fn leaves_no_temp_files() {
        let (_temp, store) = create_test_store();

        store.write("github", b"[]").expect("write");
        store.write("github", b"[]").expect("write again");

        let names: Vec<_> = fs::read_dir(store.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, vec!["github-changesets.json".to_string()]);
    }

    #[test]
    fn unwritable_root_is_write_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("not-a-dir");
        fs::write(&blocker, b"file in the way").unwrap();

        let store = FileCacheStore::new(blocker, DEFAULT_TTL);
        let err = store.write("github", b"[]").unwrap_err();
        assert!(matches!(err, CacheError::Write { .. }));
    }

    #[test]
    fn failed_temp_write_names_cache_file() {
        let (temp, store) = create_test_store();
        let path = store.path("github");
        let temp_path = temp.path().join("missing").join(".github.tmp");

        let err = replace(&path, &temp_path, b"[]").unwrap_err();

        match err {
            CacheError::Write { path: named, .. } => assert_eq!(named, path),
            other => panic!("expected Write error, got {:?}", other),
        }
        assert!(!temp_path.exists());
    }

    #[cfg(unix)]
    #[test]
    fn permissions_on_unix() {
        use std::os::unix::fs::PermissionsExt;

        let (_temp, store) = create_test_store();
        store.write("github", b"[]").expect("write");

        let dir_mode = fs::metadata(store.root()).unwrap().permissions().mode() & 0o777;
        assert_eq!(dir_mode & 0o022, 0, "root must not be group/other writable");

        let file_mode = fs::metadata(store.path("github"))
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(file_mode & 0o022, 0, "file must not be group/other writable");
        assert_eq!(file_mode & 0o600, 0o600, "file must be owner read/write");
    }
}
