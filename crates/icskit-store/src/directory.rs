//! Directory-backed object store.
//!
//! A local directory plays the role of the bucket: saving copies the staged
//! file into it, and the public URL is the object key joined onto a base
//! URL (a CDN prefix, a web server path, or the directory's own `file://`
//! URL).

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;

use crate::error::{StoreError, StoreResult};
use crate::store::ObjectStore;

const STORE_NAME: &str = "directory";

/// An [`ObjectStore`] that keeps objects as files in a local directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    base_url: Url,
}

impl DirectoryStore {
    /// Creates a store rooted at `root`, publishing under the directory's
    /// `file://` URL.
    ///
    /// The directory is created if it does not exist.
    pub fn new(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| StoreError::from(e).with_store(STORE_NAME))?;
        let root = root
            .canonicalize()
            .map_err(|e| StoreError::from(e).with_store(STORE_NAME))?;
        let base_url = Url::from_directory_path(&root).map_err(|()| {
            StoreError::configuration(format!(
                "cannot derive a file URL from {}",
                root.display()
            ))
            .with_store(STORE_NAME)
        })?;
        Ok(Self { root, base_url })
    }

    /// Creates a store rooted at `root`, publishing under `base_url`.
    pub fn with_base_url(root: impl Into<PathBuf>, base_url: &str) -> StoreResult<Self> {
        let mut store = Self::new(root)?;
        let mut base_url = Url::parse(base_url).map_err(|e| {
            StoreError::configuration(format!("invalid base URL {base_url:?}"))
                .with_store(STORE_NAME)
                .with_source(e)
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        store.base_url = base_url;
        Ok(store)
    }

    /// Returns the directory objects are stored in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the URL prefix objects are published under.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Returns the public URL for an object key.
    pub fn url_for(&self, key: &str) -> StoreResult<Url> {
        self.base_url.join(&urlencoding::encode(key)).map_err(|e| {
            StoreError::invalid_location(format!("cannot publish key {key:?}"))
                .with_store(STORE_NAME)
                .with_source(e)
        })
    }

    /// Maps a public URL back to its object key.
    pub fn key_for(&self, public_url: &str) -> StoreResult<String> {
        let invalid = || {
            StoreError::invalid_location(format!("{public_url} is not served by this store"))
                .with_store(STORE_NAME)
        };

        let url = Url::parse(public_url).map_err(|e| invalid().with_source(e))?;
        let encoded = url
            .as_str()
            .strip_prefix(self.base_url.as_str())
            .ok_or_else(invalid)?;
        let key = urlencoding::decode(encoded).map_err(|e| invalid().with_source(e))?;

        if key.is_empty() || key.contains('/') || key.contains('\\') || key == ".." {
            return Err(invalid());
        }
        Ok(key.into_owned())
    }

    fn object_path(&self, public_url: &str) -> StoreResult<(String, PathBuf)> {
        let key = self.key_for(public_url)?;
        let path = self.root.join(&key);
        Ok((key, path))
    }
}

impl ObjectStore for DirectoryStore {
    fn name(&self) -> &str {
        STORE_NAME
    }

    fn save(&self, local_path: &Path, content_type: &str) -> StoreResult<String> {
        let key = local_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                StoreError::invalid_location(format!(
                    "{} has no usable file name",
                    local_path.display()
                ))
                .with_store(STORE_NAME)
            })?;

        let url = self.url_for(key)?;
        fs::copy(local_path, self.root.join(key))
            .map_err(|e| StoreError::from(e).with_store(STORE_NAME))?;

        info!(key = %key, content_type = %content_type, url = %url, "Published object");
        Ok(url.into())
    }

    fn delete(&self, public_url: &str) -> StoreResult<bool> {
        let (key, path) = self.object_path(public_url)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                info!(key = %key, "Deleted object");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(key = %key, "Nothing to delete");
                Ok(false)
            }
            Err(e) => Err(StoreError::from(e).with_store(STORE_NAME)),
        }
    }

    fn load(&self, public_url: &str, dest_dir: &Path) -> StoreResult<PathBuf> {
        let (key, path) = self.object_path(public_url)?;
        if !path.is_file() {
            return Err(StoreError::not_found(format!("object {key} does not exist"))
                .with_store(STORE_NAME));
        }

        let dest = dest_dir.join(&key);
        fs::copy(&path, &dest).map_err(|e| StoreError::from(e).with_store(STORE_NAME))?;

        debug!(key = %key, dest = %dest.display(), "Loaded object");
        Ok(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorCode;
    use crate::store::CALENDAR_CONTENT_TYPE;

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn save_then_load_round_trips() {
        let bucket = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(bucket.path()).unwrap();

        let local = write(work.path(), "cal.ics", "BEGIN:VCALENDAR\r\n");
        let url = store.save(&local, CALENDAR_CONTENT_TYPE).unwrap();
        assert!(url.starts_with("file://"));
        assert!(url.ends_with("/cal.ics"));

        let dest = tempfile::tempdir().unwrap();
        let loaded = store.load(&url, dest.path()).unwrap();
        assert_eq!(loaded, dest.path().join("cal.ics"));
        assert_eq!(fs::read_to_string(loaded).unwrap(), "BEGIN:VCALENDAR\r\n");
    }

    #[test]
    fn base_url_gets_trailing_slash() {
        let bucket = tempfile::tempdir().unwrap();
        let store =
            DirectoryStore::with_base_url(bucket.path(), "https://cdn.example.com/calendars")
                .unwrap();
        assert_eq!(
            store.url_for("abc.ics").unwrap().as_str(),
            "https://cdn.example.com/calendars/abc.ics"
        );
    }

    #[test]
    fn keys_are_percent_encoded() {
        let bucket = tempfile::tempdir().unwrap();
        let store = DirectoryStore::with_base_url(bucket.path(), "https://cdn.example.com/").unwrap();
        let url = store.url_for("my calendar.ics").unwrap();
        assert_eq!(url.as_str(), "https://cdn.example.com/my%20calendar.ics");
        assert_eq!(store.key_for(url.as_str()).unwrap(), "my calendar.ics");
    }

    #[test]
    fn foreign_url_is_rejected() {
        let bucket = tempfile::tempdir().unwrap();
        let store = DirectoryStore::with_base_url(bucket.path(), "https://cdn.example.com/").unwrap();
        let err = store.key_for("https://elsewhere.example.com/x.ics").unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::InvalidLocation);

        let err = store
            .key_for("https://cdn.example.com/nested/x.ics")
            .unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::InvalidLocation);
    }

    #[test]
    fn delete_reports_whether_object_existed() {
        let bucket = tempfile::tempdir().unwrap();
        let work = tempfile::tempdir().unwrap();
        let store = DirectoryStore::new(bucket.path()).unwrap();

        let local = write(work.path(), "gone.ics", "x");
        let url = store.save(&local, CALENDAR_CONTENT_TYPE).unwrap();

        assert!(store.delete(&url).unwrap());
        assert!(!store.delete(&url).unwrap());
    }

    #[test]
    fn load_missing_object_is_not_found() {
        let bucket = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();
        let store = DirectoryStore::with_base_url(bucket.path(), "https://cdn.example.com/").unwrap();

        let err = store
            .load("https://cdn.example.com/missing.ics", dest.path())
            .unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::NotFound);
        assert_eq!(err.store(), Some("directory"));
    }
}
