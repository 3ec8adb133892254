//! Local staging of calendar files.
//!
//! Generated calendars are written to a staging directory before they are
//! handed to an [`ObjectStore`](crate::ObjectStore), and published calendars
//! are copied into it before they are read back. Every staged file lives
//! only for the duration of a closure: [`StagingArea::stage`] and
//! [`StagingArea::fetch`] remove the file on every exit path, whether the
//! closure succeeds or fails.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::store::ObjectStore;

const STORE_NAME: &str = "staging";

#[derive(Debug)]
enum Location {
    /// A caller-provided directory, left in place afterwards.
    Fixed(PathBuf),
    /// A private temporary directory.
    Temporary(TempDir),
}

/// A directory in which calendar files are staged.
#[derive(Debug)]
pub struct StagingArea {
    location: Location,
}

impl StagingArea {
    /// Stages files in a fresh private temporary directory.
    pub fn temporary() -> StoreResult<Self> {
        let dir = tempfile::Builder::new()
            .prefix("icskit-")
            .tempdir()
            .map_err(|e| StoreError::from(e).with_store(STORE_NAME))?;
        debug!(dir = %dir.path().display(), "Created temporary staging directory");
        Ok(Self {
            location: Location::Temporary(dir),
        })
    }

    /// Stages files in `dir`, creating it if needed.
    pub fn in_dir(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StoreError::from(e).with_store(STORE_NAME))?;
        Ok(Self {
            location: Location::Fixed(dir),
        })
    }

    /// Returns the staging directory.
    pub fn dir(&self) -> &Path {
        match &self.location {
            Location::Fixed(dir) => dir,
            Location::Temporary(dir) => dir.path(),
        }
    }

    /// Writes `content` to a new file called `name`, runs `f` with its path,
    /// then removes the file.
    ///
    /// Fails with `AlreadyExists` if a file called `name` is already staged;
    /// it is left untouched in that case.
    pub fn stage<T, E>(
        &self,
        name: &str,
        content: &str,
        f: impl FnOnce(&Path) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let path = self.create(name, content)?;
        let result = f(&path);
        self.discard(&path);
        result
    }

    /// Loads the object behind `public_url` into the staging directory, runs
    /// `f` with its local path, then removes the local copy.
    pub fn fetch<T, E>(
        &self,
        store: &dyn ObjectStore,
        public_url: &str,
        f: impl FnOnce(&Path) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<StoreError>,
    {
        let path = store.load(public_url, self.dir())?;
        let result = f(&path);
        self.discard(&path);
        result
    }

    /// Opens a staged file for reading.
    pub fn open_for_read(&self, path: &Path) -> StoreResult<File> {
        File::open(path).map_err(|e| StoreError::from(e).with_store(STORE_NAME))
    }

    /// Reads a staged file as UTF-8 text.
    pub fn read(&self, path: &Path) -> StoreResult<String> {
        let mut content = String::new();
        self.open_for_read(path)?
            .read_to_string(&mut content)
            .map_err(|e| StoreError::from(e).with_store(STORE_NAME))?;
        Ok(content)
    }

    fn create(&self, name: &str, content: &str) -> StoreResult<PathBuf> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(StoreError::invalid_location(format!(
                "{name:?} is not a valid staged file name"
            ))
            .with_store(STORE_NAME));
        }

        let path = self.dir().join(name);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::AlreadyExists {
                    StoreError::already_exists(format!(
                        "file {} is already staged, delete it first",
                        path.display()
                    ))
                    .with_store(STORE_NAME)
                } else {
                    StoreError::from(e).with_store(STORE_NAME)
                }
            })?;

        let written = file
            .write_all(content.as_bytes())
            .and_then(|()| file.sync_all());
        if let Err(e) = written {
            self.discard(&path);
            return Err(StoreError::from(e).with_store(STORE_NAME));
        }

        debug!(path = %path.display(), bytes = content.len(), "Staged file");
        Ok(path)
    }

    fn discard(&self, path: &Path) {
        match fs::remove_file(path) {
            Ok(()) => debug!(path = %path.display(), "Removed staged file"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove staged file"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreErrorCode;

    #[derive(Debug)]
    struct Failed(StoreError);

    impl From<StoreError> for Failed {
        fn from(err: StoreError) -> Self {
            Self(err)
        }
    }

    #[test]
    fn staged_file_exists_only_inside_closure() {
        let staging = StagingArea::temporary().unwrap();
        let mut seen = None;

        let len = staging
            .stage("a.ics", "hello", |path| {
                seen = Some(path.to_path_buf());
                staging.read(path).map(|content| content.len())
            })
            .unwrap();

        assert_eq!(len, 5);
        let seen = seen.unwrap();
        assert_eq!(seen.parent(), Some(staging.dir()));
        assert!(!seen.exists());
    }

    #[test]
    fn staged_file_removed_when_closure_fails() {
        let dir = tempfile::tempdir().unwrap();
        let staging = StagingArea::in_dir(dir.path().join("nested")).unwrap();

        let result: Result<(), Failed> = staging.stage("b.ics", "x", |_| {
            Err(Failed(StoreError::io("upload failed")))
        });

        let Err(Failed(err)) = result else {
            panic!("expected the closure error");
        };
        assert_eq!(err.message(), "upload failed");
        assert!(!dir.path().join("nested/b.ics").exists());
    }

    #[test]
    fn existing_file_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("c.ics"), "keep me").unwrap();
        let staging = StagingArea::in_dir(dir.path()).unwrap();

        let err = staging
            .stage("c.ics", "new", |_| Ok::<_, StoreError>(()))
            .unwrap_err();

        assert_eq!(err.code(), StoreErrorCode::AlreadyExists);
        assert_eq!(fs::read_to_string(dir.path().join("c.ics")).unwrap(), "keep me");
    }

    #[test]
    fn rejects_names_with_separators() {
        let staging = StagingArea::temporary().unwrap();
        let err = staging
            .stage("../escape.ics", "x", |_| Ok::<_, StoreError>(()))
            .unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::InvalidLocation);
    }

    #[test]
    fn temporary_directory_is_removed_on_drop() {
        let staging = StagingArea::temporary().unwrap();
        let dir = staging.dir().to_path_buf();
        assert!(dir.is_dir());
        drop(staging);
        assert!(!dir.exists());
    }
}
