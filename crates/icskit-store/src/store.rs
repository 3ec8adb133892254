//! ObjectStore trait definition.
//!
//! An object store publishes a local file under a public location and can
//! bring it back. Stores are responsible for:
//! - Mapping local files to object keys and public URLs
//! - Deleting published objects
//! - Materializing a published object into a local directory
//!
//! Each operation is invoked at most once per logical calendar operation.
//! Retries, if any, belong to the store implementation.

use std::path::{Path, PathBuf};

use crate::error::StoreResult;

/// Content type used when publishing calendar files.
pub const CALENDAR_CONTENT_TYPE: &str = "text/calendar";

/// The storage backend for published calendar files.
pub trait ObjectStore {
    /// Returns the store name (used in errors and logs).
    fn name(&self) -> &str;

    /// Publishes the file at `local_path` and returns its public URL.
    ///
    /// The object key is the file name of `local_path`.
    fn save(&self, local_path: &Path, content_type: &str) -> StoreResult<String>;

    /// Deletes the object behind `public_url`.
    ///
    /// Returns `false` if there was nothing to delete.
    fn delete(&self, public_url: &str) -> StoreResult<bool>;

    /// Copies the object behind `public_url` into `dest_dir` and returns the
    /// local path of the copy.
    fn load(&self, public_url: &str, dest_dir: &Path) -> StoreResult<PathBuf>;
}
