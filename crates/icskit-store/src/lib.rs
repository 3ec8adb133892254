//! Object storage and local staging for generated calendar files.
//!
//! - [`ObjectStore`] - publish / delete / load calendar files by public URL
//! - [`DirectoryStore`] - a local directory acting as the bucket
//! - [`StagingArea`] - scoped local files for upload and download
//! - [`StoreError`] - error taxonomy for all of the above

pub mod directory;
pub mod error;
pub mod staging;
pub mod store;

pub use directory::DirectoryStore;
pub use error::{StoreError, StoreErrorCode, StoreResult};
pub use staging::StagingArea;
pub use store::{CALENDAR_CONTENT_TYPE, ObjectStore};
