//! Error types for storage and staging operations.
//!
//! The codec never interprets these errors: it surfaces them to the caller
//! wrapped as a resource failure.

use std::fmt;
use thiserror::Error;

/// The category of a storage error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreErrorCode {
    /// The requested object or staged file does not exist.
    NotFound,
    /// A file with the same name is already staged or stored.
    AlreadyExists,
    /// A public location could not be mapped back to an object key.
    InvalidLocation,
    /// Filesystem I/O failed.
    Io,
    /// Store configuration is missing or invalid.
    Configuration,
}

impl StoreErrorCode {
    /// Returns true if the failure is transient.
    ///
    /// The codec never retries; this is a hint for store adapters.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io)
    }

    /// Returns a stable name for this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::InvalidLocation => "invalid_location",
            Self::Io => "io_error",
            Self::Configuration => "configuration_error",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An error raised by an object store or the staging area.
#[derive(Debug, Error)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    /// The store that generated this error (e.g. "directory", "staging").
    store: Option<String>,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StoreError {
    /// Creates a new store error with the given code and message.
    pub fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            store: None,
            source: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::NotFound, message)
    }

    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::AlreadyExists, message)
    }

    pub fn invalid_location(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::InvalidLocation, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Io, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::Configuration, message)
    }

    /// Sets the store name for this error.
    pub fn with_store(mut self, store: impl Into<String>) -> Self {
        self.store = Some(store.into());
        self
    }

    /// Sets the underlying cause.
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn store(&self) -> Option<&str> {
        self.store.as_deref()
    }

    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable()
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref store) = self.store {
            write!(f, "[{}] ", store)?;
        }
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => StoreErrorCode::NotFound,
            std::io::ErrorKind::AlreadyExists => StoreErrorCode::AlreadyExists,
            _ => StoreErrorCode::Io,
        };
        Self::new(code, err.to_string()).with_source(err)
    }
}

/// A specialized Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_io_is_retryable() {
        assert!(StoreErrorCode::Io.is_retryable());
        assert!(!StoreErrorCode::NotFound.is_retryable());
        assert!(!StoreErrorCode::AlreadyExists.is_retryable());
        assert!(!StoreErrorCode::InvalidLocation.is_retryable());
    }

    #[test]
    fn display_includes_store_and_code() {
        let err = StoreError::not_found("calendar.ics").with_store("directory");
        let display = err.to_string();
        assert!(display.contains("[directory]"));
        assert!(display.contains("not_found"));
        assert!(display.contains("calendar.ics"));
    }

    #[test]
    fn io_error_kind_maps_to_code() {
        let err: StoreError = std::io::Error::from(std::io::ErrorKind::NotFound).into();
        assert_eq!(err.code(), StoreErrorCode::NotFound);

        let err: StoreError = std::io::Error::other("disk full").into();
        assert_eq!(err.code(), StoreErrorCode::Io);
        assert!(err.is_retryable());
    }

    #[test]
    fn with_source_is_exposed() {
        use std::error::Error;
        let err = StoreError::io("write failed").with_source(std::io::Error::other("disk full"));
        assert!(err.source().is_some());
    }
}
