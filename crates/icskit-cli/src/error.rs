//! CLI error types.

use std::fmt;

use icskit_core::CodecError;
use icskit_store::StoreError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug)]
pub enum CliError {
    /// Configuration error.
    Config(String),
    /// Unreadable or malformed input file.
    Input(String),
    /// Output could not be rendered.
    Output(String),
    /// Building or digesting failed.
    Codec(CodecError),
    /// Storage or staging failed.
    Store(StoreError),
    /// IO error.
    Io(std::io::Error),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Input(msg) => write!(f, "input error: {}", msg),
            Self::Output(msg) => write!(f, "output error: {}", msg),
            Self::Codec(err) => write!(f, "{}", err),
            Self::Store(err) => write!(f, "{}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CodecError> for CliError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

impl From<StoreError> for CliError {
    fn from(err: StoreError) -> Self {
        Self::Store(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}
