//! Error types for twig

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for twig operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in twig operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// The stored bytes could not be decompressed, or the object header is unreadable.
    #[error("Storage corruption: {0}")]
    StorageCorruption(String),

    /// Valid compression and header, but the body does not have the expected structure.
    #[error("Malformed object: {0}")]
    MalformedObject(String),

    #[error("Object type mismatch: expected {expected}, found {found}")]
    ObjectTypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Not a repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("Unsupported path: {}", .0.display())]
    UnsupportedPath(PathBuf),

    #[error("Config error: {0}")]
    Config(String),
}
