//! Error type shared by the local and remote directory operations

use std::fmt;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Boxed provider error carried by [`Error::Storage`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Regex mode was requested together with a list of substrings
    #[error("regex filters take a single pattern, not a list of substrings")]
    InvalidFilterCombination,

    #[error("invalid filter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),

    #[error("configuration error: {0}")]
    Configuration(String),

    /// Failure reported by the object-storage provider
    #[error("storage {operation} failed for '{key}': {source}")]
    Storage {
        operation: StorageOperation,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn storage(
        operation: StorageOperation,
        key: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Error::Storage {
            operation,
            key: key.into(),
            source: source.into(),
        }
    }

    /// The storage operation that failed, if this is a provider error
    pub fn storage_operation(&self) -> Option<StorageOperation> {
        match self {
            Error::Storage { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageOperation {
    List,
    Copy,
    Delete,
    Put,
    Get,
}

impl fmt::Display for StorageOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageOperation::List => "list",
            StorageOperation::Copy => "copy",
            StorageOperation::Delete => "delete",
            StorageOperation::Put => "put",
            StorageOperation::Get => "get",
        };
        f.write_str(name)
    }
}
