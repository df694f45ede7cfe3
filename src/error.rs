//! Error types for elohim-shares

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid storage index: {0:?}")]
    InvalidStorageIndex(String),

    #[error("Partial range not supported: offset {offset}, length {length} for a {share_len}-byte share")]
    PartialRange {
        offset: u64,
        length: u64,
        share_len: u64,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StorageError {
    /// True only for a filesystem `NotFound`, never for other I/O failures.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_classification() {
        let missing = StorageError::from(io::Error::new(io::ErrorKind::NotFound, "gone"));
        assert!(missing.is_not_found());

        let denied = StorageError::from(io::Error::new(io::ErrorKind::PermissionDenied, "no"));
        assert!(!denied.is_not_found());

        assert!(!StorageError::InvalidStorageIndex("a".into()).is_not_found());
    }
}
