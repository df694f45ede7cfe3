//! Sharded on-disk layout
//!
//! ```text
//! <root>/shares/incoming/<prefix>/<storage_index>/<share_number>   staging
//! <root>/shares/<prefix>/<storage_index>/<share_number>            committed
//! ```
//!
//! `<prefix>` is the first two characters of the storage index, which keeps
//! the fan-out of `shares/` bounded as indices accumulate.

use crate::error::{Result, StorageError};
use crate::types::{ShareNumber, StorageIndex};
use std::path::{Path, PathBuf};

const SHARES_DIR: &str = "shares";
const INCOMING_DIR: &str = "incoming";

/// First two characters of the storage index
///
/// Fails for indices shorter than two characters, and for anything that is
/// not a single path component, since either would break path uniqueness.
pub fn prefix_of(storage_index: &StorageIndex) -> Result<&str> {
    let s = storage_index.as_str();
    let invalid = || StorageError::InvalidStorageIndex(s.to_string());

    if s == "." || s == ".." || s.contains(['/', '\\', '\0']) {
        return Err(invalid());
    }

    match s.char_indices().nth(2) {
        Some((end, _)) => Ok(&s[..end]),
        None if s.chars().count() == 2 => Ok(s),
        None => Err(invalid()),
    }
}

pub fn shares_dir(root: &Path) -> PathBuf {
    root.join(SHARES_DIR)
}

pub fn incoming_dir(root: &Path) -> PathBuf {
    shares_dir(root).join(INCOMING_DIR)
}

/// Directory holding every committed share of a storage index
pub fn final_dir(root: &Path, storage_index: &StorageIndex) -> Result<PathBuf> {
    let prefix = prefix_of(storage_index)?;
    Ok(shares_dir(root).join(prefix).join(storage_index.as_str()))
}

/// Directory holding every staged share of a storage index
pub fn staging_dir(root: &Path, storage_index: &StorageIndex) -> Result<PathBuf> {
    let prefix = prefix_of(storage_index)?;
    Ok(incoming_dir(root).join(prefix).join(storage_index.as_str()))
}

pub fn final_path(root: &Path, storage_index: &StorageIndex, share: ShareNumber) -> Result<PathBuf> {
    Ok(final_dir(root, storage_index)?.join(share.to_string()))
}

pub fn staging_path(
    root: &Path,
    storage_index: &StorageIndex,
    share: ShareNumber,
) -> Result<PathBuf> {
    Ok(staging_dir(root, storage_index)?.join(share.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_of() {
        assert_eq!(prefix_of(&"aaaabbbb".into()).unwrap(), "aa");
        assert_eq!(prefix_of(&"xy".into()).unwrap(), "xy");
        assert_eq!(prefix_of(&"éü-index".into()).unwrap(), "éü");
    }

    #[test]
    fn test_short_index_rejected() {
        for bad in ["", "a", "é"] {
            let err = prefix_of(&bad.into()).unwrap_err();
            assert!(matches!(err, StorageError::InvalidStorageIndex(_)));
        }
    }

    #[test]
    fn test_non_component_index_rejected() {
        for bad in ["..", "ab/cd", "ab\\cd", "ab\0"] {
            assert!(prefix_of(&bad.into()).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_layout() {
        let root = Path::new("/srv/node");
        let si = StorageIndex::from("rkqjx3bbmz7y");

        assert_eq!(
            final_path(root, &si, ShareNumber(3)).unwrap(),
            PathBuf::from("/srv/node/shares/rk/rkqjx3bbmz7y/3")
        );
        assert_eq!(
            staging_path(root, &si, ShareNumber(3)).unwrap(),
            PathBuf::from("/srv/node/shares/incoming/rk/rkqjx3bbmz7y/3")
        );
    }

    #[test]
    fn test_final_and_staging_differ_only_in_incoming() {
        let root = Path::new("/data");
        for (si, n) in [("ab", 0u64), ("inbound", 1), ("zz9", 255), ("shares", 42)] {
            let si = StorageIndex::from(si);
            let final_p = final_path(root, &si, ShareNumber(n)).unwrap();
            let staging_p = staging_path(root, &si, ShareNumber(n)).unwrap();

            let mut staged: Vec<_> = staging_p.components().collect();
            let incoming = staged.iter().position(|c| c.as_os_str() == INCOMING_DIR).unwrap();
            staged.remove(incoming);

            assert_eq!(staged, final_p.components().collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_distinct_shares_do_not_collide() {
        let root = Path::new("/data");
        let a = final_path(root, &"abc".into(), ShareNumber(1)).unwrap();
        let b = final_path(root, &"abc".into(), ShareNumber(11)).unwrap();
        let c = final_path(root, &"abcd".into(), ShareNumber(1)).unwrap();
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_ne!(b, c);
    }
}
