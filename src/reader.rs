//! Listing and reading committed shares

use crate::error::Result;
use crate::paths;
use crate::types::{ByteRange, ShareNumber, StorageIndex};
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::debug;

/// Share numbers committed under `storage_index`
///
/// An unknown storage index has no directory and yields an empty set. Entry
/// names that are not share numbers are skipped.
pub async fn list_share_numbers(
    root: &Path,
    storage_index: &StorageIndex,
) -> Result<BTreeSet<ShareNumber>> {
    let dir = paths::final_dir(root, storage_index)?;

    let mut entries = match fs::read_dir(&dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(e) => return Err(e.into()),
    };

    let mut shares = BTreeSet::new();
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        match name.to_str().and_then(|s| s.parse::<ShareNumber>().ok()) {
            Some(share) => {
                shares.insert(share);
            }
            None => debug!(
                storage_index = %storage_index,
                entry = %name.to_string_lossy(),
                "Skipping non-share entry"
            ),
        }
    }

    Ok(shares)
}

/// Full contents of the requested committed shares
///
/// Each share maps to a one-element vector holding its whole content. The
/// range arguments are accepted for interface compatibility and not applied.
/// Any missing share fails the whole call.
pub async fn read_shares(
    root: &Path,
    storage_index: &StorageIndex,
    shares: &[ShareNumber],
    read_ranges: &[ByteRange],
    write_ranges: &[ByteRange],
) -> Result<BTreeMap<ShareNumber, Vec<Bytes>>> {
    if !read_ranges.is_empty() || !write_ranges.is_empty() {
        debug!(
            storage_index = %storage_index,
            read_ranges = read_ranges.len(),
            write_ranges = write_ranges.len(),
            "Ignoring ranges, serving whole shares"
        );
    }

    let mut out = BTreeMap::new();
    for &share in shares {
        let path = paths::final_path(root, storage_index, share)?;
        let data = fs::read(&path).await?;
        debug!(storage_index = %storage_index, share = %share, size = data.len(), "Read share");
        out.insert(share, vec![Bytes::from(data)]);
    }

    Ok(out)
}

/// Size in bytes of one committed share
pub async fn share_size(
    root: &Path,
    storage_index: &StorageIndex,
    share: ShareNumber,
) -> Result<u64> {
    let path = paths::final_path(root, storage_index, share)?;
    Ok(fs::metadata(&path).await?.len())
}
