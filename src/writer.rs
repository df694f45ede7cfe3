//! Whole-share upload and commit
//!
//! Content is written to the staging file created by allocation, then
//! published with a single `rename(2)` onto the committed path. Readers see
//! either nothing or the complete share, never a partial one. Staging and
//! committed trees share `<root>/shares`, so the rename never crosses a
//! filesystem boundary.

use crate::error::{Result, StorageError};
use crate::paths;
use crate::types::{ByteRange, ShareNumber, StorageIndex};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Write `data` as share `share` of `storage_index` and commit it
///
/// The share must have been allocated first; a missing staging directory
/// surfaces as a `NotFound` I/O error. Two concurrent writers of the same
/// share race and the last rename wins.
pub async fn write_share(
    root: &Path,
    storage_index: &StorageIndex,
    share: ShareNumber,
    data: &[u8],
    range: Option<ByteRange>,
) -> Result<()> {
    let share_len = data.len() as u64;
    if let Some(range) = range {
        if !range.covers_whole(share_len) {
            return Err(StorageError::PartialRange {
                offset: range.offset,
                length: range.length,
                share_len,
            });
        }
    }

    let staging = paths::staging_path(root, storage_index, share)?;
    let committed = paths::final_path(root, storage_index, share)?;

    fs::write(&staging, data).await?;
    debug!(
        storage_index = %storage_index,
        share = %share,
        size = share_len,
        "Wrote staged share"
    );

    if let Some(parent) = committed.parent() {
        fs::create_dir_all(parent).await?;
    }
    fs::rename(&staging, &committed).await?;

    info!(
        storage_index = %storage_index,
        share = %share,
        size = share_len,
        path = %committed.display(),
        "Committed share"
    );

    Ok(())
}
