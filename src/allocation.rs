//! Share allocation
//!
//! Splits a request into shares that are already committed and shares that
//! still need staging, then creates an empty staging placeholder for each of
//! the latter. The batch is not atomic: if placeholder N fails, placeholders
//! 1..N-1 stay on disk and the error is returned. Re-issuing the same request
//! is safe, existing placeholders are truncated and reused.

use crate::error::Result;
use crate::paths;
use crate::types::{AllocationResult, ShareNumber, StorageIndex};
use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Whether `path` exists, treating only `NotFound` as absence
async fn exists(path: &Path) -> io::Result<bool> {
    match fs::metadata(path).await {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Allocate staging space for the requested shares of `storage_index`
pub async fn allocate(
    root: &Path,
    storage_index: &StorageIndex,
    requested: &[ShareNumber],
) -> Result<AllocationResult> {
    let mut already_have = Vec::new();
    let mut to_allocate = Vec::new();

    for &share in requested {
        if exists(&paths::final_path(root, storage_index, share)?).await? {
            already_have.push(share);
        } else {
            to_allocate.push(share);
        }
    }

    for &share in &to_allocate {
        let staging = paths::staging_path(root, storage_index, share)?;
        if let Some(parent) = staging.parent() {
            fs::create_dir_all(parent).await?;
        }
        // create + truncate
        fs::File::create(&staging).await?;

        debug!(
            storage_index = %storage_index,
            share = %share,
            path = %staging.display(),
            "Staged share placeholder"
        );
    }

    info!(
        storage_index = %storage_index,
        already_have = already_have.len(),
        allocated = to_allocate.len(),
        "Allocated storage index"
    );

    Ok(AllocationResult {
        already_have,
        allocated: to_allocate,
    })
}
