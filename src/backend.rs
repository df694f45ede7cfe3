//! Storage backend interface and its filesystem implementation
//!
//! The protocol layer talks to shares only through [`StorageBackend`]. Each
//! storage medium gets its own implementation; [`FilesystemBackend`] keeps
//! shares as plain files under a local root directory.

use crate::allocation;
use crate::capacity;
use crate::config::BackendConfig;
use crate::error::Result;
use crate::paths;
use crate::reader;
use crate::types::{AllocationResult, ByteRange, ShareNumber, StorageIndex, Version};
use crate::writer;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

/// Operations a storage protocol server needs from a share store
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// Capacity and capability snapshot
    async fn version(&self) -> Result<Version>;

    /// Stage the requested shares that are not already committed
    async fn create_immutable_storage_index(
        &self,
        storage_index: &StorageIndex,
        shares: &[ShareNumber],
    ) -> Result<AllocationResult>;

    /// Upload and commit one whole share; `range`, if given, must cover all of `data`
    async fn write_immutable_share(
        &self,
        storage_index: &StorageIndex,
        share: ShareNumber,
        data: Bytes,
        range: Option<ByteRange>,
    ) -> Result<()>;

    /// Committed share numbers; empty for an unknown storage index
    async fn get_immutable_share_numbers(
        &self,
        storage_index: &StorageIndex,
    ) -> Result<BTreeSet<ShareNumber>>;

    /// Whole contents of the requested shares
    async fn read_immutable_shares(
        &self,
        storage_index: &StorageIndex,
        shares: &[ShareNumber],
        read_ranges: &[ByteRange],
        write_ranges: &[ByteRange],
    ) -> Result<BTreeMap<ShareNumber, Vec<Bytes>>>;
}

/// Shares stored as files under a local directory
#[derive(Debug, Clone)]
pub struct FilesystemBackend {
    root: PathBuf,
    config: BackendConfig,
}

impl FilesystemBackend {
    /// Backend rooted at `root`; nothing is touched on disk
    pub fn new<P: AsRef<Path>>(root: P, config: BackendConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config,
        }
    }

    /// Backend rooted at `root`, creating `<root>/shares/incoming` if missing
    pub async fn open<P: AsRef<Path>>(root: P, config: BackendConfig) -> Result<Self> {
        let backend = Self::new(root, config);
        fs::create_dir_all(paths::incoming_dir(&backend.root)).await?;

        info!(path = %backend.root.display(), "Initialized share backend");

        Ok(backend)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Size of a committed share without reading it
    pub async fn share_size(&self, storage_index: &StorageIndex, share: ShareNumber) -> Result<u64> {
        reader::share_size(&self.root, storage_index, share).await
    }
}

#[async_trait]
impl StorageBackend for FilesystemBackend {
    async fn version(&self) -> Result<Version> {
        capacity::report_version(&self.root, &self.config).await
    }

    async fn create_immutable_storage_index(
        &self,
        storage_index: &StorageIndex,
        shares: &[ShareNumber],
    ) -> Result<AllocationResult> {
        allocation::allocate(&self.root, storage_index, shares).await
    }

    async fn write_immutable_share(
        &self,
        storage_index: &StorageIndex,
        share: ShareNumber,
        data: Bytes,
        range: Option<ByteRange>,
    ) -> Result<()> {
        writer::write_share(&self.root, storage_index, share, &data, range).await
    }

    async fn get_immutable_share_numbers(
        &self,
        storage_index: &StorageIndex,
    ) -> Result<BTreeSet<ShareNumber>> {
        reader::list_share_numbers(&self.root, storage_index).await
    }

    async fn read_immutable_shares(
        &self,
        storage_index: &StorageIndex,
        shares: &[ShareNumber],
        read_ranges: &[ByteRange],
        write_ranges: &[ByteRange],
    ) -> Result<BTreeMap<ShareNumber, Vec<Bytes>>> {
        reader::read_shares(&self.root, storage_index, shares, read_ranges, write_ranges).await
    }
}
