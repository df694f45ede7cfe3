//! Capacity and capability reporting
//!
//! Free space comes from `statvfs(2)` on the filesystem holding the storage
//! root. Everything else in the version descriptor is either configuration or
//! a fixed guarantee of this backend.

use crate::config::BackendConfig;
use crate::error::Result;
use crate::types::{Version, Version1Parameters};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Raw free-space figures for one filesystem
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiskStats {
    pub block_size: u64,
    pub available_blocks: u64,
}

impl DiskStats {
    /// Bytes available to unprivileged writers
    pub fn available_space(&self) -> u64 {
        self.block_size.saturating_mul(self.available_blocks)
    }
}

/// Query the filesystem containing `root`
pub async fn disk_stats(root: &Path) -> Result<DiskStats> {
    let root: PathBuf = root.to_path_buf();
    let stats = tokio::task::spawn_blocking(move || statvfs(&root))
        .await
        .map_err(io::Error::other)??;
    Ok(stats)
}

#[cfg(unix)]
#[allow(clippy::unnecessary_cast)]
fn statvfs(path: &Path) -> io::Result<DiskStats> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // SAFETY: `stat` is a plain C struct that statvfs fully initializes on
    // success, and `c_path` is a valid NUL-terminated string for the call.
    let mut stat: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(c_path.as_ptr(), &mut stat) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }

    // f_frsize is the unit f_bavail is counted in; some systems leave it 0
    let block_size = if stat.f_frsize != 0 {
        stat.f_frsize as u64
    } else {
        stat.f_bsize as u64
    };

    Ok(DiskStats {
        block_size,
        available_blocks: stat.f_bavail as u64,
    })
}

#[cfg(not(unix))]
fn statvfs(_path: &Path) -> io::Result<DiskStats> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "free space query requires statvfs",
    ))
}

/// Assemble the version descriptor from free-space figures
pub fn build_version(stats: DiskStats, config: &BackendConfig) -> Version {
    let available_space = stats.available_space();

    Version {
        application_version: config.application_version.clone(),
        parameters: Version1Parameters {
            // Never promise more than is free right now
            maximum_immutable_share_size: available_space,
            maximum_mutable_share_size: config.maximum_mutable_share_size,
            available_space,
            tolerates_immutable_read_overrun: true,
            delete_mutable_shares_with_zero_length_writev: true,
            fills_holes_with_zero_bytes: true,
            prevents_read_past_end_of_share_data: true,
            http_protocol_available: true,
        },
    }
}

/// Capacity/capability snapshot for the filesystem holding `root`
pub async fn report_version(root: &Path, config: &BackendConfig) -> Result<Version> {
    let stats = disk_stats(root).await?;

    debug!(
        root = %root.display(),
        block_size = stats.block_size,
        available_blocks = stats.available_blocks,
        "Queried free space"
    );

    Ok(build_version(stats, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_available_space_is_product() {
        let stats = DiskStats {
            block_size: 4096,
            available_blocks: 1000,
        };
        assert_eq!(stats.available_space(), 4_096_000);
    }

    #[test]
    fn test_available_space_saturates() {
        let stats = DiskStats {
            block_size: u64::MAX,
            available_blocks: 2,
        };
        assert_eq!(stats.available_space(), u64::MAX);
    }

    #[test]
    fn test_build_version_uses_config_and_fixed_flags() {
        let config = BackendConfig {
            application_version: "test-node/9".to_string(),
            maximum_mutable_share_size: 1234,
        };
        let stats = DiskStats {
            block_size: 512,
            available_blocks: 8,
        };

        let version = build_version(stats, &config);
        assert_eq!(version.application_version, "test-node/9");

        let p = version.parameters;
        assert_eq!(p.available_space, 4096);
        assert_eq!(p.maximum_immutable_share_size, 4096);
        assert_eq!(p.maximum_mutable_share_size, 1234);
        assert!(p.tolerates_immutable_read_overrun);
        assert!(p.delete_mutable_shares_with_zero_length_writev);
        assert!(p.fills_holes_with_zero_bytes);
        assert!(p.prevents_read_past_end_of_share_data);
        assert!(p.http_protocol_available);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_report_version_on_real_filesystem() {
        let temp_dir = TempDir::new().unwrap();
        let config = BackendConfig::default();

        let stats = disk_stats(temp_dir.path()).await.unwrap();
        assert!(stats.block_size > 0);

        let version = report_version(temp_dir.path(), &config).await.unwrap();
        assert_eq!(
            version.parameters.maximum_immutable_share_size,
            version.parameters.available_space
        );
        assert_eq!(
            version.parameters.maximum_mutable_share_size,
            config.maximum_mutable_share_size
        );
    }

    #[tokio::test]
    async fn test_missing_root_is_an_error() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        assert!(disk_stats(&missing).await.is_err());
    }
}
