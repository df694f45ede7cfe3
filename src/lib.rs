//! Elohim Shares - filesystem share storage for Elohim storage nodes
//!
//! Persists immutable, content-addressed shares for a storage protocol
//! server. Shares are grouped by storage index and numbered within it; the
//! protocol layer allocates, uploads, lists and reads them through
//! [`StorageBackend`].
//!
//! ## Storage Layout
//!
//! ```text
//! <root>/
//! ├── config.toml                     # Configuration (CLI)
//! └── shares/
//!     ├── incoming/                   # Staged uploads
//!     │   └── rk/rkqjx3bbmz7y/0
//!     └── rk/                         # First 2 chars of the storage index
//!         └── rkqjx3bbmz7y/
//!             ├── 0                   # Raw share bytes, no framing
//!             └── 3
//! ```
//!
//! A share becomes visible to readers only when its staged file is renamed
//! into place. Nothing here deletes shares or cleans up abandoned uploads.

pub mod allocation;
pub mod backend;
pub mod capacity;
pub mod config;
pub mod error;
pub mod paths;
pub mod reader;
pub mod types;
pub mod writer;

// Re-exports
pub use backend::{FilesystemBackend, StorageBackend};
pub use config::{BackendConfig, Config};
pub use error::{Result, StorageError};
pub use types::{
    AllocationResult, ByteRange, ShareNumber, StorageIndex, Version, Version1Parameters,
};
