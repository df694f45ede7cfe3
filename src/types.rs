//! Core share storage types
//!
//! These are the values exchanged with the protocol layer. Storage indices are
//! opaque here; their validity as a path component is checked when a path is
//! derived (see [`crate::paths`]).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse key grouping all shares of one stored object
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageIndex(String);

impl StorageIndex {
    pub fn new(index: impl Into<String>) -> Self {
        Self(index.into())
    }

    /// Canonical text rendering used for on-disk paths
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StorageIndex {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for StorageIndex {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Ordinal of one share within a storage index
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ShareNumber(pub u64);

impl fmt::Display for ShareNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ShareNumber {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

/// Error returned when a directory entry name is not a share number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseShareNumberError(String);

impl fmt::Display for ParseShareNumberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not a share number: {:?}", self.0)
    }
}

impl std::error::Error for ParseShareNumberError {}

impl FromStr for ShareNumber {
    type Err = ParseShareNumberError;

    /// Only plain ASCII decimal digits; `u64::from_str` alone would also take a leading `+`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ParseShareNumberError(s.to_string()));
        }
        s.parse::<u64>()
            .map(ShareNumber)
            .map_err(|_| ParseShareNumberError(s.to_string()))
    }
}

/// Byte range carried by the protocol interface
///
/// Only whole-share transfers are supported; see [`ByteRange::covers_whole`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub offset: u64,
    pub length: u64,
}

impl ByteRange {
    pub fn new(offset: u64, length: u64) -> Self {
        Self { offset, length }
    }

    /// Whether this range denotes exactly a share of `share_len` bytes
    pub fn covers_whole(&self, share_len: u64) -> bool {
        self.offset == 0 && self.length == share_len
    }
}

/// Outcome of allocating a storage index, both lists in request order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct AllocationResult {
    pub already_have: Vec<ShareNumber>,
    pub allocated: Vec<ShareNumber>,
}

/// Node version and capability descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Version {
    pub application_version: String,
    pub parameters: Version1Parameters,
}

/// Capacity figures plus the fixed behavioral guarantees of this backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Version1Parameters {
    pub maximum_immutable_share_size: u64,
    pub maximum_mutable_share_size: u64,
    pub available_space: u64,
    pub tolerates_immutable_read_overrun: bool,
    pub delete_mutable_shares_with_zero_length_writev: bool,
    pub fills_holes_with_zero_bytes: bool,
    pub prevents_read_past_end_of_share_data: bool,
    pub http_protocol_available: bool,
}
