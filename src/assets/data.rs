//! Shared data structures for the asset gallery
//!
//! These structs represent the data model that flows between
//! the asset repository and the picker layer. The picker never caches
//! assets itself; it resolves them freshly from the effective fetch
//! result on each access.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable, opaque identity of a media asset
///
/// The repository decides what the string means (a database key, a file
/// path, a library-local identifier). The picker only ever compares ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Media kind of an asset, used to pick the cell implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Photo,
    Video,
    /// Audio and anything else the repository recognizes but the grid
    /// renders with a generic cell
    Other,
}

/// Represents a single asset in the gallery
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    /// Stable identity assigned by the repository
    pub id: AssetId,
    /// Media kind, used for cell identifier lookup
    pub media_kind: MediaKind,
    /// Creation time reported by the repository (drives the default sort)
    pub created_at: DateTime<Utc>,
}
