//! Asset repository seam
//!
//! The picker reads the host's media library through [`AssetRepository`].
//! Hosts plug in whatever backs their library (a catalog database, a
//! platform photo library, a folder tree); [`StaticAssetRepository`] is
//! the in-memory reference implementation.

use serde::{Deserialize, Serialize};

use super::data::{Asset, AssetId, MediaKind};

/// Sort order applied to a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    CreationDateDescending,
    CreationDateAscending,
}

/// Filter and sort criteria for an asset fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOptions {
    /// Only include assets of this media kind (`None` = all kinds)
    pub media_kind: Option<MediaKind>,
    pub sort: SortOrder,
    /// Maximum number of assets in the result (`None` = unbounded)
    pub limit: Option<usize>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            media_kind: None,
            sort: SortOrder::CreationDateDescending,
            limit: None,
        }
    }
}

/// Cap applied by the default fetch policy
const DEFAULT_FETCH_LIMIT: usize = 1000;

impl FetchOptions {
    /// The default picker policy: newest first, capped at 1000 assets.
    pub fn default_policy() -> Self {
        Self {
            media_kind: None,
            sort: SortOrder::CreationDateDescending,
            limit: Some(DEFAULT_FETCH_LIMIT),
        }
    }

    /// Apply filter, sort, and cap to an asset list.
    pub fn apply(&self, mut assets: Vec<Asset>) -> Vec<Asset> {
        if let Some(kind) = self.media_kind {
            assets.retain(|asset| asset.media_kind == kind);
        }

        match self.sort {
            SortOrder::CreationDateDescending => {
                assets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            SortOrder::CreationDateAscending => {
                assets.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            }
        }

        if let Some(limit) = self.limit {
            assets.truncate(limit);
        }

        assets
    }

    /// Convert to JSON string so hosts can persist the user's last criteria
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A named collection of assets (a "smart album")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCollection {
    pub id: String,
    pub title: String,
}

/// Read access to the host's asset library
pub trait AssetRepository {
    /// Fetch assets matching `options` across the whole library.
    fn fetch_assets(&self, options: &FetchOptions) -> Vec<Asset>;

    /// Look up the special "recently added" collection, if the library
    /// has one.
    fn recently_added(&self) -> Option<AssetCollection>;

    /// Fetch assets scoped to a collection.
    fn fetch_assets_in(&self, collection: &AssetCollection, options: &FetchOptions) -> Vec<Asset>;
}

const RECENTLY_ADDED_ID: &str = "recently-added";

/// In-memory repository over a fixed asset list
pub struct StaticAssetRepository {
    assets: Vec<Asset>,
    recently_added: Option<Vec<AssetId>>,
}

impl StaticAssetRepository {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self {
            assets,
            recently_added: None,
        }
    }

    /// Mark a subset of the assets as the "recently added" collection.
    pub fn set_recently_added(&mut self, ids: Vec<AssetId>) {
        self.recently_added = Some(ids);
    }
}

impl AssetRepository for StaticAssetRepository {
    fn fetch_assets(&self, options: &FetchOptions) -> Vec<Asset> {
        options.apply(self.assets.clone())
    }

    fn recently_added(&self) -> Option<AssetCollection> {
        self.recently_added.as_ref().map(|_| AssetCollection {
            id: RECENTLY_ADDED_ID.to_string(),
            title: "Recently Added".to_string(),
        })
    }

    fn fetch_assets_in(&self, collection: &AssetCollection, options: &FetchOptions) -> Vec<Asset> {
        if collection.id != RECENTLY_ADDED_ID {
            return Vec::new();
        }

        let ids = match &self.recently_added {
            Some(ids) => ids,
            None => return Vec::new(),
        };

        let members: Vec<Asset> = self
            .assets
            .iter()
            .filter(|asset| ids.contains(&asset.id))
            .cloned()
            .collect();

        options.apply(members)
    }
}
