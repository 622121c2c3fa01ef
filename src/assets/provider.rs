//! Effective fetch result and thumbnail configuration
//!
//! The provider owns the "which assets is the grid showing" question. The
//! answer is the override result when the host installed one, otherwise a
//! default policy computed once and memoized: the repository's "recently
//! added" collection when it exists, the whole library when it does not,
//! both newest-first and capped at 1000.

use std::cell::OnceCell;
use thiserror::Error;

use super::data::Asset;
use super::repository::{AssetRepository, FetchOptions};
use crate::thumbnail::backend::ThumbnailSize;

/// Recoverable data-source errors
///
/// Host wiring defects (missing registry, missing assets model, missing
/// identifier mappings) are not represented here; those panic, because they
/// indicate the picker was configured incorrectly before first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PickerError {
    /// The backing fetch result shrank between a count query and an
    /// access. Render nothing for the slot; the next layout pass heals it.
    #[error("asset index {index} is out of range (count is {count})")]
    AssetOutOfRange { index: usize, count: usize },
}

/// The effective, currently active ordered collection of assets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchResult {
    assets: Vec<Asset>,
}

impl FetchResult {
    pub fn new(assets: Vec<Asset>) -> Self {
        Self { assets }
    }

    pub fn count(&self) -> usize {
        self.assets.len()
    }

    pub fn get(&self, index: usize) -> Option<&Asset> {
        self.assets.get(index)
    }
}

/// Access to the assets the picker grid displays
pub struct AssetProvider {
    repository: Box<dyn AssetRepository>,
    /// Thumbnail target size for asset cells. `None` means the surface has
    /// not measured yet; fetches are skipped until it is set.
    pub thumbnail_size: Option<ThumbnailSize>,
    override_result: Option<FetchResult>,
    default_result: OnceCell<FetchResult>,
}

impl AssetProvider {
    pub fn new(repository: Box<dyn AssetRepository>) -> Self {
        Self {
            repository,
            thumbnail_size: None,
            override_result: None,
            default_result: OnceCell::new(),
        }
    }

    /// Number of assets in the effective fetch result.
    pub fn count(&self) -> usize {
        self.effective().count()
    }

    /// The asset at `index` in the effective fetch result, resolved
    /// freshly on each call.
    pub fn asset(&self, index: usize) -> Result<Asset, PickerError> {
        let result = self.effective();
        match result.get(index) {
            Some(asset) => Ok(asset.clone()),
            None => Err(PickerError::AssetOutOfRange {
                index,
                count: result.count(),
            }),
        }
    }

    /// Replace the effective fetch result with one matching the given
    /// criteria.
    pub fn set_override(&mut self, options: &FetchOptions) {
        let assets = self.repository.fetch_assets(options);
        self.override_result = Some(FetchResult::new(assets));
    }

    /// Drop the override and revert to the default policy.
    pub fn clear_override(&mut self) {
        self.override_result = None;
    }

    /// Drop the memoized default result so the next access recomputes it.
    /// The default is otherwise cached for the provider's lifetime, since
    /// the collection lookup is expensive.
    pub fn invalidate_default(&mut self) {
        self.default_result = OnceCell::new();
    }

    fn effective(&self) -> &FetchResult {
        match &self.override_result {
            Some(result) => result,
            None => self.default_result(),
        }
    }

    fn default_result(&self) -> &FetchResult {
        self.default_result.get_or_init(|| {
            let options = FetchOptions::default_policy();
            let assets = match self.repository.recently_added() {
                Some(collection) => self.repository.fetch_assets_in(&collection, &options),
                None => self.repository.fetch_assets(&options),
            };

            println!("📁 Default fetch result computed: {} assets", assets.len());
            FetchResult::new(assets)
        })
    }
}
