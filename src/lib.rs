//! Section-indexed data source for media picker grids
//!
//! Backs a scrollable picker UI that shows three logically distinct item
//! groups as one flat list: user action items, a live camera capture item,
//! and a large gallery of media assets. Each asset cell gets a thumbnail
//! fetched asynchronously; results that arrive after the cell has been
//! recycled for a different asset are discarded by an identity check, so
//! fast scrolling never paints stale pixels.
//!
//! The host supplies three collaborators: an [`AssetRepository`] over its
//! media library, a [`RenderSurface`] that dequeues recyclable cells, and
//! an [`ImageFetchBackend`] that does the decode/resize work (or the
//! bundled [`FileFetchBackend`]). Everything runs on the host's one UI
//! thread except the backend's I/O; completions are marshaled back through
//! [`PickerDataSource::drain_completions`].

pub mod assets;
pub mod picker;
pub mod thumbnail;

pub use assets::data::{Asset, AssetId, MediaKind};
pub use assets::folder::FolderAssetRepository;
pub use assets::provider::{AssetProvider, FetchResult, PickerError};
pub use assets::repository::{
    AssetCollection, AssetRepository, FetchOptions, SortOrder, StaticAssetRepository,
};
pub use picker::datasource::{
    AssetsModel, PickerDataSource, PickerItem, RenderSurface, ResolvedCell,
};
pub use picker::layout::{Coordinate, Section, SectionKind, SectionLayout};
pub use picker::registry::{CellIdentifier, CellKindRegistry};
pub use thumbnail::backend::{
    FetchCompletion, FetchError, FileFetchBackend, ImageFetchBackend, Thumbnail, ThumbnailSize,
};
pub use thumbnail::cache::{
    AssetCell, AssetCellRef, RequestId, RequestOutcome, SlotId, ThumbnailCache,
};
