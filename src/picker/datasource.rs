//! Data source composing layout, registry, assets, and thumbnails
//!
//! The rendering surface asks this type how many sections and items exist
//! and what to show at each coordinate. A coordinate is classified exactly
//! once into one of three item kinds; each branch then works only with its
//! own payload.

use super::layout::{Coordinate, SectionKind, SectionLayout};
use super::registry::{CellIdentifier, CellKindRegistry};
use crate::assets::provider::{AssetProvider, PickerError};
use crate::thumbnail::cache::{AssetCellRef, ThumbnailCache};

/// Classification of one coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerItem {
    /// Action item at this row of its section
    Action(usize),
    /// The live camera capture item
    Camera,
    /// Gallery asset at this row of its section
    Asset(usize),
}

/// The cell resolved for a coordinate
pub enum ResolvedCell {
    /// Unconfigured action cell reference; content population is the
    /// host's responsibility
    Action(CellIdentifier),
    /// Unconfigured camera cell reference
    Camera(CellIdentifier),
    /// Asset cell, bound to its asset with a thumbnail fetch issued
    Asset(AssetCellRef),
}

impl std::fmt::Debug for ResolvedCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolvedCell::Action(id) => f.debug_tuple("Action").field(id).finish(),
            ResolvedCell::Camera(id) => f.debug_tuple("Camera").field(id).finish(),
            ResolvedCell::Asset(cell) => {
                let bound = cell.borrow().bound_asset().cloned();
                f.debug_tuple("Asset").field(&bound).finish()
            }
        }
    }
}

/// The rendering surface's cell recycling facility
///
/// Dequeued cells are reused across coordinates, so the cell handed back
/// here may still carry a previous binding; the data source rebinds it.
pub trait RenderSurface {
    fn dequeue_asset_cell(
        &mut self,
        identifier: &CellIdentifier,
        coordinate: Coordinate,
    ) -> AssetCellRef;
}

/// Asset-backed state of the data source: the effective fetch result plus
/// thumbnail fetching for it
pub struct AssetsModel {
    pub provider: AssetProvider,
    pub thumbnails: ThumbnailCache,
}

impl AssetsModel {
    pub fn new(provider: AssetProvider, thumbnails: ThumbnailCache) -> Self {
        Self { provider, thumbnails }
    }
}

/// Data source for the picker's list view
#[derive(Default)]
pub struct PickerDataSource {
    pub layout: SectionLayout,
    pub registry: Option<CellKindRegistry>,
    pub assets: Option<AssetsModel>,
}

impl PickerDataSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number_of_sections(&self) -> usize {
        self.layout.number_of_sections()
    }

    pub fn number_of_items(&self, section: usize) -> usize {
        self.layout.number_of_items(section)
    }

    /// Classify a coordinate by its section's configured kind.
    ///
    /// Panics when the section is out of range for the configured layout;
    /// the surface asking for a section the layout never declared means
    /// the host wired layout and surface inconsistently.
    pub fn classify(&self, coordinate: Coordinate) -> PickerItem {
        match self.layout.kind(coordinate.section) {
            Some(SectionKind::Actions) => PickerItem::Action(coordinate.row),
            Some(SectionKind::Camera) => PickerItem::Camera,
            Some(SectionKind::Assets) => PickerItem::Asset(coordinate.row),
            None => panic!(
                "section {} is out of range for the configured layout",
                coordinate.section
            ),
        }
    }

    /// Resolve the cell for a coordinate.
    ///
    /// Action and camera items resolve to an identifier only; asset items
    /// are dequeued from the surface, bound, and get a thumbnail fetch.
    /// The one recoverable error is an asset row beyond the current fetch
    /// result count, which can happen when the backing collection shrank
    /// between a count query and this access; callers render nothing for
    /// that slot.
    pub fn cell_for_item(
        &mut self,
        coordinate: Coordinate,
        surface: &mut dyn RenderSurface,
    ) -> Result<ResolvedCell, PickerError> {
        let item = self.classify(coordinate);

        let registry = match &self.registry {
            Some(registry) => registry,
            None => panic!("a cell registry must be set before the data source is used"),
        };

        match item {
            PickerItem::Action(row) => {
                let id = match registry.action_identifier(row) {
                    Some(id) => id.clone(),
                    None => panic!(
                        "there is an action item at index {} but no cell is registered for it",
                        row
                    ),
                };
                Ok(ResolvedCell::Action(id))
            }

            PickerItem::Camera => Ok(ResolvedCell::Camera(registry.camera_identifier().clone())),

            PickerItem::Asset(row) => {
                let assets = match &mut self.assets {
                    Some(assets) => assets,
                    None => panic!("no assets model is set but the surface expects asset cells"),
                };

                let asset = assets.provider.asset(row)?;

                let id = match registry.asset_identifier(asset.media_kind) {
                    Some(id) => id.clone(),
                    None => panic!(
                        "there is an asset item at index {} but no cell is registered for media kind {:?}",
                        row, asset.media_kind
                    ),
                };

                let cell = surface.dequeue_asset_cell(&id, coordinate);

                // Rebind before anything else so a still-in-flight fetch
                // for this slot can never apply over the new content
                cell.borrow_mut().bind(asset.id.clone());

                match assets.provider.thumbnail_size {
                    Some(target) if !target.is_zero() => {
                        let outcome = assets.thumbnails.request(&cell, &asset, target);
                        if let Some(image) = outcome.immediate {
                            cell.borrow_mut().set_thumbnail(image);
                        }
                    }
                    // Size not known yet: show the cell without pixels
                    _ => {}
                }

                Ok(ResolvedCell::Asset(cell))
            }
        }
    }

    /// Marshal queued fetch completions onto the caller's thread.
    /// Call this from the front end's event loop; it never blocks.
    pub fn drain_completions(&mut self) -> usize {
        match &mut self.assets {
            Some(assets) => assets.thumbnails.drain_completions(),
            None => 0,
        }
    }
}
