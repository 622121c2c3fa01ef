//! Cell identifier registry
//!
//! Maps item kinds to the opaque identifiers the rendering surface uses
//! to dequeue cell implementations. Registration is host-driven and must
//! happen before the data source serves its first request; the registry
//! itself is a plain lookup table.

use std::collections::HashMap;

use crate::assets::data::MediaKind;

/// Opaque identifier of a renderable cell implementation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellIdentifier(String);

impl CellIdentifier {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CellIdentifier {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CellIdentifier {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CellIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lookup table from item kind to cell identifier
///
/// Action items resolve per index with an optional catch-all entry; asset
/// items resolve per media kind with an optional catch-all entry. The
/// camera identifier is mandatory whenever the layout declares a camera
/// section.
#[derive(Debug, Clone, Default)]
pub struct CellKindRegistry {
    action_items: HashMap<usize, CellIdentifier>,
    all_action_items: Option<CellIdentifier>,
    camera_item: Option<CellIdentifier>,
    asset_items: HashMap<MediaKind, CellIdentifier>,
    all_asset_items: Option<CellIdentifier>,
}

impl CellKindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cell for the action item at one specific index.
    pub fn register_action_item(&mut self, index: usize, id: impl Into<CellIdentifier>) {
        self.action_items.insert(index, id.into());
    }

    /// Register a cell for every action item without a per-index entry.
    pub fn register_action_items(&mut self, id: impl Into<CellIdentifier>) {
        self.all_action_items = Some(id.into());
    }

    /// Register the cell for the camera item.
    pub fn register_camera_item(&mut self, id: impl Into<CellIdentifier>) {
        self.camera_item = Some(id.into());
    }

    /// Register a cell for assets of one media kind.
    pub fn register_asset_item(&mut self, kind: MediaKind, id: impl Into<CellIdentifier>) {
        self.asset_items.insert(kind, id.into());
    }

    /// Register a cell for every asset kind without a per-kind entry.
    pub fn register_asset_items(&mut self, id: impl Into<CellIdentifier>) {
        self.all_asset_items = Some(id.into());
    }

    /// Identifier for the action item at `index`: the per-index entry if
    /// one was registered, else the catch-all entry.
    pub fn action_identifier(&self, index: usize) -> Option<&CellIdentifier> {
        self.action_items
            .get(&index)
            .or(self.all_action_items.as_ref())
    }

    /// Identifier for the camera item.
    ///
    /// A missing registration is a host wiring defect and panics; there is
    /// no meaningful way to render a camera section without it.
    pub fn camera_identifier(&self) -> &CellIdentifier {
        match &self.camera_item {
            Some(id) => id,
            None => panic!("a camera cell must be registered before the data source is used"),
        }
    }

    /// Identifier for assets of `kind`: the per-kind entry if one was
    /// registered, else the catch-all entry.
    pub fn asset_identifier(&self, kind: MediaKind) -> Option<&CellIdentifier> {
        self.asset_items.get(&kind).or(self.all_asset_items.as_ref())
    }
}
