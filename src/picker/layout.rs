//! Section/index model for the picker's flat list
//!
//! A layout is an ordered list of section descriptors. It is replaced
//! wholesale whenever the logical layout changes (for example when the
//! action-item set changes) and is immutable between replacements.

/// Kind of content a section holds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// User action items (e.g. "take photo", "pick from library")
    Actions,
    /// The live camera capture item
    Camera,
    /// The asset gallery
    Assets,
}

/// A (section, row) position in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coordinate {
    pub section: usize,
    pub row: usize,
}

impl Coordinate {
    pub fn new(section: usize, row: usize) -> Self {
        Self { section, row }
    }
}

/// One section descriptor: what it holds and how many items it has
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub kind: SectionKind,
    pub count: usize,
}

impl Section {
    pub fn new(kind: SectionKind, count: usize) -> Self {
        Self { kind, count }
    }
}

/// Ordered sequence of sections, preserved exactly as configured
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionLayout {
    sections: Vec<Section>,
}

impl SectionLayout {
    /// A layout with no sections. This is the valid default state before
    /// the host configures the picker.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    /// The canonical picker shape: action items first, then the camera
    /// section (one item when enabled, zero when not), then the gallery.
    pub fn with_configuration(
        action_items: usize,
        camera_enabled: bool,
        asset_count: usize,
    ) -> Self {
        Self::new(vec![
            Section::new(SectionKind::Actions, action_items),
            Section::new(SectionKind::Camera, if camera_enabled { 1 } else { 0 }),
            Section::new(SectionKind::Assets, asset_count),
        ])
    }

    pub fn number_of_sections(&self) -> usize {
        self.sections.len()
    }

    /// Item count for a section. Out-of-range sections report zero items.
    pub fn number_of_items(&self, section: usize) -> usize {
        match self.sections.get(section) {
            Some(section) => section.count,
            None => 0,
        }
    }

    /// Kind of a section, or `None` when the index is out of range.
    pub fn kind(&self, section: usize) -> Option<SectionKind> {
        self.sections.get(section).map(|section| section.kind)
    }

    /// A coordinate is valid iff its section exists and its row is below
    /// that section's count.
    pub fn contains(&self, coordinate: Coordinate) -> bool {
        coordinate.row < self.number_of_items(coordinate.section)
    }
}
