//! Room template catalog
//!
//! Maps each door-opening category to an ordered list of interchangeable room
//! variants. The catalog is read-only once built and is shared between runs.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};
use thiserror::Error;

bitflags! {
    /// Sides of a room that carry a door opening
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Openings: u8 {
        const TOP = 0x01;
        const BOTTOM = 0x02;
        const LEFT = 0x04;
        const RIGHT = 0x08;
        const SIDES = Self::LEFT.bits() | Self::RIGHT.bits();
    }
}

/// Door configuration a placed room must satisfy
///
/// Declaration order is the catalog slot order; the walk's slot ranges
/// (top-opening = slots 2..=3, first descent = slots 1..=3) rely on it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[repr(u8)]
pub enum RoomCategory {
    /// Left and right openings only
    LeftRight = 0,
    /// Left, right and bottom
    LeftRightBottom = 1,
    /// Left, right and top
    LeftRightTop = 2,
    /// All four sides; the straight vertical corridor piece
    LeftRightTopBottom = 3,
}

impl RoomCategory {
    pub const ALL: [RoomCategory; 4] = [
        RoomCategory::LeftRight,
        RoomCategory::LeftRightBottom,
        RoomCategory::LeftRightTop,
        RoomCategory::LeftRightTopBottom,
    ];

    /// Categories a descent may land in (they open upwards)
    pub const TOP_OPENING: [RoomCategory; 2] =
        [RoomCategory::LeftRightTop, RoomCategory::LeftRightTopBottom];

    pub const fn slot(self) -> usize {
        self as usize
    }

    pub fn from_slot(slot: usize) -> Option<RoomCategory> {
        Self::ALL.get(slot).copied()
    }

    pub const fn openings(self) -> Openings {
        match self {
            RoomCategory::LeftRight => Openings::SIDES,
            RoomCategory::LeftRightBottom => Openings::SIDES.union(Openings::BOTTOM),
            RoomCategory::LeftRightTop => Openings::SIDES.union(Openings::TOP),
            RoomCategory::LeftRightTopBottom => Openings::all(),
        }
    }

    pub fn has(self, sides: Openings) -> bool {
        self.openings().contains(sides)
    }

    /// Map glyph for a walk room of this category
    pub const fn to_ascii(self) -> char {
        match self {
            RoomCategory::LeftRight => '-',
            RoomCategory::LeftRightBottom => 'v',
            RoomCategory::LeftRightTop => '^',
            RoomCategory::LeftRightTopBottom => '+',
        }
    }
}

/// Handle naming one concrete room asset
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomVariant {
    pub name: String,
}

impl RoomVariant {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for RoomVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Category {0} has no room variants")]
    EmptyCategory(RoomCategory),
}

/// On-disk shape of a catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogFile {
    pub categories: BTreeMap<RoomCategory, Vec<RoomVariant>>,
    /// Rooms used to back-fill cells the walk never visited
    #[serde(default)]
    pub filler: Vec<RoomVariant>,
}

/// Read-only category -> variants lookup
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomCatalog {
    slots: [Vec<RoomVariant>; 4],
    filler: Vec<RoomVariant>,
}

impl RoomCatalog {
    /// Build a catalog; missing categories are left empty
    pub fn new(
        categories: impl IntoIterator<Item = (RoomCategory, Vec<RoomVariant>)>,
        filler: Vec<RoomVariant>,
    ) -> Self {
        let mut slots: [Vec<RoomVariant>; 4] = Default::default();
        for (category, variants) in categories {
            slots[category.slot()].extend(variants);
        }
        Self { slots, filler }
    }

    /// Load the catalog from a JSON file and check every category is populated.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(content)?;
        let catalog = Self::from(file);
        catalog.validate()?;
        Ok(catalog)
    }

    /// Every category the walk can request must have at least one variant
    pub fn validate(&self) -> Result<(), CatalogError> {
        match self.first_empty_category() {
            Some(category) => Err(CatalogError::EmptyCategory(category)),
            None => Ok(()),
        }
    }

    pub fn first_empty_category(&self) -> Option<RoomCategory> {
        RoomCategory::ALL
            .into_iter()
            .find(|&category| self.variants(category).is_empty())
    }

    pub fn variants(&self, category: RoomCategory) -> &[RoomVariant] {
        &self.slots[category.slot()]
    }

    pub fn filler(&self) -> &[RoomVariant] {
        &self.filler
    }

    pub fn to_file(&self) -> CatalogFile {
        CatalogFile {
            categories: RoomCategory::ALL
                .iter()
                .filter(|c| !self.variants(**c).is_empty())
                .map(|&c| (c, self.variants(c).to_vec()))
                .collect(),
            filler: self.filler.clone(),
        }
    }
}

impl From<CatalogFile> for RoomCatalog {
    fn from(file: CatalogFile) -> Self {
        Self::new(file.categories, file.filler)
    }
}
