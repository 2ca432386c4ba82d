//! rw-core: random-walk room layout generation
//!
//! Builds a dungeon level as a grid of prefab rooms. A cursor starts at a
//! random anchor on the top row, wanders sideways and downwards one cell per
//! step, and places a room in every cell it visits whose door openings
//! connect to its neighbours. Once the walk falls out of the bottom bound the
//! remaining cells are back-filled and listeners are told the level is ready.
//!
//! The crate does no I/O beyond loading JSON configuration and catalogs.
//! Room spawning, anchors and the full cell grid come from collaborators
//! injected into [`LayoutGenerator`].

pub mod catalog;
pub mod config;
pub mod cursor;
pub mod direction;
pub mod error;
pub mod generator;
pub mod layout;
pub mod monitor;
pub mod placement;
pub mod rng;
pub mod start;
pub mod walk;

pub use catalog::{CatalogError, CatalogFile, Openings, RoomCatalog, RoomCategory, RoomVariant};
pub use config::{AnchorSpec, GeneratorConfig, LevelFile, LevelFileError};
pub use cursor::{Bounds, Cursor, Extent, Position};
pub use direction::{Direction, Heading, Transition};
pub use error::{ConfigError, LayoutError, SpawnError};
pub use generator::{GeneratorCommand, GeneratorPhase, LayoutGenerator, StepOutcome};
pub use layout::Layout;
pub use monitor::{GridPlaceholders, LevelReadyListener, PlaceholderRegistry, TerminationMonitor};
pub use placement::{CategoryRule, Placement, PlacementEngine, PlacementKind, RoomSink, Rotation};
pub use rng::{LayoutRng, WalkRng};
pub use start::{AnchorSource, choose_anchor};
pub use walk::WalkState;
