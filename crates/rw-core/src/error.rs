//! Error types for layout generation

use thiserror::Error;

use crate::catalog::RoomCategory;
use crate::cursor::Position;
use crate::direction::Direction;

/// Bad configuration, detected before any stepping
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Step size must be positive, got {0}")]
    NonPositiveStep(i32),

    #[error("Inverted horizontal bounds: min_y {min_y} >= max_y {max_y}")]
    InvertedBounds { min_y: i32, max_y: i32 },

    #[error("Horizontal bounds {min_y}..={max_y} are too far apart")]
    BoundsTooWide { min_y: i32, max_y: i32 },

    #[error("Horizontal span {span} is not a multiple of step {step}")]
    MisalignedBounds { span: i32, step: i32 },

    #[error("Start x {start_x} must lie below max_x {max_x}")]
    StartBeyondMaxX { start_x: i32, max_x: i32 },

    #[error("Anchor {anchor} is outside bounds y {min_y}..={max_y}")]
    AnchorOutOfBounds { anchor: Position, min_y: i32, max_y: i32 },

    #[error("Anchor {anchor} is not aligned to step {step}")]
    MisalignedAnchor { anchor: Position, step: i32 },

    #[error("Step interval must be a finite, non-negative number of seconds, got {0}")]
    InvalidStepInterval(f32),

    #[error("No starting anchors available")]
    NoAnchorsAvailable,

    #[error("Category {0} has no room variants")]
    EmptyCategory(RoomCategory),
}

/// Failure reported by the room-spawning collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to spawn room '{variant}': {reason}")]
pub struct SpawnError {
    pub variant: String,
    pub reason: String,
}

impl SpawnError {
    pub fn new(variant: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            reason: reason.into(),
        }
    }
}

/// Top-level error of every generator operation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Category {category} has no room variants (at {position}, moving {direction})")]
    EmptyCategory {
        category: RoomCategory,
        position: Position,
        direction: Direction,
    },

    #[error("Generation aborted at {position} moving {direction} (category {category:?}): {source}")]
    GenerationAborted {
        position: Position,
        direction: Direction,
        category: Option<RoomCategory>,
        #[source]
        source: SpawnError,
    },

    #[error("Generation has not been started")]
    NotStarted,

    #[error("A walk is already in progress")]
    WalkInProgress,

    #[error("No completed layout is available")]
    NoLayout,
}

impl LayoutError {
    pub fn is_config(&self) -> bool {
        matches!(self, LayoutError::Config(_) | LayoutError::EmptyCategory { .. })
    }
}
