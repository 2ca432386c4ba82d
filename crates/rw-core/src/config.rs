//! Generator tuning
//!
//! Defaults: 1000-unit cells on the z=150 plane, one room every quarter
//! second.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cursor::{Bounds, Position};
use crate::error::ConfigError;

/// Default cell size
pub const DEFAULT_MOVE_AMOUNT: i32 = 1000;
/// Default plane height
pub const DEFAULT_Z_POS: i32 = 150;
/// Default pacing between steps when a driver rate-limits the walk
pub const DEFAULT_STEP_INTERVAL_SECS: f32 = 0.25;

/// Tunables of one generator, validated before any stepping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Distance between neighbouring cells
    pub move_amount: i32,
    /// Fixed plane every room is placed on
    pub z_pos: i32,
    /// Pacing for drivers that rate-limit; `None` steps as fast as called
    pub step_interval_secs: Option<f32>,
    pub min_y: i32,
    pub max_y: i32,
    pub max_x: i32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            move_amount: DEFAULT_MOVE_AMOUNT,
            z_pos: DEFAULT_Z_POS,
            step_interval_secs: Some(DEFAULT_STEP_INTERVAL_SECS),
            min_y: 0,
            max_y: 4 * DEFAULT_MOVE_AMOUNT,
            max_x: 3 * DEFAULT_MOVE_AMOUNT,
        }
    }
}

impl GeneratorConfig {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_y: self.min_y,
            max_y: self.max_y,
            max_x: self.max_x,
        }
    }

    pub fn step_interval(&self) -> Option<Duration> {
        self.step_interval_secs
            .and_then(|secs| Duration::try_from_secs_f32(secs).ok())
    }

    /// Check step size, bounds and pacing
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.move_amount <= 0 {
            return Err(ConfigError::NonPositiveStep(self.move_amount));
        }
        if self.min_y >= self.max_y {
            return Err(ConfigError::InvertedBounds {
                min_y: self.min_y,
                max_y: self.max_y,
            });
        }
        let span = self
            .max_y
            .checked_sub(self.min_y)
            .ok_or(ConfigError::BoundsTooWide {
                min_y: self.min_y,
                max_y: self.max_y,
            })?;
        if span % self.move_amount != 0 {
            return Err(ConfigError::MisalignedBounds {
                span,
                step: self.move_amount,
            });
        }
        if let Some(secs) = self.step_interval_secs {
            if Duration::try_from_secs_f32(secs).is_err() {
                return Err(ConfigError::InvalidStepInterval(secs));
            }
        }
        Ok(())
    }

    /// Check that a walk may start at `anchor`
    pub fn validate_anchor(&self, anchor: Position) -> Result<(), ConfigError> {
        if !self.bounds().contains_y(anchor.y) {
            return Err(ConfigError::AnchorOutOfBounds {
                anchor,
                min_y: self.min_y,
                max_y: self.max_y,
            });
        }
        if anchor.x >= self.max_x {
            return Err(ConfigError::StartBeyondMaxX {
                start_x: anchor.x,
                max_x: self.max_x,
            });
        }
        if !anchor.is_aligned(self.max_x, self.min_y, self.move_amount) {
            return Err(ConfigError::MisalignedAnchor {
                anchor,
                step: self.move_amount,
            });
        }
        Ok(())
    }
}

/// Anchor as written in a level file; z comes from the generator config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorSpec {
    pub x: i32,
    pub y: i32,
}

#[derive(Error, Debug)]
pub enum LevelFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid level file: {0}")]
    Invalid(#[from] ConfigError),
}

/// Generator config plus its candidate starting anchors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelFile {
    #[serde(flatten)]
    pub generator: GeneratorConfig,
    pub anchors: Vec<AnchorSpec>,
}

impl Default for LevelFile {
    /// One anchor per column along the top row
    fn default() -> Self {
        let generator = GeneratorConfig::default();
        let anchors = (generator.min_y..=generator.max_y)
            .step_by(generator.move_amount as usize)
            .map(|y| AnchorSpec { x: 0, y })
            .collect();
        Self { generator, anchors }
    }
}

impl LevelFile {
    /// Load and validate a level file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, LevelFileError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, LevelFileError> {
        let level: LevelFile = serde_json::from_str(content)?;
        level.generator.validate()?;
        for anchor in level.anchor_positions() {
            level.generator.validate_anchor(anchor)?;
        }
        Ok(level)
    }

    pub fn anchor_positions(&self) -> Vec<Position> {
        self.anchors
            .iter()
            .map(|a| Position::new(a.x, a.y, self.generator.z_pos))
            .collect()
    }
}
