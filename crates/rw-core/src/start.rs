//! Starting point selection

use crate::config::GeneratorConfig;
use crate::cursor::Position;
use crate::error::{ConfigError, LayoutError};
use crate::rng::WalkRng;

/// Supplies candidate starting anchors for a walk
pub trait AnchorSource {
    fn anchors(&self) -> Vec<Position>;
}

impl AnchorSource for Vec<Position> {
    fn anchors(&self) -> Vec<Position> {
        self.clone()
    }
}

impl AnchorSource for [Position] {
    fn anchors(&self) -> Vec<Position> {
        self.to_vec()
    }
}

/// Pick one anchor uniformly and check it against the configured bounds.
///
/// The anchor is moved onto the configured plane.
pub fn choose_anchor<R: WalkRng>(
    source: &dyn AnchorSource,
    config: &GeneratorConfig,
    rng: &mut R,
) -> Result<Position, LayoutError> {
    let anchors = source.anchors();
    let anchor = rng
        .choose(&anchors)
        .copied()
        .ok_or(ConfigError::NoAnchorsAvailable)?
        .on_plane(config.z_pos);
    config.validate_anchor(anchor)?;
    Ok(anchor)
}
