//! Boundary and termination monitor
//!
//! Owns everything that happens around the walk rather than inside a step:
//! committing rooms exactly once per cell, back-filling the cells the walk
//! missed, and telling downstream consumers the level is complete.

use crate::config::GeneratorConfig;
use crate::cursor::Position;
use crate::error::LayoutError;
use crate::layout::Layout;
use crate::placement::{Placement, PlacementEngine, RoomSink};
use crate::rng::WalkRng;
use crate::walk::WalkState;

/// The full intended grid, used to find cells that need back-fill
pub trait PlaceholderRegistry {
    fn placeholder_cells(&self) -> Vec<Position>;
}

impl PlaceholderRegistry for Vec<Position> {
    fn placeholder_cells(&self) -> Vec<Position> {
        self.clone()
    }
}

/// Every grid cell between the top row and the bottom bound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPlaceholders {
    pub origin_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
    pub step: i32,
    pub z: i32,
}

impl GridPlaceholders {
    /// Grid spanning the configured bounds, starting at row `origin_x`
    pub fn from_config(config: &GeneratorConfig, origin_x: i32) -> Self {
        Self {
            origin_x,
            max_x: config.max_x,
            min_y: config.min_y,
            max_y: config.max_y,
            step: config.move_amount,
            z: config.z_pos,
        }
    }
}

impl PlaceholderRegistry for GridPlaceholders {
    fn placeholder_cells(&self) -> Vec<Position> {
        if self.step <= 0 {
            return Vec::new();
        }
        let step = self.step as usize;
        (self.origin_x..=self.max_x)
            .step_by(step)
            .flat_map(|x| {
                (self.min_y..=self.max_y)
                    .step_by(step)
                    .map(move |y| Position::new(x, y, self.z))
            })
            .collect()
    }
}

/// Downstream consumer that must only run on a complete level
/// (pathfinding graph builders, object and enemy spawners)
pub trait LevelReadyListener {
    fn on_level_ready(&mut self, layout: &Layout);
}

/// Tracks the walk's progress against its bounds and finishes the level
pub struct TerminationMonitor {
    placeholders: Box<dyn PlaceholderRegistry>,
    listeners: Vec<Box<dyn LevelReadyListener>>,
}

impl TerminationMonitor {
    pub fn new(placeholders: Box<dyn PlaceholderRegistry>) -> Self {
        Self {
            placeholders,
            listeners: Vec::new(),
        }
    }

    pub fn add_listener(&mut self, listener: Box<dyn LevelReadyListener>) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Send `placement` to the spawner unless its cell was already filled.
    ///
    /// Returns whether a spawn happened. A spawner failure marks the walk
    /// failed.
    pub fn commit<S: RoomSink + ?Sized>(
        &self,
        walk: &mut WalkState,
        placement: Placement,
        sink: &mut S,
    ) -> Result<bool, LayoutError> {
        let position = placement.position;
        if walk.is_visited(position) {
            return Ok(false);
        }
        if let Err(source) = sink.spawn_room(&placement) {
            walk.failed = true;
            log::error!("spawn failed at {position} ({}): {source}", walk.direction);
            return Err(LayoutError::GenerationAborted {
                position,
                direction: walk.direction,
                category: placement.category,
                source,
            });
        }
        walk.visited.insert(position);
        walk.extent.include(position);
        walk.placements.push(placement);
        Ok(true)
    }

    /// Fill every registered cell the walk never reached.
    ///
    /// Returns the number of fillers spawned.
    pub fn backfill<R: WalkRng, S: RoomSink + ?Sized>(
        &self,
        walk: &mut WalkState,
        engine: &PlacementEngine,
        sink: &mut S,
        rng: &mut R,
    ) -> Result<usize, LayoutError> {
        let mut filled = 0;
        for cell in self.placeholders.placeholder_cells() {
            if walk.is_visited(cell) {
                continue;
            }
            let filler = engine.filler(cell, walk.direction, rng)?;
            if self.commit(walk, filler, sink)? {
                filled += 1;
            }
        }
        Ok(filled)
    }

    /// Tell every listener the level is complete
    pub fn notify_ready(&mut self, layout: &Layout) {
        for listener in &mut self.listeners {
            listener.on_level_ready(layout);
        }
    }
}
