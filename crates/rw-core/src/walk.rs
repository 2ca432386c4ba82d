//! Per-run walk state

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::cursor::{Bounds, Cursor, Extent, Position};
use crate::direction::Direction;
use crate::placement::Placement;

/// Everything one generation run mutates.
///
/// Created from the chosen anchor, stepped until `out_of_bounds`, then kept
/// read-only for diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalkState {
    pub cursor: Cursor,
    pub direction: Direction,
    /// Consecutive descents since the last horizontal move
    pub down_counter: u32,
    pub bounds: Bounds,
    pub extent: Extent,
    pub out_of_bounds: bool,
    pub starting_point_chosen: bool,
    /// Set when a collaborator failure aborted the run
    pub failed: bool,
    pub steps: u32,
    /// Cells that already went to the spawner
    pub visited: HashSet<Position>,
    /// Provisional room for the cell under the cursor
    pub pending: Option<Placement>,
    /// Rooms sent to the spawner, in order
    pub placements: Vec<Placement>,
}

impl WalkState {
    pub fn new(anchor: Position, step: i32, direction: Direction, bounds: Bounds) -> Self {
        Self {
            cursor: Cursor::new(anchor, step),
            direction,
            down_counter: 0,
            bounds,
            extent: Extent::at(anchor),
            out_of_bounds: false,
            starting_point_chosen: true,
            failed: false,
            steps: 0,
            visited: HashSet::new(),
            pending: None,
            placements: Vec::new(),
        }
    }

    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    /// Still accepting steps
    pub fn is_active(&self) -> bool {
        !self.out_of_bounds && !self.failed
    }

    pub fn is_visited(&self, pos: Position) -> bool {
        self.visited.contains(&pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_walk() {
        let bounds = Bounds {
            min_y: 0,
            max_y: 4000,
            max_x: 3000,
        };
        let anchor = Position::new(0, 2000, 150);
        let walk = WalkState::new(anchor, 1000, Direction::Down, bounds);
        assert_eq!(walk.position(), anchor);
        assert_eq!(walk.down_counter, 0);
        assert!(walk.is_active());
        assert!(walk.starting_point_chosen);
        assert!(!walk.is_visited(anchor));
        assert_eq!(walk.extent, Extent::at(anchor));
    }
}
