//! Grid cursor and step arithmetic
//!
//! Axis convention: X grows downwards (each descent adds one step), Y is the
//! horizontal axis. Moving right decreases Y towards `min_y`, moving left
//! increases Y towards `max_y`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::direction::Heading;

/// A grid-aligned cell position on the fixed generation plane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Same cell projected onto another plane
    pub const fn on_plane(self, z: i32) -> Self {
        Self { z, ..self }
    }

    /// Check that both grid coordinates are multiples of `step` away from `origin`
    pub fn is_aligned(&self, origin_x: i32, origin_y: i32, step: i32) -> bool {
        let step = i64::from(step);
        let offset = |v: i32, origin: i32| (i64::from(v) - i64::from(origin)) % step == 0;
        step > 0 && offset(self.x, origin_x) && offset(self.y, origin_y)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Configured walk limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    /// Right edge (smallest Y the cursor may reach)
    pub min_y: i32,
    /// Left edge (largest Y the cursor may reach)
    pub max_y: i32,
    /// Bottom edge; a descent starting here ends the walk
    pub max_x: i32,
}

impl Bounds {
    pub fn contains_y(&self, y: i32) -> bool {
        (self.min_y..=self.max_y).contains(&y)
    }
}

/// Observed min/max of the cells a walk has visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Extent {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl Extent {
    /// Extent covering a single cell
    pub fn at(pos: Position) -> Self {
        Self {
            min_x: pos.x,
            max_x: pos.x,
            min_y: pos.y,
            max_y: pos.y,
        }
    }

    /// Grow to include `pos`
    pub fn include(&mut self, pos: Position) {
        self.min_x = self.min_x.min(pos.x);
        self.max_x = self.max_x.max(pos.x);
        self.min_y = self.min_y.min(pos.y);
        self.max_y = self.max_y.max(pos.y);
    }
}

/// The walk's current cell plus the fixed step it moves by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    position: Position,
    step: i32,
}

impl Cursor {
    pub fn new(position: Position, step: i32) -> Self {
        Self { position, step }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn step(&self) -> i32 {
        self.step
    }

    /// Whether a move along `heading` stays inside `bounds`
    pub fn can_advance(&self, heading: Heading, bounds: &Bounds) -> bool {
        match heading {
            Heading::Right => self.position.y > bounds.min_y,
            Heading::Left => self.position.y < bounds.max_y,
            Heading::Down => self.position.x < bounds.max_x,
        }
    }

    /// Move one step along `heading`, clamped to `bounds`, and return the new cell
    pub fn advance(&mut self, heading: Heading, bounds: &Bounds) -> Position {
        let pos = &mut self.position;
        match heading {
            Heading::Right => pos.y = pos.y.saturating_sub(self.step).max(bounds.min_y),
            Heading::Left => pos.y = pos.y.saturating_add(self.step).min(bounds.max_y),
            Heading::Down => pos.x = pos.x.saturating_add(self.step).min(bounds.max_x),
        }
        *pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: Bounds = Bounds {
        min_y: 0,
        max_y: 4000,
        max_x: 3000,
    };

    #[test]
    fn test_right_decreases_y() {
        let mut cursor = Cursor::new(Position::new(0, 2000, 150), 1000);
        assert_eq!(cursor.advance(Heading::Right, &BOUNDS), Position::new(0, 1000, 150));
    }

    #[test]
    fn test_left_increases_y() {
        let mut cursor = Cursor::new(Position::new(0, 2000, 150), 1000);
        assert_eq!(cursor.advance(Heading::Left, &BOUNDS), Position::new(0, 3000, 150));
    }

    #[test]
    fn test_down_increases_x() {
        let mut cursor = Cursor::new(Position::new(0, 2000, 150), 1000);
        assert_eq!(cursor.advance(Heading::Down, &BOUNDS), Position::new(1000, 2000, 150));
    }

    #[test]
    fn test_advance_clamps_at_edges() {
        let mut cursor = Cursor::new(Position::new(2500, 500, 0), 1000);
        assert_eq!(cursor.advance(Heading::Right, &BOUNDS).y, 0);
        assert_eq!(cursor.advance(Heading::Down, &BOUNDS).x, 3000);
    }

    #[test]
    fn test_can_advance_at_edges() {
        let cursor = Cursor::new(Position::new(3000, 0, 0), 1000);
        assert!(!cursor.can_advance(Heading::Right, &BOUNDS));
        assert!(cursor.can_advance(Heading::Left, &BOUNDS));
        assert!(!cursor.can_advance(Heading::Down, &BOUNDS));
    }

    #[test]
    fn test_extent_include() {
        let mut extent = Extent::at(Position::new(0, 2000, 0));
        extent.include(Position::new(1000, 3000, 0));
        extent.include(Position::new(1000, 1000, 0));
        assert_eq!(
            extent,
            Extent {
                min_x: 0,
                max_x: 1000,
                min_y: 1000,
                max_y: 3000
            }
        );
    }

    #[test]
    fn test_alignment() {
        assert!(Position::new(2000, 3000, 150).is_aligned(0, 0, 1000));
        assert!(!Position::new(2000, 3500, 150).is_aligned(0, 0, 1000));
        assert!(!Position::new(0, 0, 0).is_aligned(0, 0, 0));
        assert!(Position::new(i32::MIN, 0, 0).is_aligned(i32::MAX, 0, 1));
        assert!(!Position::new(i32::MIN, 0, 0).is_aligned(i32::MAX, 0, 2));
    }

    #[test]
    fn test_advance_saturates_near_i32_limits() {
        let bounds = Bounds {
            min_y: i32::MIN,
            max_y: i32::MAX,
            max_x: i32::MAX,
        };
        let mut cursor = Cursor::new(Position::new(i32::MAX - 10, i32::MIN + 10, 0), 1000);
        assert_eq!(cursor.advance(Heading::Right, &bounds).y, i32::MIN);
        assert_eq!(cursor.advance(Heading::Down, &bounds).x, i32::MAX);
    }
}
