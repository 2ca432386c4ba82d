//! Finished layouts
//!
//! A [`Layout`] is the read-only record of one completed run: every room sent
//! to the spawner in emission order, plus what is needed to replay or draw it.

use serde::{Deserialize, Serialize};

use crate::catalog::Openings;
use crate::cursor::{Bounds, Extent, Position};
use crate::placement::{Placement, PlacementKind};
use crate::walk::WalkState;

/// Result of a completed walk and its back-fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Seed of the RNG that drove the run, when it had one
    pub seed: Option<u64>,
    pub step: i32,
    pub bounds: Bounds,
    pub extent: Extent,
    /// Steps taken, including forced turns and the terminating step
    pub steps: u32,
    pub backfilled: usize,
    pub placements: Vec<Placement>,
}

impl Layout {
    pub fn from_walk(walk: &WalkState, seed: Option<u64>, backfilled: usize) -> Self {
        Self {
            seed,
            step: walk.cursor.step(),
            bounds: walk.bounds,
            extent: walk.extent,
            steps: walk.steps,
            backfilled,
            placements: walk.placements.clone(),
        }
    }

    /// Where the walk began
    pub fn anchor(&self) -> Option<Position> {
        self.placements
            .iter()
            .find(|p| p.kind == PlacementKind::Start)
            .map(|p| p.position)
    }

    pub fn placement_at(&self, pos: Position) -> Option<&Placement> {
        self.placements.iter().find(|p| p.position == pos)
    }

    /// Rooms on the walked path, in the order they were visited
    pub fn path(&self) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(|p| p.kind != PlacementKind::Filler)
    }

    pub fn fillers(&self) -> impl Iterator<Item = &Placement> {
        self.placements
            .iter()
            .filter(|p| p.kind == PlacementKind::Filler)
    }

    /// Consecutive path cells that are not adjacent or whose facing
    /// openings do not match. Empty for a well-formed layout.
    pub fn broken_links(&self) -> Vec<(Position, Position)> {
        let path: Vec<&Placement> = self.path().collect();
        path.windows(2)
            .filter(|pair| !self.linked(pair[0], pair[1]))
            .map(|pair| (pair[0].position, pair[1].position))
            .collect()
    }

    fn linked(&self, from: &Placement, to: &Placement) -> bool {
        let (a, b) = (from.position, to.position);
        let step = i64::from(self.step);
        let dx = i64::from(b.x) - i64::from(a.x);
        let dy = i64::from(b.y) - i64::from(a.y);
        let (leave, enter) = if dy == 0 && dx == step {
            (Openings::BOTTOM, Openings::TOP)
        } else if dx == 0 && dy == -step {
            (Openings::RIGHT, Openings::LEFT)
        } else if dx == 0 && dy == step {
            (Openings::LEFT, Openings::RIGHT)
        } else {
            return false;
        };
        let opens = |p: &Placement, side| p.openings().is_some_and(|o| o.contains(side));
        opens(from, leave) && opens(to, enter)
    }

    /// Draw the layout one character per cell.
    ///
    /// Rows run down the X axis; columns run from `max_y` on the left to
    /// `min_y` on the right, so "right" reads as right. `@` marks the start
    /// room, `.` a filler and blank a cell nothing was placed in.
    pub fn render_ascii(&self) -> String {
        let mut out = String::new();
        if self.step <= 0 {
            return out;
        }
        let step = self.step as usize;
        let z = self.anchor().map_or(0, |a| a.z);
        for x in (self.extent.min_x..=self.extent.max_x).step_by(step) {
            let mut y = self.extent.max_y;
            while y >= self.extent.min_y {
                let glyph = match self.placement_at(Position::new(x, y, z)) {
                    Some(p) if p.kind == PlacementKind::Start => '@',
                    Some(p) if p.kind == PlacementKind::Filler => '.',
                    Some(p) => p.category.map_or('?', |c| c.to_ascii()),
                    None => ' ',
                };
                out.push(glyph);
                match y.checked_sub(self.step) {
                    Some(next) => y = next,
                    None => break,
                }
            }
            out.push('\n');
        }
        out
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{RoomCategory, RoomVariant};
    use crate::placement::Rotation;

    fn room(x: i32, y: i32, category: Option<RoomCategory>, kind: PlacementKind) -> Placement {
        Placement {
            variant: RoomVariant::new("room"),
            category,
            position: Position::new(x, y, 150),
            rotation: Rotation::ZERO,
            kind,
        }
    }

    fn layout(placements: Vec<Placement>) -> Layout {
        let mut extent = Extent::at(placements[0].position);
        for p in &placements {
            extent.include(p.position);
        }
        Layout {
            seed: Some(1),
            step: 1000,
            bounds: Bounds {
                min_y: 0,
                max_y: 1000,
                max_x: 1000,
            },
            extent,
            steps: 3,
            backfilled: 1,
            placements,
        }
    }

    fn sample() -> Layout {
        layout(vec![
            room(0, 1000, Some(RoomCategory::LeftRight), PlacementKind::Start),
            room(0, 0, Some(RoomCategory::LeftRightBottom), PlacementKind::Walk),
            room(1000, 0, Some(RoomCategory::LeftRightTop), PlacementKind::Walk),
            room(1000, 1000, None, PlacementKind::Filler),
        ])
    }

    #[test]
    fn test_path_and_fillers() {
        let layout = sample();
        assert_eq!(layout.path().count(), 3);
        assert_eq!(layout.fillers().count(), 1);
        assert_eq!(layout.anchor(), Some(Position::new(0, 1000, 150)));
        assert!(layout.broken_links().is_empty());
    }

    #[test]
    fn test_missing_bottom_is_a_broken_link() {
        let layout = layout(vec![
            room(0, 0, Some(RoomCategory::LeftRight), PlacementKind::Start),
            room(1000, 0, Some(RoomCategory::LeftRightTop), PlacementKind::Walk),
        ]);
        assert_eq!(
            layout.broken_links(),
            vec![(Position::new(0, 0, 150), Position::new(1000, 0, 150))]
        );
    }

    #[test]
    fn test_jump_is_a_broken_link() {
        let layout = layout(vec![
            room(0, 0, Some(RoomCategory::LeftRightTopBottom), PlacementKind::Start),
            room(2000, 0, Some(RoomCategory::LeftRightTopBottom), PlacementKind::Walk),
        ]);
        assert_eq!(layout.broken_links().len(), 1);
    }

    #[test]
    fn test_render_ascii() {
        assert_eq!(sample().render_ascii(), "@v\n.^\n");
    }

    #[test]
    fn test_json_roundtrip() {
        let layout = sample();
        let json = layout.to_json().unwrap();
        let back: Layout = serde_json::from_str(&json).unwrap();
        assert_eq!(back, layout);
    }
}
