//! Placement engine
//!
//! Turns a category rule into a concrete placement request and hands it to
//! the room-spawning collaborator.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::catalog::{Openings, RoomCatalog, RoomCategory, RoomVariant};
use crate::cursor::Position;
use crate::direction::Direction;
use crate::error::{LayoutError, SpawnError};
use crate::rng::WalkRng;

/// Rotation handed to the spawner; the walk always uses [`Rotation::ZERO`]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotation {
    pub const ZERO: Rotation = Rotation {
        pitch: 0.0,
        yaw: 0.0,
        roll: 0.0,
    };
}

/// Why a room was placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum PlacementKind {
    /// Room at the chosen anchor
    Start,
    /// Room on the walk's path
    Walk,
    /// Back-fill for a cell the walk never visited
    Filler,
}

/// One request to the room-spawning collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub variant: RoomVariant,
    /// `None` when the room came from the catalog's filler list
    pub category: Option<RoomCategory>,
    pub position: Position,
    pub rotation: Rotation,
    pub kind: PlacementKind,
}

impl Placement {
    /// Openings of the placed room, if it belongs to a category
    pub fn openings(&self) -> Option<Openings> {
        self.category.map(RoomCategory::openings)
    }
}

/// Realizes placements; failures abort the run
pub trait RoomSink {
    fn spawn_room(&mut self, placement: &Placement) -> Result<(), SpawnError>;
}

/// Records every placement in order
impl RoomSink for Vec<Placement> {
    fn spawn_room(&mut self, placement: &Placement) -> Result<(), SpawnError> {
        self.push(placement.clone());
        Ok(())
    }
}

impl<S: RoomSink + ?Sized> RoomSink for &mut S {
    fn spawn_room(&mut self, placement: &Placement) -> Result<(), SpawnError> {
        (**self).spawn_room(placement)
    }
}

/// How a category is drawn for a placement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryRule {
    /// Starting room: any category
    Any,
    /// Cell entered sideways: any category opening left and right
    Horizontal,
    /// Cell entered from above: slots 2..=3
    Descent,
    /// Cell being left downwards, after the down counter was bumped
    Departure { down_counter: u32 },
}

impl CategoryRule {
    pub fn pick<R: WalkRng>(self, rng: &mut R) -> RoomCategory {
        match self {
            CategoryRule::Any => {
                RoomCategory::ALL[rng.rn2(RoomCategory::ALL.len() as u32) as usize]
            }
            CategoryRule::Horizontal => {
                let sideways: Vec<RoomCategory> = RoomCategory::ALL
                    .into_iter()
                    .filter(|c| c.has(Openings::SIDES))
                    .collect();
                sideways[rng.rn2(sideways.len() as u32) as usize]
            }
            CategoryRule::Descent => {
                let top = RoomCategory::TOP_OPENING;
                top[rng.rn2(top.len() as u32) as usize]
            }
            CategoryRule::Departure { down_counter } if down_counter >= 2 => {
                log::trace!("down counter {down_counter}: forcing vertical corridor");
                RoomCategory::LeftRightTopBottom
            }
            CategoryRule::Departure { .. } => {
                // Slot 2 (top only) would cut the way down; fold it onto slot 1
                let slot = match rng.range_inclusive(1, 3) {
                    2 => 1,
                    slot => slot,
                };
                RoomCategory::from_slot(slot as usize).unwrap_or(RoomCategory::LeftRightBottom)
            }
        }
    }
}

/// Chooses categories and variants against a shared catalog
#[derive(Debug, Clone)]
pub struct PlacementEngine {
    catalog: Arc<RoomCatalog>,
}

impl PlacementEngine {
    pub fn new(catalog: Arc<RoomCatalog>) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &RoomCatalog {
        &self.catalog
    }

    /// Draw a category by `rule`, then one of its variants uniformly
    pub fn room<R: WalkRng>(
        &self,
        rule: CategoryRule,
        position: Position,
        direction: Direction,
        kind: PlacementKind,
        rng: &mut R,
    ) -> Result<Placement, LayoutError> {
        let category = rule.pick(rng);
        let variant = self.variant(category, position, direction, rng)?;
        Ok(Placement {
            variant,
            category: Some(category),
            position,
            rotation: Rotation::ZERO,
            kind,
        })
    }

    /// Default room for a cell the walk never reached
    pub fn filler<R: WalkRng>(
        &self,
        position: Position,
        direction: Direction,
        rng: &mut R,
    ) -> Result<Placement, LayoutError> {
        if let Some(variant) = rng.choose(self.catalog.filler()) {
            return Ok(Placement {
                variant: variant.clone(),
                category: None,
                position,
                rotation: Rotation::ZERO,
                kind: PlacementKind::Filler,
            });
        }
        self.room(CategoryRule::Any, position, direction, PlacementKind::Filler, rng)
    }

    fn variant<R: WalkRng>(
        &self,
        category: RoomCategory,
        position: Position,
        direction: Direction,
        rng: &mut R,
    ) -> Result<RoomVariant, LayoutError> {
        rng.choose(self.catalog.variants(category))
            .cloned()
            .ok_or(LayoutError::EmptyCategory {
                category,
                position,
                direction,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    /// Replays `rolls`, clamped to the requested range
    struct Script(Vec<u32>);

    impl WalkRng for Script {
        fn rn2(&mut self, n: u32) -> u32 {
            let roll = if self.0.is_empty() { 0 } else { self.0.remove(0) };
            roll.min(n.saturating_sub(1))
        }
    }

    fn catalog() -> Arc<RoomCatalog> {
        Arc::new(RoomCatalog::new(
            RoomCategory::iter().map(|c| {
                (
                    c,
                    vec![RoomVariant::new(format!("{c}-0")), RoomVariant::new(format!("{c}-1"))],
                )
            }),
            Vec::new(),
        ))
    }

    #[test]
    fn test_departure_forces_corridor_after_two_descents() {
        for down_counter in 2..6 {
            for roll in 0..3 {
                let rule = CategoryRule::Departure { down_counter };
                assert_eq!(rule.pick(&mut Script(vec![roll])), RoomCategory::LeftRightTopBottom);
            }
        }
    }

    #[test]
    fn test_first_departure_folds_top_only_slot() {
        let rule = CategoryRule::Departure { down_counter: 1 };
        assert_eq!(rule.pick(&mut Script(vec![0])), RoomCategory::LeftRightBottom);
        assert_eq!(rule.pick(&mut Script(vec![1])), RoomCategory::LeftRightBottom);
        assert_eq!(rule.pick(&mut Script(vec![2])), RoomCategory::LeftRightTopBottom);
    }

    #[test]
    fn test_departure_always_opens_down() {
        for down_counter in 1..4 {
            for roll in 0..3 {
                let rule = CategoryRule::Departure { down_counter };
                assert!(rule.pick(&mut Script(vec![roll])).has(Openings::BOTTOM));
            }
        }
    }

    #[test]
    fn test_descent_always_opens_up() {
        assert_eq!(CategoryRule::Descent.pick(&mut Script(vec![0])), RoomCategory::LeftRightTop);
        assert_eq!(
            CategoryRule::Descent.pick(&mut Script(vec![1])),
            RoomCategory::LeftRightTopBottom
        );
    }

    #[test]
    fn test_horizontal_and_any_cover_all_slots() {
        for (slot, expected) in RoomCategory::iter().enumerate() {
            let roll = slot as u32;
            assert_eq!(CategoryRule::Horizontal.pick(&mut Script(vec![roll])), expected);
            assert_eq!(CategoryRule::Any.pick(&mut Script(vec![roll])), expected);
        }
    }

    #[test]
    fn test_room_picks_variant_of_category() {
        let engine = PlacementEngine::new(catalog());
        let pos = Position::new(0, 1000, 150);
        let placement = engine
            .room(
                CategoryRule::Descent,
                pos,
                Direction::Down,
                PlacementKind::Walk,
                &mut Script(vec![1, 1]),
            )
            .unwrap();
        assert_eq!(placement.category, Some(RoomCategory::LeftRightTopBottom));
        assert_eq!(placement.variant.name, "LeftRightTopBottom-1");
        assert_eq!(placement.position, pos);
        assert_eq!(placement.rotation, Rotation::ZERO);
    }

    #[test]
    fn test_empty_category_is_reported_with_context() {
        let engine = PlacementEngine::new(Arc::new(RoomCatalog::new(
            [(RoomCategory::LeftRight, vec![RoomVariant::new("lr")])],
            Vec::new(),
        )));
        let pos = Position::new(1000, 0, 150);
        let err = engine
            .room(
                CategoryRule::Descent,
                pos,
                Direction::Down,
                PlacementKind::Walk,
                &mut Script(vec![0]),
            )
            .unwrap_err();
        assert_eq!(
            err,
            LayoutError::EmptyCategory {
                category: RoomCategory::LeftRightTop,
                position: pos,
                direction: Direction::Down,
            }
        );
    }

    #[test]
    fn test_filler_prefers_filler_list() {
        let engine = PlacementEngine::new(Arc::new(RoomCatalog::new(
            RoomCategory::iter().map(|c| (c, vec![RoomVariant::new(c.to_string())])),
            vec![RoomVariant::new("rock")],
        )));
        let placement = engine
            .filler(Position::default(), Direction::Down, &mut Script(vec![]))
            .unwrap();
        assert_eq!(placement.variant.name, "rock");
        assert_eq!(placement.category, None);
        assert_eq!(placement.kind, PlacementKind::Filler);
    }

    #[test]
    fn test_filler_falls_back_to_any_category() {
        let engine = PlacementEngine::new(catalog());
        let placement = engine
            .filler(Position::default(), Direction::Down, &mut Script(vec![3, 0]))
            .unwrap();
        assert_eq!(placement.category, Some(RoomCategory::LeftRightTopBottom));
        assert_eq!(placement.kind, PlacementKind::Filler);
    }

    #[test]
    fn test_vec_sink_records() {
        let mut sink: Vec<Placement> = Vec::new();
        let placement = PlacementEngine::new(catalog())
            .room(
                CategoryRule::Any,
                Position::default(),
                Direction::Down,
                PlacementKind::Start,
                &mut Script(vec![]),
            )
            .unwrap();
        sink.spawn_room(&placement).unwrap();
        assert_eq!(sink, vec![placement]);
    }
}
