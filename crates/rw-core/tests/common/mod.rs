#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;

use rw_core::{
    GeneratorConfig, GridPlaceholders, Layout, LayoutGenerator, LayoutRng, LevelReadyListener,
    Placement, Position, RoomCatalog, RoomCategory, RoomSink, RoomVariant, SpawnError, WalkRng,
};

/// Rolls come from a closure of the requested range
pub struct FnRng<F: FnMut(u32) -> u32>(pub F);

impl<F: FnMut(u32) -> u32> WalkRng for FnRng<F> {
    fn rn2(&mut self, n: u32) -> u32 {
        if n == 0 { 0 } else { (self.0)(n).min(n - 1) }
    }
}

/// Counts `on_level_ready` calls and remembers how many rooms the layout had
pub struct ReadyCounter {
    pub calls: Rc<Cell<u32>>,
    pub rooms: Rc<Cell<usize>>,
}

impl ReadyCounter {
    pub fn new() -> (Self, Rc<Cell<u32>>, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let rooms = Rc::new(Cell::new(0));
        (
            Self {
                calls: calls.clone(),
                rooms: rooms.clone(),
            },
            calls,
            rooms,
        )
    }
}

impl LevelReadyListener for ReadyCounter {
    fn on_level_ready(&mut self, layout: &Layout) {
        self.calls.set(self.calls.get() + 1);
        self.rooms.set(layout.placements.len());
    }
}

/// Spawner that refuses every room after the first `limit`
pub struct FailingSink {
    pub limit: usize,
    pub spawned: Vec<Placement>,
}

impl RoomSink for FailingSink {
    fn spawn_room(&mut self, placement: &Placement) -> Result<(), SpawnError> {
        if self.spawned.len() >= self.limit {
            return Err(SpawnError::new(placement.variant.name.clone(), "spawner offline"));
        }
        self.spawned.push(placement.clone());
        Ok(())
    }
}

/// One variant per category, named after it, plus a filler
pub fn catalog() -> Arc<RoomCatalog> {
    Arc::new(RoomCatalog::new(
        RoomCategory::ALL.map(|c| (c, vec![RoomVariant::new(c.to_string())])),
        vec![RoomVariant::new("filler")],
    ))
}

/// `cols + 1` columns by `rows + 1` rows of 1000-unit cells
pub fn grid_config(cols: i32, rows: i32) -> GeneratorConfig {
    GeneratorConfig {
        min_y: 0,
        max_y: cols * 1000,
        max_x: rows * 1000,
        ..Default::default()
    }
}

pub fn grid_generator<S: RoomSink, R: WalkRng>(
    config: GeneratorConfig,
    anchors: Vec<Position>,
    sink: S,
    rng: R,
) -> LayoutGenerator<S, R> {
    let placeholders = GridPlaceholders::from_config(&config, 0);
    LayoutGenerator::new(
        config,
        catalog(),
        Box::new(anchors),
        Box::new(placeholders),
        sink,
        rng,
    )
    .unwrap_or_else(|err| panic!("generator should build: {err}"))
}

pub fn seeded(cols: i32, rows: i32, anchor_col: i32, seed: u64) -> LayoutGenerator<Vec<Placement>> {
    let config = grid_config(cols, rows);
    let anchor = Position::new(0, anchor_col * 1000, config.z_pos);
    grid_generator(config, vec![anchor], Vec::new(), LayoutRng::new(seed))
}
