//! Step-driven layout generator
//!
//! Ties the pieces together: picks a start, asks the direction selector for
//! each move, places rooms through the placement engine and hands the
//! finished walk to the termination monitor. A driver calls [`step`] in a
//! loop (optionally rate limited); nothing in here sleeps.
//!
//! [`step`]: LayoutGenerator::step

use std::collections::VecDeque;
use std::sync::Arc;

use log::{debug, error, info, trace, warn};

use crate::catalog::RoomCatalog;
use crate::config::GeneratorConfig;
use crate::cursor::Position;
use crate::direction::{self, Direction, Heading, Transition};
use crate::error::{ConfigError, LayoutError};
use crate::layout::Layout;
use crate::monitor::{LevelReadyListener, PlaceholderRegistry, TerminationMonitor};
use crate::placement::{CategoryRule, PlacementEngine, PlacementKind, RoomSink};
use crate::rng::{LayoutRng, WalkRng};
use crate::start::{AnchorSource, choose_anchor};
use crate::walk::WalkState;

/// Where the generator is in its run lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorPhase {
    /// No run started yet
    #[default]
    Idle,
    Walking,
    /// Last run completed and listeners were notified
    Finished,
    /// Last run aborted on an error
    Failed,
}

/// External control requests, consumed only between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorCommand {
    /// Throw away the previous walk and start over from a fresh anchor
    ChooseNewStart,
}

/// What a single [`LayoutGenerator::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// A queued restart began a new walk at `anchor`
    Started { anchor: Position },
    /// The cursor moved one cell
    Moved {
        from: Position,
        to: Position,
        heading: Heading,
    },
    /// A horizontal edge forced the state to Down; the cursor stayed put
    Turned { at: Position },
    /// The walk left the bottom bound, back-fill ran and listeners fired
    Finished { rooms: usize, backfilled: usize },
    /// Nothing to do until a new start is requested
    Halted,
}

/// Random-walk layout generator.
///
/// Collaborators are injected at construction: the room catalog, the anchor
/// source, the placeholder grid used for back-fill and the sink that
/// realizes placements. Listeners can be added at any time and fire once per
/// completed run.
pub struct LayoutGenerator<S: RoomSink, R: WalkRng = LayoutRng> {
    config: GeneratorConfig,
    engine: PlacementEngine,
    anchors: Box<dyn AnchorSource>,
    monitor: TerminationMonitor,
    sink: S,
    rng: R,
    walk: Option<WalkState>,
    layout: Option<Layout>,
    phase: GeneratorPhase,
    commands: VecDeque<GeneratorCommand>,
}

impl<S: RoomSink, R: WalkRng> LayoutGenerator<S, R> {
    /// Validate the configuration and catalog and build an idle generator
    pub fn new(
        config: GeneratorConfig,
        catalog: Arc<RoomCatalog>,
        anchors: Box<dyn AnchorSource>,
        placeholders: Box<dyn PlaceholderRegistry>,
        sink: S,
        rng: R,
    ) -> Result<Self, LayoutError> {
        config.validate()?;
        if let Some(category) = catalog.first_empty_category() {
            return Err(ConfigError::EmptyCategory(category).into());
        }
        Ok(Self {
            config,
            engine: PlacementEngine::new(catalog),
            anchors,
            monitor: TerminationMonitor::new(placeholders),
            sink,
            rng,
            walk: None,
            layout: None,
            phase: GeneratorPhase::Idle,
            commands: VecDeque::new(),
        })
    }

    pub fn add_listener(&mut self, listener: Box<dyn LevelReadyListener>) {
        self.monitor.add_listener(listener);
    }

    pub fn with_listener(mut self, listener: Box<dyn LevelReadyListener>) -> Self {
        self.add_listener(listener);
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn catalog(&self) -> &RoomCatalog {
        self.engine.catalog()
    }

    pub fn phase(&self) -> GeneratorPhase {
        self.phase
    }

    /// Current or most recent walk
    pub fn walk(&self) -> Option<&WalkState> {
        self.walk.as_ref()
    }

    /// Layout of the last completed run
    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Start the first walk.
    ///
    /// Fails with [`LayoutError::WalkInProgress`] while a walk is running;
    /// use [`request_new_start`](Self::request_new_start) to restart later.
    pub fn start(&mut self) -> Result<Position, LayoutError> {
        if self.phase == GeneratorPhase::Walking {
            return Err(LayoutError::WalkInProgress);
        }
        self.guarded(Self::begin_run)
    }

    /// Queue a restart. It is honoured by the next [`step`](Self::step) once
    /// no walk is in progress.
    pub fn request_new_start(&mut self) {
        if self.phase == GeneratorPhase::Walking {
            warn!("new start requested mid-walk; deferred until the walk ends");
        }
        self.commands.push_back(GeneratorCommand::ChooseNewStart);
    }

    pub fn pending_commands(&self) -> usize {
        self.commands.len()
    }

    /// Advance the generator by at most one grid cell
    pub fn step(&mut self) -> Result<StepOutcome, LayoutError> {
        if self.phase != GeneratorPhase::Walking {
            if let Some(GeneratorCommand::ChooseNewStart) = self.commands.pop_front() {
                let anchor = self.guarded(Self::begin_run)?;
                return Ok(StepOutcome::Started { anchor });
            }
        }
        match self.phase {
            GeneratorPhase::Idle => Err(LayoutError::NotStarted),
            GeneratorPhase::Finished | GeneratorPhase::Failed => Ok(StepOutcome::Halted),
            GeneratorPhase::Walking => self.guarded(Self::advance),
        }
    }

    /// Start if idle, then step until the walk finishes
    pub fn run(&mut self) -> Result<&Layout, LayoutError> {
        if self.phase == GeneratorPhase::Idle {
            self.start()?;
        }
        loop {
            match self.step()? {
                StepOutcome::Finished { .. } | StepOutcome::Halted => break,
                _ => {}
            }
        }
        self.layout.as_ref().ok_or(LayoutError::NoLayout)
    }

    /// Run `f` and move to [`GeneratorPhase::Failed`] if it errors
    fn guarded<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, LayoutError>,
    ) -> Result<T, LayoutError> {
        let result = f(self);
        if let Err(err) = &result {
            error!("layout generation aborted: {err}");
            self.phase = GeneratorPhase::Failed;
            if let Some(walk) = self.walk.as_mut() {
                walk.failed = true;
            }
        }
        result
    }

    fn begin_run(&mut self) -> Result<Position, LayoutError> {
        // The previous run is discarded even if this start fails
        self.walk = None;
        self.layout = None;

        let anchor = choose_anchor(self.anchors.as_ref(), &self.config, &mut self.rng)?;
        let direction = Direction::roll(&mut self.rng);
        let mut walk = WalkState::new(
            anchor,
            self.config.move_amount,
            direction,
            self.config.bounds(),
        );
        let start = self.engine.room(
            CategoryRule::Any,
            anchor,
            direction,
            PlacementKind::Start,
            &mut self.rng,
        )?;
        info!(
            "walk started at {anchor} heading {direction} in room {} ({:?})",
            start.variant, start.category
        );
        walk.pending = Some(start);
        self.walk = Some(walk);
        self.phase = GeneratorPhase::Walking;
        Ok(anchor)
    }

    fn advance(&mut self) -> Result<StepOutcome, LayoutError> {
        let walk = self.walk.as_mut().ok_or(LayoutError::NotStarted)?;
        walk.steps += 1;
        let from = walk.position();

        match direction::select(walk.direction, &walk.cursor, &walk.bounds) {
            Transition::ForcedDown => {
                trace!("edge reached at {from} moving {}: turning down", walk.direction);
                walk.direction = Direction::Down;
                Ok(StepOutcome::Turned { at: from })
            }
            Transition::Move(Heading::Down) => {
                walk.down_counter += 1;
                let departure = CategoryRule::Departure {
                    down_counter: walk.down_counter,
                };
                // The cell being left is re-placed so it opens downwards
                let kind = walk
                    .pending
                    .take()
                    .map_or(PlacementKind::Walk, |pending| pending.kind);
                let leaving =
                    self.engine
                        .room(departure, from, walk.direction, kind, &mut self.rng)?;
                self.monitor.commit(walk, leaving, &mut self.sink)?;

                let to = walk.cursor.advance(Heading::Down, &walk.bounds);
                let entered = self.engine.room(
                    CategoryRule::Descent,
                    to,
                    walk.direction,
                    PlacementKind::Walk,
                    &mut self.rng,
                )?;
                walk.pending = Some(entered);
                walk.direction = direction::reroll(Heading::Down, &mut self.rng);
                debug!(
                    "step {}: {from} -> {to}, down counter {}, next {}",
                    walk.steps, walk.down_counter, walk.direction
                );
                Ok(StepOutcome::Moved {
                    from,
                    to,
                    heading: Heading::Down,
                })
            }
            Transition::Move(heading) => {
                walk.down_counter = 0;
                if let Some(pending) = walk.pending.take() {
                    self.monitor.commit(walk, pending, &mut self.sink)?;
                }

                let to = walk.cursor.advance(heading, &walk.bounds);
                let entered = self.engine.room(
                    CategoryRule::Horizontal,
                    to,
                    walk.direction,
                    PlacementKind::Walk,
                    &mut self.rng,
                )?;
                walk.pending = Some(entered);
                walk.direction = direction::reroll(heading, &mut self.rng);
                debug!(
                    "step {}: {from} -> {to}, down counter 0, next {}",
                    walk.steps, walk.direction
                );
                Ok(StepOutcome::Moved { from, to, heading })
            }
            Transition::Terminate => {
                walk.down_counter += 1;
                self.finish()
            }
        }
    }

    fn finish(&mut self) -> Result<StepOutcome, LayoutError> {
        let walk = self.walk.as_mut().ok_or(LayoutError::NotStarted)?;
        walk.out_of_bounds = true;
        if let Some(pending) = walk.pending.take() {
            self.monitor.commit(walk, pending, &mut self.sink)?;
        }
        let rooms = walk.placements.len();
        let backfilled = self
            .monitor
            .backfill(walk, &self.engine, &mut self.sink, &mut self.rng)?;

        let layout = Layout::from_walk(walk, self.rng.seed(), backfilled);
        info!(
            "walk finished at {} after {} steps: {rooms} walk rooms, {backfilled} fillers",
            walk.position(),
            walk.steps
        );
        self.phase = GeneratorPhase::Finished;
        self.monitor.notify_ready(&layout);
        self.layout = Some(layout);
        Ok(StepOutcome::Finished { rooms, backfilled })
    }
}
