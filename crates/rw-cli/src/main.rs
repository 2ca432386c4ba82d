//! roomwalk: generate random-walk room layouts from the command line
//!
//! Steps the generator at the configured pace, prints each finished level as
//! an ASCII map and optionally writes the layouts as JSON.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{debug, info};

use rw_core::{
    GridPlaceholders, Layout, LayoutGenerator, LayoutRng, LevelFile, LevelReadyListener,
    Placement, RoomCatalog, RoomCategory, RoomSink, SpawnError, StepOutcome,
};

const BUILTIN_CATALOG: &str = include_str!("../data/catalog.json");

/// Random-walk dungeon layout generator
#[derive(Parser, Debug)]
#[command(name = "roomwalk")]
#[command(author, version, about = "Generate a grid of connected rooms by random walk", long_about = None)]
struct Args {
    /// Level file (generator config plus starting anchors)
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Room catalog JSON
    #[arg(long = "catalog")]
    catalog: Option<PathBuf>,

    /// Seed for a reproducible layout
    #[arg(short = 's', long = "seed")]
    seed: Option<u64>,

    /// Override the configured pause between steps, in milliseconds
    #[arg(long = "delay-ms", conflicts_with = "no_delay")]
    delay_ms: Option<u64>,

    /// Step as fast as possible
    #[arg(long = "no-delay")]
    no_delay: bool,

    /// Number of layouts to generate, each from a fresh starting point
    #[arg(short = 'n', long = "runs", default_value_t = 1)]
    runs: u32,

    /// Write the finished layouts as JSON
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Log every step
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

/// Spawner that records rooms and logs each one
#[derive(Default)]
struct LoggingSink {
    rooms: Vec<Placement>,
}

impl RoomSink for LoggingSink {
    fn spawn_room(&mut self, placement: &Placement) -> Result<(), SpawnError> {
        debug!(
            "spawn {} {} at {}",
            placement.kind, placement.variant, placement.position
        );
        self.rooms.push(placement.clone());
        Ok(())
    }
}

struct ReadyLog;

impl LevelReadyListener for ReadyLog {
    fn on_level_ready(&mut self, layout: &Layout) {
        info!(
            "level ready: {} rooms ({} back-filled)",
            layout.placements.len(),
            layout.backfilled
        );
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let level = match &args.config {
        Some(path) => LevelFile::load_from_file(path)
            .with_context(|| format!("loading level file {}", path.display()))?,
        None => LevelFile::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => RoomCatalog::load_from_file(path)
            .with_context(|| format!("loading room catalog {}", path.display()))?,
        None => RoomCatalog::from_json(BUILTIN_CATALOG).context("parsing built-in catalog")?,
    };

    let interval = if args.no_delay {
        None
    } else if let Some(ms) = args.delay_ms {
        Some(Duration::from_millis(ms))
    } else {
        level.generator.step_interval()
    };

    let top_row = level.anchors.iter().map(|a| a.x).min().unwrap_or(0);
    let placeholders = GridPlaceholders::from_config(&level.generator, top_row);
    let rng = args.seed.map_or_else(LayoutRng::from_entropy, LayoutRng::new);
    let seed = rng.seed();

    let mut generator = LayoutGenerator::new(
        level.generator.clone(),
        Arc::new(catalog),
        Box::new(level.anchor_positions()),
        Box::new(placeholders),
        LoggingSink::default(),
        rng,
    )
    .context("configuring generator")?
    .with_listener(Box::new(ReadyLog));

    let catalog = generator.catalog();
    for category in RoomCategory::ALL {
        debug!("{category}: {} variants", catalog.variants(category).len());
    }
    debug!("{} filler variants", catalog.filler().len());

    info!("seed {seed}");
    let mut layouts = Vec::new();
    for run in 0..args.runs {
        if run == 0 {
            generator.start().context("starting walk")?;
        } else {
            generator.request_new_start();
        }
        let layout = drive(&mut generator, interval)?;
        println!("{}", layout.render_ascii());
        layouts.push(layout);
    }

    let sink = generator.into_sink();
    info!("spawned {} rooms over {} run(s)", sink.rooms.len(), args.runs);

    if let Some(path) = &args.output {
        let file = File::create(path)
            .with_context(|| format!("creating output file {}", path.display()))?;
        let writer = BufWriter::new(file);
        match layouts.as_slice() {
            [layout] => serde_json::to_writer_pretty(writer, layout),
            all => serde_json::to_writer_pretty(writer, all),
        }
        .with_context(|| format!("writing layouts to {}", path.display()))?;
        info!("wrote {} layout(s) to {}", layouts.len(), path.display());
    }

    Ok(())
}

/// Step until the current walk finishes, pausing between steps
fn drive<S: RoomSink>(
    generator: &mut LayoutGenerator<S>,
    interval: Option<Duration>,
) -> Result<Layout> {
    loop {
        match generator.step()? {
            StepOutcome::Finished { rooms, backfilled } => {
                debug!("walk placed {rooms} rooms, back-fill {backfilled}");
                break;
            }
            StepOutcome::Halted => bail!("generator halted before finishing a layout"),
            _ => {}
        }
        if let Some(pause) = interval {
            thread::sleep(pause);
        }
    }
    generator
        .layout()
        .cloned()
        .context("finished walk produced no layout")
}
