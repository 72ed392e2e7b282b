use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use utils::Pos;
mod utils;

pub use world::{CellState, Census, Grid, Infection};
pub mod world;

pub use sim::{CancelFlag, Frame, Sim};
mod sim;

pub use view::View;
mod view;

mod config;
mod error;
mod pattern;

use config::Config;
use pattern::Pattern;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Preset {
    Beacon,
    Glider,
    /// No pattern, the whole grid is rolled at random.
    Random,
}

/// A game of life where an infection spreads and vaccination pushes back.
#[derive(Parser)]
#[command(name = "golvir")]
struct Args {
    /// Seed pattern file (`1`/`#` alive, ` `/`0`/`.` dead). Overrides --preset.
    pattern: Option<PathBuf>,

    /// Built-in seed pattern.
    #[arg(long, value_enum, default_value = "beacon")]
    preset: Preset,

    /// Only the pattern is alive: no random fill and no infection seeding.
    #[arg(long)]
    blank: bool,

    #[arg(long, default_value_t = config::ROWS)]
    rows: usize,

    #[arg(long, default_value_t = config::COLS)]
    cols: usize,

    /// Delay between generations, in milliseconds.
    #[arg(long, default_value_t = config::TICK_DELAY.as_millis() as u64)]
    tick_ms: u64,

    /// Seed for the random population, for reproducible runs.
    #[arg(long)]
    seed: Option<u64>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
}

pub fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let config = Config {
        rows: args.rows,
        cols: args.cols,
        tick_delay: Duration::from_millis(args.tick_ms),
        ..Default::default()
    };
    config.validate()?;

    let pattern = match (&args.pattern, args.preset) {
        (Some(path), _) => Some(Pattern::load(path)?),
        (None, Preset::Beacon) => Some(Pattern::beacon()),
        (None, Preset::Glider) => Some(Pattern::glider()),
        (None, Preset::Random) => None,
    };

    let grid = if args.blank {
        Grid::stamped(config.rows, config.cols, &pattern.unwrap_or_default())
    } else {
        let mut rng = match args.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Grid::build(&config, pattern.as_ref(), &mut rng)
    };
    info!(
        rows = grid.rows(),
        cols = grid.cols(),
        infected = grid.infected_budget().used(),
        vaccinated = grid.vaccinated_budget().used(),
        "starting"
    );

    let cancel = CancelFlag::new();
    view::install_interrupt(cancel.clone())?;
    let mut view = View::open()?;
    let _input_handle = view::spawn_input(cancel.clone());

    let mut simulation = Sim::new(grid, config.tick_delay);
    simulation.run(&cancel, |frame| view.draw(frame))?;
    Ok(())
}
