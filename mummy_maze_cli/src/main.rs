use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use mummy_maze_core::{Heuristic, MazeState, Solver};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod replay;

use replay::Replay;

const DEFAULT_MAP: &str = "maps/level01.txt";

#[derive(Parser, Debug)]
#[command(version, about = "Solve and replay Mummy Maze levels", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Search for a way out and replay it step by step
    Solve {
        /// Map file to load
        #[arg(short, long, value_name = "MAP_FILE", default_value = DEFAULT_MAP)]
        map: PathBuf,

        /// Estimate used to order the search frontier
        #[arg(long, value_enum, default_value_t = HeuristicArg::TileDistance)]
        heuristic: HeuristicArg,

        /// Give up after expanding this many states
        #[arg(long, value_name = "N")]
        max_expansions: Option<usize>,

        /// Delay between replayed states, in milliseconds
        #[arg(long, value_name = "MS", default_value_t = 1000)]
        pace_ms: u64,
    },
    /// Print the initial state of a map
    Show {
        /// Map file to load
        #[arg(short, long, value_name = "MAP_FILE", default_value = DEFAULT_MAP)]
        map: PathBuf,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum HeuristicArg {
    TileDistance,
    TilesOutOfPlace,
}

impl From<HeuristicArg> for Heuristic {
    fn from(arg: HeuristicArg) -> Self {
        match arg {
            HeuristicArg::TileDistance => Heuristic::TileDistance,
            HeuristicArg::TilesOutOfPlace => Heuristic::TilesOutOfPlace,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose.log_level_filter())?;

    match args.command {
        Command::Solve {
            map,
            heuristic,
            max_expansions,
            pace_ms,
        } => {
            let mut solver = Solver::new(heuristic.into());
            if let Some(limit) = max_expansions {
                solver = solver.with_max_expansions(limit);
            }
            solve(&map, solver, Duration::from_millis(pace_ms))
        }
        Command::Show { map } => {
            let state = load_maze(&map)?;
            Replay::show(&state).context("Failed to print the state")
        }
    }
}

/// Installs a stderr subscriber. `RUST_LOG` wins over the verbosity flags.
fn setup_logging(level: log::LevelFilter) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_string().to_lowercase()));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()?;
    Ok(())
}

fn load_maze(map_file: &Path) -> Result<MazeState> {
    // Ensure the map file exists
    if !map_file.exists() {
        return Err(anyhow!("Map file does not exist: {}", map_file.display()));
    }
    let text = fs::read_to_string(map_file)
        .with_context(|| format!("Failed to read map file {}", map_file.display()))?;
    MazeState::from_text(&text)
        .with_context(|| format!("Failed to load maze from {}", map_file.display()))
}

fn solve(map_file: &Path, solver: Solver, pace: Duration) -> Result<()> {
    let start = load_maze(map_file)?;
    info!(
        "solving {} with {:?}",
        map_file.display(),
        solver.heuristic()
    );

    let Some(solution) = solver.solve(&start)? else {
        println!("No escape exists from {}", map_file.display());
        return Ok(());
    };
    info!(
        "found a path of cost {} ({} states expanded, {} generated)",
        solution.cost, solution.stats.expanded, solution.stats.generated
    );

    // Replay the moves on a fresh copy; every committed move is published
    // to the replay thread.
    let mut replay_state = start.clone();
    let events = replay_state.subscribe();
    let player = Replay::new(pace).play(start.board().clone(), solution.cost, events);

    for action in &solution.actions {
        replay_state.execute_action(*action);
    }
    // Hang up so the replay thread sees the end of the stream.
    drop(replay_state);

    let frames = player
        .join()
        .map_err(|_| anyhow!("Replay thread panicked"))?
        .context("Failed to print the replay")?;
    info!("replayed {} states", frames);

    let moves: Vec<String> = solution.actions.iter().map(ToString::to_string).collect();
    println!("Moves: {}", moves.join(", "));
    Ok(())
}
