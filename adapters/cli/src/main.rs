#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates mazes and plays Maze Chase headlessly.

mod ascii;
mod config;
mod simulate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use maze_chase_system_maze_generation::generate;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::{
    config::GameFile,
    simulate::{build_levels, Options, Simulation},
};

/// Maze Chase command-line interface.
#[derive(Debug, Parser)]
#[command(name = "maze-chase", version, about)]
struct Cli {
    /// Path to the TOML game configuration.
    #[arg(long, default_value_os_t = config::default_path())]
    config: PathBuf,
    /// Seed for mazes whose level does not pin one; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    #[command(subcommand)]
    command: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Prints the wall layout of a freshly generated maze.
    Maze {
        /// Number of columns.
        #[arg(long, default_value_t = 10)]
        width: u32,
        /// Number of rows.
        #[arg(long, default_value_t = 10)]
        height: u32,
    },
    /// Plays every configured level with an autopilot and reports the outcomes.
    Simulate {
        /// Ticks per simulated second.
        #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
        tick_rate: u32,
        /// Upper bound on the number of ticks to simulate.
        #[arg(long, default_value_t = 100_000)]
        max_ticks: u64,
        /// Retries granted per level after the pursuer catches the player.
        #[arg(long, default_value_t = 2)]
        retries: u32,
        /// Ticks the autopilot waits once the pursuer is armed.
        #[arg(long, default_value_t = 0)]
        stall_ticks: u32,
        /// Columns of the fallback level used when the config lists none.
        #[arg(long, default_value_t = 10)]
        width: u32,
        /// Rows of the fallback level used when the config lists none.
        #[arg(long, default_value_t = 10)]
        height: u32,
    },
}

/// Entry point for the Maze Chase command-line interface.
fn main() {
    init_tracing();
    if let Err(err) = run(Cli::parse()) {
        error!(error = %format!("{err:#}"), "maze_chase_failed");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(seed, "seed_selected");

    match cli.command {
        Mode::Maze { width, height } => {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let maze = generate(width, height, &mut rng).context("failed to generate maze")?;
            print!("{}", ascii::render(&maze));
        }
        Mode::Simulate {
            tick_rate,
            max_ticks,
            retries,
            stall_ticks,
            width,
            height,
        } => {
            let file = GameFile::load(&cli.config)?;
            let levels = build_levels(file.levels_or(width, height)?, seed)?;
            let mut simulation = Simulation::new(file.defaults, levels)?;
            println!("{}", simulation.banner());

            let reports = simulation.run(Options {
                tick_rate,
                max_ticks,
                retries,
                stall_ticks,
            })?;
            for report in &reports {
                println!("{report}");
            }
        }
    }
    Ok(())
}
