//! Game balance simulator CLI.
//!
//! Runs Monte Carlo duels or drop rolls against a card catalog.
//!
//! Examples:
//!   cardastika-sim --catalog data/sample_catalog.json duels --runs 500
//!   cardastika-sim --catalog data/sample_catalog.json --seed 42 duels --mode mirror
//!   cardastika-sim --catalog data/sample_catalog.json drops --trials 20000 --json

use cardastika::build_info::VERSION_LINE;
use cardastika::cards::Catalog;
use cardastika::core::config::GameConfig;
use cardastika::duel::types::DuelMode;
use cardastika::simulator::{run_drop_simulation, run_duel_simulation, SimConfig};
use clap::{Parser, Subcommand, ValueEnum};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, ValueEnum)]
enum ModeArg {
    Exchange,
    Mirror,
}

impl From<ModeArg> for DuelMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Exchange => DuelMode::Exchange,
            ModeArg::Mirror => DuelMode::Mirror,
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    /// Play duels between a balanced deck and a power-matched enemy
    Duels {
        /// Duel variant
        #[arg(long, value_enum, default_value_t = ModeArg::Exchange)]
        mode: ModeArg,
        /// Number of duels
        #[arg(long, short = 'n', default_value_t = 1000)]
        runs: u32,
        /// Level of every player card
        #[arg(long, default_value_t = 1)]
        level: u32,
    },
    /// Roll drops for a fresh player and report the rarity distribution
    Drops {
        /// Number of drops
        #[arg(long, short = 'n', default_value_t = 10_000)]
        trials: u32,
    },
}

#[derive(Parser)]
#[command(name = "cardastika-sim", version = VERSION_LINE, about = "Cardastika balance simulator")]
struct Cli {
    /// Card catalog (JSON array of card definitions)
    #[arg(long)]
    catalog: PathBuf,
    /// Game configuration (JSON); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,
    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
    /// Print one line per duel
    #[arg(long, short = 'v')]
    verbose: bool,
    #[command(subcommand)]
    cmd: Cmd,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let catalog = Catalog::load(&cli.catalog)?;
    let game = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };

    let mut sim = SimConfig {
        seed: cli.seed,
        verbosity: if cli.verbose { 2 } else { 1 },
        ..SimConfig::default()
    };

    if !cli.json {
        println!("╔═══════════════════════════════════════════════════════════════╗");
        println!("║              CARDASTIKA BALANCE SIMULATOR                     ║");
        println!("╚═══════════════════════════════════════════════════════════════╝");
        println!();
        println!("Catalog:        {} ({} cards)", cli.catalog.display(), catalog.len());
        if let Some(seed) = sim.seed {
            println!("Seed:           {}", seed);
        }
        println!();
    }

    match cli.cmd {
        Cmd::Duels { mode, runs, level } => {
            sim.mode = mode.into();
            sim.num_runs = runs;
            sim.player_card_level = level;
            let report = run_duel_simulation(&catalog, &game, &sim)?;
            if cli.json {
                println!("{}", report.to_json());
            } else {
                println!("{}", report.to_text());
            }
        }
        Cmd::Drops { trials } => {
            sim.drop_trials = trials;
            let report = run_drop_simulation(&catalog, &game, &sim);
            if cli.json {
                println!("{}", report.to_json());
            } else {
                println!("{}", report.to_text());
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    init_logging();
    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
