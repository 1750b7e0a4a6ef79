//! Monte Carlo balance simulator.
//!
//! Plays many duels or rolls many drops through the real engines and
//! aggregates the results into a report.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::{DropReport, DuelReport};
pub use runner::{run_drop_simulation, run_duel_simulation, DuelRunStats};
