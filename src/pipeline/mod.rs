//! Pipeline entry point for a scheduled run.
//!
//! - `Pipeline::run`: select, extract, compose, publish and record one recipe
//! - `RunOutcome`: how the run ended, mapped to an exit status by the CLI

mod outcome;
mod run;

pub use outcome::{RunMode, RunOutcome};
pub use run::Pipeline;
