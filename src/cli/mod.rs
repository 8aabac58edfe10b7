//! Command Line Interface (CLI) layer for rasagg.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) that turns user-provided options
//! into `AggregationParams` and runs them through `rasagg::api`.
//!
//! If you are embedding rasagg into another application, prefer using
//! the high-level `rasagg::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
