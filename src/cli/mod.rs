//! Command Line Interface (CLI) layer.
//!
//! This module defines argument parsing (`args`), error types (`errors`),
//! and the orchestration logic (`runner`) for a single detection run. It
//! wires user-provided options to `penguin_cie::api`.
//!
//! If you are embedding the detector into another application, prefer
//! the high-level `penguin_cie::api` module instead of calling the CLI code.
pub mod args;
pub mod errors;
pub mod runner;

pub use args::CliArgs;
pub use runner::run;
