//! Wires the replay plan, HTTP client, metrics and worker pool into one run.
mod runner;


pub use runner::{execute, run_local};
