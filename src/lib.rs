//! Core library for the `harstorm` CLI.
//!
//! Replays a recorded HAR trace with a pool of virtual users: the trace is
//! filtered down to the requests of the recorded target hosts, every virtual
//! user replays those requests as one session with randomized pacing, and
//! outcomes are aggregated per wall-clock minute. The primary interface is
//! the `harstorm` command-line application.
pub mod app;
pub mod args;
pub mod config;
pub mod error;
pub mod http;
pub mod metrics;
pub mod pool;
pub mod trace;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
