//! Entry points for the `fuzz/` targets.
use std::path::PathBuf;
use std::time::Duration;

use clap::{CommandFactory, FromArgMatches};

use crate::args::ReplayArgs;
use crate::config::apply_config;
use crate::config::types::ConfigFile;
use crate::error::{AppError, AppResult, ConfigError, TraceError};
use crate::trace::{ReplayPlan, extract_host, parse_trace};

const FUZZ_INPUT: &str = "<fuzz input>";

/// Parses a HAR document and builds the replay plan from it.
///
/// # Errors
///
/// Returns an error when the document is not a HAR trace or leaves nothing
/// to replay.
pub fn replay_plan_from_json(data: &[u8]) -> AppResult<ReplayPlan> {
    let trace = parse_trace(data).map_err(|err| {
        AppError::trace(TraceError::ParseTrace {
            path: PathBuf::from(FUZZ_INPUT),
            source: err,
        })
    })?;
    ReplayPlan::from_trace(&trace).map_err(AppError::from)
}

#[must_use]
pub fn extract_host_input(url: &str) -> Option<&str> {
    extract_host(url)
}

/// Parses a duration value (e.g. `10s`, `500`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_value_input(input: &str) -> AppResult<Duration> {
    crate::args::parsers::parse_duration_value(input).map_err(AppError::from)
}

/// Applies a TOML config on top of the default arguments.
///
/// # Errors
///
/// Returns an error when the config does not parse or holds invalid values.
pub fn apply_config_from_toml(input: &str) -> AppResult<ReplayArgs> {
    let config: ConfigFile = toml::from_str(input).map_err(|err| {
        AppError::config(ConfigError::ParseToml {
            path: PathBuf::from(FUZZ_INPUT),
            source: err,
        })
    })?;
    let matches = ReplayArgs::command().try_get_matches_from(["harstorm"])?;
    let mut args = ReplayArgs::from_arg_matches(&matches)?;
    apply_config(&mut args, &matches, &config)?;
    Ok(args)
}
