use std::time::Duration;

use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveU64, PositiveUsize, ReplayArgs};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};

use super::types::{ConfigFile, DurationValue};

/// Fills in every option the command line and environment left at its
/// default.
///
/// # Errors
///
/// Returns an error when a config value is out of range.
pub fn apply_config(
    args: &mut ReplayArgs,
    matches: &ArgMatches,
    config: &ConfigFile,
) -> AppResult<()> {
    if !is_explicit(matches, "trace")
        && let Some(trace) = config.trace.clone()
    {
        args.trace = trace;
    }

    if !is_explicit(matches, "virtual_users")
        && let Some(virtual_users) = config.virtual_users
    {
        args.virtual_users = ensure_positive_usize(virtual_users, "virtual_users")?;
    }

    if !is_explicit(matches, "iterations")
        && let Some(tests) = config.tests
    {
        args.iterations = ensure_positive_u64(tests, "tests")?;
    }

    if !is_explicit(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = non_zero_duration(timeout, "timeout")?;
    }

    if !is_explicit(matches, "connect_timeout")
        && let Some(timeout) = config.connect_timeout.as_ref()
    {
        args.connect_timeout = non_zero_duration(timeout, "connect_timeout")?;
    }

    if !is_explicit(matches, "max_sockets")
        && let Some(max_sockets) = config.max_sockets
    {
        args.max_sockets = ensure_positive_usize(max_sockets, "max_sockets")?;
    }

    if !is_explicit(matches, "max_random_wait")
        && let Some(wait) = config.max_random_wait.as_ref()
    {
        args.max_random_wait = duration(wait, "max_random_wait")?;
    }

    if !is_explicit(matches, "redirect_limit")
        && let Some(redirect) = config.redirect
    {
        args.redirect_limit = redirect;
    }

    if !is_explicit(matches, "insecure")
        && let Some(insecure) = config.insecure
    {
        args.insecure = insecure;
    }

    if !is_explicit(matches, "verbose")
        && let Some(verbose) = config.verbose
    {
        args.verbose = verbose;
    }

    if !is_explicit(matches, "no_color")
        && let Some(no_color) = config.no_color
    {
        args.no_color = no_color;
    }

    Ok(())
}

fn is_explicit(matches: &ArgMatches, id: &str) -> bool {
    matches!(
        matches.value_source(id),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn ensure_positive_u64(value: u64, field: &str) -> AppResult<PositiveU64> {
    PositiveU64::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn ensure_positive_usize(value: usize, field: &str) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value).map_err(|err| {
        AppError::config(ConfigError::FieldMustBePositive {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn duration(value: &DurationValue, field: &str) -> AppResult<Duration> {
    value.to_duration().map_err(|err| {
        AppError::config(ConfigError::InvalidDuration {
            field: field.to_owned(),
            source: err,
        })
    })
}

fn non_zero_duration(value: &DurationValue, field: &str) -> AppResult<Duration> {
    let parsed = duration(value, field)?;
    if parsed.is_zero() {
        return Err(AppError::config(ConfigError::InvalidDuration {
            field: field.to_owned(),
            source: ValidationError::DurationZero,
        }));
    }
    Ok(parsed)
}
