mod plan;

#[cfg(test)]
mod tests;

use std::ffi::OsString;

use clap::{ArgMatches, CommandFactory, FromArgMatches};
use tracing::warn;

use crate::args::ReplayArgs;
use crate::config::{apply_config, load_config};
use crate::error::AppResult;
use plan::{build_plan, execute_plan};

pub(crate) fn run() -> AppResult<()> {
    let (mut args, matches) = parse_args()?;
    if let Some(config) = load_config(args.config.as_deref())? {
        apply_config(&mut args, &matches, &config)?;
    }

    crate::system::logger::init_logging(args.verbose, args.no_color);
    if ignores_test_env(
        std::env::var_os("TESTS").as_ref(),
        std::env::var_os("TEST").as_ref(),
    ) {
        warn!("TEST is ignored; set TESTS to change the iterations per virtual user.");
    }

    let plan = build_plan(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(execute_plan(&args, plan))
}

fn parse_args() -> AppResult<(ReplayArgs, ArgMatches)> {
    let raw_args: Vec<OsString> = std::env::args_os().collect();
    let matches = ReplayArgs::command().get_matches_from(raw_args);
    let args = ReplayArgs::from_arg_matches(&matches)?;
    Ok((args, matches))
}

const fn ignores_test_env(tests: Option<&OsString>, test: Option<&OsString>) -> bool {
    tests.is_none() && test.is_some()
}
