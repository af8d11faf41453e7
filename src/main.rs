mod app;
mod args;
mod config;
mod entry;
mod error;
mod http;
mod metrics;
mod pool;
mod system;
mod trace;

use error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
