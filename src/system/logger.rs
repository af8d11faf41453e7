use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV: &str = "HARSTORM_LOG";

/// Installs the global subscriber. `HARSTORM_LOG` wins over `RUST_LOG`;
/// without either the level follows `--verbose`.
pub fn init_logging(verbose: bool, no_color: bool) {
    let filter = std::env::var(LOG_ENV)
        .or_else(|_err| std::env::var("RUST_LOG"))
        .map_or_else(
            |_err| default_filter(verbose),
            |value| EnvFilter::try_new(value).unwrap_or_else(|_err| default_filter(verbose)),
        );

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_ansi(!no_color)
        .with_target(false)
        .finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    }
}
