use clap::Parser;
use std::time::Duration;

use super::parsers::{
    parse_duration_arg, parse_positive_u64, parse_positive_usize, parse_wait_arg,
};
use super::types::{PositiveU64, PositiveUsize};

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("harstorm/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Replays recorded HAR page loads against their servers with a pool of virtual users and reports per-minute throughput, errors, and transferred bytes."
)]
pub struct ReplayArgs {
    /// HAR file with the recorded page loads
    #[arg(
        long = "trace",
        short = 'f',
        env = "HARSTORM_TRACE",
        default_value = "har.json"
    )]
    pub trace: String,

    /// Number of concurrent virtual users
    #[arg(
        long = "virtual-users",
        short = 'c',
        env = "VIRTUAL_USER",
        default_value = "3",
        value_parser = parse_positive_usize
    )]
    pub virtual_users: PositiveUsize,

    /// Sessions replayed by each virtual user
    #[arg(
        long = "tests",
        short = 'n',
        env = "TESTS",
        default_value = "100",
        value_parser = parse_positive_u64
    )]
    pub iterations: PositiveU64,

    /// Per-request timeout (supports ms/s/m/h, bare numbers are ms)
    #[arg(
        long = "timeout",
        env = "HARSTORM_TIMEOUT",
        default_value = "1500ms",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Connect timeout (supports ms/s/m/h, bare numbers are ms)
    #[arg(
        long = "connect-timeout",
        default_value = "1500ms",
        value_parser = parse_duration_arg
    )]
    pub connect_timeout: Duration,

    /// Maximum sockets in flight across all virtual users
    #[arg(
        long = "max-sockets",
        env = "HARSTORM_MAX_SOCKETS",
        default_value = "1000",
        value_parser = parse_positive_usize
    )]
    pub max_sockets: PositiveUsize,

    /// Upper bound of the random delay before each request (0 disables)
    #[arg(
        long = "max-random-wait",
        env = "HARSTORM_MAX_RANDOM_WAIT",
        default_value = "1000ms",
        value_parser = parse_wait_arg
    )]
    pub max_random_wait: Duration,

    /// Maximum redirects to follow (0 disables)
    #[arg(long = "redirect", default_value = "10")]
    pub redirect_limit: u32,

    /// Skip TLS certificate and hostname verification
    #[arg(long = "insecure")]
    pub insecure: bool,

    /// Path to config file (TOML or JSON)
    #[arg(long = "config")]
    pub config: Option<String>,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable ANSI colors in log output
    #[arg(long = "no-color", env = "NO_COLOR")]
    pub no_color: bool,
}

impl ReplayArgs {
    /// Total sessions the pool is asked to run (`virtual_users * tests`).
    #[must_use]
    pub fn target_sessions(&self) -> u64 {
        u64::try_from(self.virtual_users.get())
            .unwrap_or(u64::MAX)
            .saturating_mul(self.iterations.get())
    }
}
