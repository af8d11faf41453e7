//! CLI argument types and parsing helpers.
mod cli;
pub(crate) mod parsers;
mod types;


pub use cli::ReplayArgs;
pub use types::{PositiveU64, PositiveUsize};

pub(crate) use cli::DEFAULT_USER_AGENT;
