//! HTTP request execution and replay of recorded requests.
mod client;
mod executor;
mod replayer;

#[cfg(test)]
pub(crate) mod test_support;
#[cfg(test)]
mod tests;

pub use client::build_client;
pub use executor::{
    ExecuteError, ReplayResponse, ReqwestExecutor, RequestExecutor, response_size,
};
pub use replayer::{ReplayOutcome, RequestReplayer, SUCCESS_STATUSES, classify};
