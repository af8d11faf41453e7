use reqwest::{Client, redirect};
use tracing::error;

use crate::{
    args::{DEFAULT_USER_AGENT, ReplayArgs},
    error::{AppError, AppResult, HttpError},
};

/// Builds the shared HTTP client used by every virtual user.
///
/// The idle pool per host is sized by `max_sockets`; the hard cap on requests
/// in flight is enforced by the replayer's semaphore.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialized.
pub fn build_client(args: &ReplayArgs) -> AppResult<Client> {
    let mut client_builder = Client::builder()
        .timeout(args.request_timeout)
        .connect_timeout(args.connect_timeout)
        .pool_max_idle_per_host(args.max_sockets.get())
        .user_agent(DEFAULT_USER_AGENT);

    if args.redirect_limit == 0 {
        client_builder = client_builder.redirect(redirect::Policy::none());
    } else {
        client_builder = client_builder.redirect(redirect::Policy::limited(
            usize::try_from(args.redirect_limit).unwrap_or(10),
        ));
    }

    if args.insecure {
        client_builder = client_builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    match client_builder.build() {
        Ok(client) => Ok(client),
        Err(err) => {
            error!("Failed to build HTTP client: {}", err);
            Err(AppError::http(HttpError::BuildClientFailed { source: err }))
        }
    }
}
