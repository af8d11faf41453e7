use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Failed to read trace '{path}': {source}")]
    ReadTrace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse trace '{path}': {source}")]
    ParseTrace {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Page title '{title}' does not start with a scheme://host URL.")]
    MalformedPageTitle { title: String },
    #[error("Entry URL '{url}' does not start with a scheme://host URL.")]
    MalformedEntryUrl { url: String },
    #[error("Trace has no pages to derive target hosts from.")]
    NoTargetHosts,
    #[error("No trace entries are in scope for the target hosts.")]
    NoEntriesInScope,
    #[error("Invalid method '{method}' for {url}.")]
    InvalidMethod { method: String, url: String },
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Invalid header name '{name}' for {url}.")]
    InvalidHeaderName { name: String, url: String },
    #[error("Invalid value for header '{name}' for {url}.")]
    InvalidHeaderValue { name: String, url: String },
}
