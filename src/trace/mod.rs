//! Recorded page-load traces (HAR) and the filter that selects what to replay.
mod filter;
mod loader;
mod request;
mod types;


pub use filter::{
    REDIRECT_STATUS, ReplayPlan, derive_target_hosts, extract_host, in_scope_entries, is_in_scope,
};
pub use loader::{load_trace, parse_trace};
pub use request::PreparedRequest;
pub use types::{
    HarCookie, HarEntry, HarHeader, HarPage, HarPostData, HarRequest, HarResponse, Trace,
};
