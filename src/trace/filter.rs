use std::sync::Arc;

use tracing::debug;

use crate::error::TraceError;

use super::{HarEntry, PreparedRequest, Trace};

/// Recorded status that marks a redirect hop; those entries are never replayed.
pub const REDIRECT_STATUS: u16 = 301;

const URL_SCHEMES: [&str; 4] = ["http://", "https://", "ftp://", "ftps://"];

/// Extracts the host from a leading `scheme://host` prefix.
///
/// The host is the longest run of `[-._A-Za-z0-9]` right after the scheme
/// that starts and ends with an ASCII alphanumeric, so ports, paths and
/// trailing punctuation are not part of it. Returns `None` when the input does
/// not start with such a prefix.
#[must_use]
pub fn extract_host(url: &str) -> Option<&str> {
    let rest = URL_SCHEMES
        .iter()
        .find_map(|scheme| url.strip_prefix(scheme))?;
    let run_len = rest
        .bytes()
        .take_while(|byte| byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'.' | b'_'))
        .count();
    let host = rest
        .get(..run_len)?
        .trim_end_matches(|ch: char| !ch.is_ascii_alphanumeric());
    let starts_alnum = host
        .chars()
        .next()
        .is_some_and(|ch| ch.is_ascii_alphanumeric());
    if starts_alnum && host.len() >= 2 {
        Some(host)
    } else {
        None
    }
}

/// Collects the distinct hosts named by the page titles, in first-seen order.
///
/// # Errors
///
/// Returns an error when a page title does not start with a `scheme://host` URL.
pub fn derive_target_hosts(trace: &Trace) -> Result<Vec<String>, TraceError> {
    let mut hosts: Vec<String> = Vec::new();
    for page in &trace.pages {
        let host =
            extract_host(&page.title).ok_or_else(|| TraceError::MalformedPageTitle {
                title: page.title.clone(),
            })?;
        if !hosts.iter().any(|known| known == host) {
            hosts.push(host.to_owned());
        }
    }
    Ok(hosts)
}

/// True when the entry was not a redirect and its host is a target host.
///
/// # Errors
///
/// Returns an error when a non-redirect entry URL does not start with a
/// `scheme://host` URL.
pub fn is_in_scope(entry: &HarEntry, hosts: &[String]) -> Result<bool, TraceError> {
    if entry.response.status == REDIRECT_STATUS {
        return Ok(false);
    }
    let host =
        extract_host(&entry.request.url).ok_or_else(|| TraceError::MalformedEntryUrl {
            url: entry.request.url.clone(),
        })?;
    Ok(hosts.iter().any(|known| known == host))
}

/// Entries of the trace that pass [`is_in_scope`], in recorded order.
///
/// # Errors
///
/// Propagates the first malformed entry URL.
pub fn in_scope_entries<'trace>(
    trace: &'trace Trace,
    hosts: &[String],
) -> Result<Vec<&'trace HarEntry>, TraceError> {
    let mut selected = Vec::with_capacity(trace.entries.len());
    for entry in &trace.entries {
        if is_in_scope(entry, hosts)? {
            selected.push(entry);
        } else {
            debug!(
                "Skipping {} (status {}).",
                entry.request.url, entry.response.status
            );
        }
    }
    Ok(selected)
}

/// Immutable input of a run: the target hosts and the requests every session
/// replays. Built once at startup and shared read-only by all workers.
#[derive(Debug, Clone)]
pub struct ReplayPlan {
    pub hosts: Vec<String>,
    pub requests: Arc<[PreparedRequest]>,
}

impl ReplayPlan {
    /// Filters the trace and prepares every in-scope request.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed titles, URLs, methods or headers, and
    /// when nothing is left to replay.
    pub fn from_trace(trace: &Trace) -> Result<Self, TraceError> {
        let hosts = derive_target_hosts(trace)?;
        if hosts.is_empty() {
            return Err(TraceError::NoTargetHosts);
        }
        let requests = in_scope_entries(trace, &hosts)?
            .into_iter()
            .map(PreparedRequest::from_entry)
            .collect::<Result<Vec<_>, _>>()?;
        if requests.is_empty() {
            return Err(TraceError::NoEntriesInScope);
        }
        Ok(Self {
            hosts,
            requests: requests.into(),
        })
    }
}
