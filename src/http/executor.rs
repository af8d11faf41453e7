use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, header::HeaderMap};
use thiserror::Error;

use crate::trace::PreparedRequest;

/// Separator counted after every raw header string (`": "` or `"\r\n"`).
const RAW_HEADER_SEPARATOR_LEN: u64 = 2;

#[derive(Debug)]
pub struct ReplayResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body_len: u64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExecuteError {
    /// The client reported a status code as a failure instead of a response.
    #[error("request failed with status {status}")]
    Status { status: u16 },
    #[error("request timed out")]
    Timeout,
    #[error("{message}")]
    Transport { message: String },
}

impl From<reqwest::Error> for ExecuteError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return ExecuteError::Timeout;
        }
        match err.status() {
            Some(status) => ExecuteError::Status {
                status: status.as_u16(),
            },
            None => ExecuteError::Transport {
                message: err.to_string(),
            },
        }
    }
}

/// Issues one prepared request and reports what came back.
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    /// Sends the request and drains the response.
    ///
    /// # Errors
    ///
    /// Returns an error when no complete response was received.
    async fn execute(&self, request: &PreparedRequest) -> Result<ReplayResponse, ExecuteError>;
}

pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    #[must_use]
    pub const fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(&self, request: &PreparedRequest) -> Result<ReplayResponse, ExecuteError> {
        let mut request_builder = self
            .client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = request.body.as_ref() {
            request_builder = request_builder.body(body.clone());
        }

        let response = request_builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body_len = drain_response_body(response).await?;
        Ok(ReplayResponse {
            status,
            headers,
            body_len,
        })
    }
}

/// Bytes transferred for one response: every raw header string (each name and
/// each value) plus its two separator bytes, then the body.
#[must_use]
pub fn response_size(headers: &HeaderMap, body_len: u64) -> u64 {
    headers
        .iter()
        .map(|(name, value)| {
            raw_len(name.as_str().len())
                .saturating_add(raw_len(value.as_bytes().len()))
        })
        .fold(body_len, u64::saturating_add)
}

fn raw_len(len: usize) -> u64 {
    u64::try_from(len)
        .unwrap_or(u64::MAX)
        .saturating_add(RAW_HEADER_SEPARATOR_LEN)
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
