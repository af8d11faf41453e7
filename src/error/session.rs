use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Replay of '{url}' aborted before producing an outcome.")]
    ReplayAborted { url: String },
    #[error("Session task failed: {source}")]
    Join {
        #[source]
        source: tokio::task::JoinError,
    },
}

impl SessionError {
    /// URL of the request whose replay failed, when known.
    #[must_use]
    pub fn url(&self) -> Option<&str> {
        match self {
            SessionError::ReplayAborted { url } => Some(url.as_str()),
            SessionError::Join { .. } => None,
        }
    }
}
