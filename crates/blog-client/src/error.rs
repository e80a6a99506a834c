//! Client error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with a non-2xx status.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The configured base URL cannot carry an `/api/posts/{id}` path.
    #[error("Invalid base URL: {0}")]
    InvalidUrl(String),

    /// The request never produced a usable response.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::InvalidUrl(_) => None,
            ClientError::Transport(e) => e.status().map(|s| s.as_u16()),
        }
    }
}
