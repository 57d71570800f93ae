use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} exceeded the {limit}-byte limit")]
    TooLarge { url: String, limit: usize },

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl FetchError {
    /// The chart URL the failure belongs to, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            FetchError::Request { url, .. }
            | FetchError::Status { url, .. }
            | FetchError::TooLarge { url, .. } => Some(url),
            FetchError::Client(_) => None,
        }
    }
}
