use std::time::Duration;

use reqwest::Client;

use crate::error::FetchError;

const USER_AGENT: &str = concat!("briefhub/", env!("CARGO_PKG_VERSION"));

/// Build the shared HTTP client. `timeout` bounds each whole request,
/// connect through the last body byte.
pub fn build_client(timeout: Duration) -> Result<Client, FetchError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| FetchError::Client(e.to_string()))
}
