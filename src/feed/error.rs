use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode feed body from {0}")]
    Decode(String, #[source] reqwest::Error),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Feed request did not complete within {0:?}")]
    Timeout(Duration),

    /// For [`FeedTransport`](crate::FeedTransport) implementations that do
    /// not go through HTTP, such as an embedded or replayed source.
    #[error("Feed unavailable: {0}")]
    Unavailable(String),
}
