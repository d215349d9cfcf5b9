use crate::feed::error::FeedError;
use crate::types::raw_sample::{FeedRecord, FeedResponse};
use log::{debug, info, warn};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Source of channel feed records.
///
/// Implementations return the newest `results` records, oldest first. Any
/// failure (transport, non-2xx status, undecodable body) is reported as a
/// [`FeedError`]; callers treat them all alike.
pub trait FeedTransport: Send + Sync + 'static {
    fn fetch_feeds(
        &self,
        results: usize,
    ) -> impl Future<Output = Result<Vec<FeedRecord>, FeedError>> + Send;
}

/// Reads a ThingSpeak-compatible `channels/{id}/feeds.json` endpoint.
#[derive(Debug, Clone)]
pub struct ThingSpeakTransport {
    client: Client,
    base_url: String,
    channel_id: String,
    read_api_key: Option<String>,
}

impl ThingSpeakTransport {
    pub fn new(
        base_url: &str,
        channel_id: &str,
        read_api_key: Option<&str>,
        timeout: Option<Duration>,
    ) -> Result<Self, FeedError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(FeedError::ClientBuild)?;

        Ok(ThingSpeakTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            channel_id: channel_id.to_string(),
            read_api_key: read_api_key.map(str::to_string),
        })
    }

    /// Endpoint URL without the API key, safe to log.
    fn feeds_url(&self, results: usize) -> String {
        format!(
            "{}/channels/{}/feeds.json?results={}",
            self.base_url, self.channel_id, results
        )
    }
}

impl FeedTransport for ThingSpeakTransport {
    async fn fetch_feeds(&self, results: usize) -> Result<Vec<FeedRecord>, FeedError> {
        let url = self.feeds_url(results);
        debug!("Fetching feed from {}", url);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.read_api_key {
            request = request.query(&[("api_key", key)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FeedError::NetworkRequest(url.clone(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FeedError::HttpStatus {
                        url,
                        status,
                        source: e,
                    }
                } else {
                    FeedError::NetworkRequest(url, e)
                });
            }
        };

        let body: FeedResponse = response
            .json()
            .await
            .map_err(|e| FeedError::Decode(url.clone(), e))?;

        info!(
            "Received {} feed entries for channel {}",
            body.feeds.len(),
            self.channel_id
        );
        Ok(body.feeds)
    }
}
