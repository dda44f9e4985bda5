use crate::core::types::PairSnapshot;
use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct PairsResponse {
    pub pairs: Vec<PairSnapshot>,
}

/// Client for the backend pair snapshot feed.
pub struct SnapshotFeed {
    base_url: String,
    client: reqwest::Client,
}

impl SnapshotFeed {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the current pair snapshot. On failure the caller keeps
    /// serving quotes from the last persisted snapshot.
    pub async fn fetch_pairs(&self) -> Result<Vec<PairSnapshot>> {
        let url = format!("{}/dex/pairs", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Couldn't reach the pair snapshot feed")?
            .error_for_status()
            .context("Pair snapshot feed returned an error status")?;
        let body: PairsResponse = response
            .json()
            .await
            .context("Couldn't parse the pair snapshot response")?;
        debug!(pairs = body.pairs.len(), url, "fetched pair snapshot");
        Ok(body.pairs)
    }
}
