use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::error::SourceError;
use crate::core::provider::{SentimentProvider, SentimentReading};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Crypto fear & greed index from alternative.me.
///
/// Readings arrive newest first; scores arrive as decimal strings.
pub struct AlternativeMeProvider {
    base_url: String,
}

impl AlternativeMeProvider {
    pub fn new(base_url: &str) -> Self {
        AlternativeMeProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct FngResponse {
    data: Vec<FngEntry>,
}

#[derive(Deserialize, Debug)]
struct FngEntry {
    value: String,
    value_classification: String,
}

#[async_trait]
impl SentimentProvider for AlternativeMeProvider {
    #[instrument(name = "FearGreedFetch", skip(self))]
    async fn fetch_readings(&self, limit: usize) -> Result<Vec<SentimentReading>, SourceError> {
        let url = format!("{}/fng/?limit={}", self.base_url, limit);
        debug!("Requesting fear-greed readings from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("quotefeed/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let text = response.text().await?;
        let data: FngResponse = serde_json::from_str(&text)
            .map_err(|e| SourceError::Malformed(format!("fear-greed payload: {e}")))?;

        data.data
            .into_iter()
            .map(|entry| {
                let score = entry.value.parse::<i64>().map_err(|e| {
                    SourceError::Malformed(format!("fear-greed value {:?}: {e}", entry.value))
                })?;
                Ok(SentimentReading {
                    score,
                    rating: entry.value_classification,
                })
            })
            .collect()
    }
}
