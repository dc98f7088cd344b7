use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::error::SourceError;
use crate::core::provider::{SpotQuote, SpotQuoteProvider};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Batched spot quotes from the CoinGecko simple-price endpoint.
///
/// One request covers every configured id; the 24h/7d/30d change fields map
/// onto the 1d/1w/1m horizons.
pub struct CoinGeckoProvider {
    base_url: String,
}

impl CoinGeckoProvider {
    pub fn new(base_url: &str) -> Self {
        CoinGeckoProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct CoinEntry {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
    usd_7d_change: Option<f64>,
    usd_30d_change: Option<f64>,
}

#[async_trait]
impl SpotQuoteProvider for CoinGeckoProvider {
    #[instrument(name = "CoinGeckoFetch", skip(self, ids))]
    async fn fetch_quotes(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, SpotQuote>, SourceError> {
        let url = format!("{}/api/v3/simple/price", self.base_url);
        let ids_param = ids.join(",");
        debug!(ids = %ids_param, "Requesting spot quotes from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("quotefeed/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client
            .get(&url)
            .query(&[
                ("ids", ids_param.as_str()),
                ("vs_currencies", "usd"),
                ("include_24hr_change", "true"),
                ("include_7d_change", "true"),
                ("include_30d_change", "true"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let text = response.text().await?;
        let entries: HashMap<String, CoinEntry> = serde_json::from_str(&text)
            .map_err(|e| SourceError::Malformed(format!("spot payload: {e}")))?;

        // An entry without a price is indistinguishable from an absent id.
        let quotes = entries
            .into_iter()
            .filter_map(|(id, entry)| {
                let price = entry.usd?;
                Some((
                    id,
                    SpotQuote {
                        price,
                        change_1d_pct: entry.usd_24h_change.unwrap_or(0.0),
                        change_1w_pct: entry.usd_7d_change.unwrap_or(0.0),
                        change_1m_pct: entry.usd_30d_change.unwrap_or(0.0),
                    },
                ))
            })
            .collect();
        Ok(quotes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_successful_quote_fetch() {
        let mock_response = r#"{
            "bitcoin": {
                "usd": 67234.12,
                "usd_24h_change": 1.2345,
                "usd_7d_change": -2.5,
                "usd_30d_change": 10.75
            },
            "ethereum": {
                "usd": 3456.78,
                "usd_24h_change": 0.5,
                "usd_7d_change": 3.25,
                "usd_30d_change": -1.0
            }
        }"#;

        let mock_server = create_mock_server(mock_response).await;
        let provider = CoinGeckoProvider::new(&mock_server.uri());

        let quotes = provider
            .fetch_quotes(&ids(&["bitcoin", "ethereum"]))
            .await
            .unwrap();

        assert_eq!(quotes.len(), 2);
        let btc = quotes.get("bitcoin").unwrap();
        assert_eq!(btc.price, 67234.12);
        assert_eq!(btc.change_1d_pct, 1.2345);
        assert_eq!(btc.change_1w_pct, -2.5);
        assert_eq!(btc.change_1m_pct, 10.75);
    }

    #[tokio::test]
    async fn test_requested_id_absent_from_payload() {
        let mock_response = r#"{
            "bitcoin": {
                "usd": 67234.12,
                "usd_24h_change": 1.0
            }
        }"#;

        let mock_server = create_mock_server(mock_response).await;
        let provider = CoinGeckoProvider::new(&mock_server.uri());

        let quotes = provider
            .fetch_quotes(&ids(&["bitcoin", "not-a-coin"]))
            .await
            .unwrap();

        assert!(quotes.contains_key("bitcoin"));
        assert!(!quotes.contains_key("not-a-coin"));
    }

    #[tokio::test]
    async fn test_missing_change_fields_default_to_zero() {
        let mock_response = r#"{"bitcoin": {"usd": 67234.12}}"#;
        let mock_server = create_mock_server(mock_response).await;
        let provider = CoinGeckoProvider::new(&mock_server.uri());

        let quotes = provider.fetch_quotes(&ids(&["bitcoin"])).await.unwrap();
        let btc = quotes.get("bitcoin").unwrap();
        assert_eq!(btc.change_1d_pct, 0.0);
        assert_eq!(btc.change_1w_pct, 0.0);
        assert_eq!(btc.change_1m_pct, 0.0);
    }

    #[tokio::test]
    async fn test_entry_without_price_is_dropped() {
        let mock_response = r#"{"bitcoin": {"usd_24h_change": 1.0}}"#;
        let mock_server = create_mock_server(mock_response).await;
        let provider = CoinGeckoProvider::new(&mock_server.uri());

        let quotes = provider.fetch_quotes(&ids(&["bitcoin"])).await.unwrap();
        assert!(quotes.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v3/simple/price"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&mock_server)
            .await;

        let provider = CoinGeckoProvider::new(&mock_server.uri());
        let result = provider.fetch_quotes(&ids(&["bitcoin"])).await;
        let Err(SourceError::Status(status)) = result else {
            panic!("Expected a status error");
        };
        assert_eq!(status.as_u16(), 429);
    }

    #[tokio::test]
    async fn test_malformed_payload() {
        let mock_server = create_mock_server("[]").await;
        let provider = CoinGeckoProvider::new(&mock_server.uri());

        let result = provider.fetch_quotes(&ids(&["bitcoin"])).await;
        assert!(matches!(result, Err(SourceError::Malformed(_))));
    }
}
