//! Upstream adapter seams
//!
//! One narrow trait per provider concern; business logic never sees a
//! provider-specific response shape.

use crate::core::error::SourceError;
use crate::core::series::PriceSeries;
use async_trait::async_trait;
use std::collections::HashMap;

/// Fetches a bounded trailing price history for one instrument.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn fetch_history(&self, symbol: &str) -> Result<PriceSeries, SourceError>;
}

/// Fetches a bounded trailing history for one currency pair.
#[async_trait]
pub trait FxHistoryProvider: Send + Sync {
    async fn fetch_pair_history(&self, base: &str, quote: &str)
    -> Result<PriceSeries, SourceError>;
}

/// Spot quote for one asset, changes already expressed per horizon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotQuote {
    pub price: f64,
    pub change_1d_pct: f64,
    pub change_1w_pct: f64,
    pub change_1m_pct: f64,
}

/// Fetches spot quotes for a set of asset ids in one upstream request.
///
/// Ids absent from the returned map had no data upstream; a request that
/// succeeds with a partial payload is not an error.
#[async_trait]
pub trait SpotQuoteProvider: Send + Sync {
    async fn fetch_quotes(&self, ids: &[String])
    -> Result<HashMap<String, SpotQuote>, SourceError>;
}

/// One published sentiment-index reading.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentReading {
    pub score: i64,
    pub rating: String,
}

/// Fetches the most recent sentiment-index readings, newest first.
#[async_trait]
pub trait SentimentProvider: Send + Sync {
    async fn fetch_readings(&self, limit: usize) -> Result<Vec<SentimentReading>, SourceError>;
}
