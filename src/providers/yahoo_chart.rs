use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::error::SourceError;
use crate::core::provider::{FxHistoryProvider, HistoryProvider};
use crate::core::series::{PricePoint, PriceSeries};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Daily price histories from the Yahoo Finance chart endpoint.
pub struct YahooChartProvider {
    base_url: String,
}

impl YahooChartProvider {
    pub fn new(base_url: &str) -> Self {
        YahooChartProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Deserialize, Debug)]
struct YahooChartResponse {
    chart: ChartResult,
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    result: Vec<ChartItem>,
}

#[derive(Deserialize, Debug)]
struct ChartItem {
    timestamp: Option<Vec<i64>>,
    indicators: Option<Indicators>,
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote: Vec<Quote>,
}

#[derive(Deserialize, Debug)]
struct Quote {
    close: Option<Vec<Option<f64>>>,
}

// Days with a null close (holidays, halted sessions) are dropped so the
// series only carries real observations.
fn chart_series(item: &ChartItem) -> PriceSeries {
    let (Some(timestamps), Some(closes)) = (
        item.timestamp.as_ref(),
        item.indicators
            .as_ref()
            .and_then(|inds| inds.quote.first())
            .and_then(|q| q.close.as_ref()),
    ) else {
        return PriceSeries::default();
    };

    let points = timestamps
        .iter()
        .zip(closes)
        .filter_map(|(ts, close)| {
            let at = Utc.timestamp_opt(*ts, 0).single()?;
            close.map(|value| PricePoint { at, value })
        })
        .collect();
    PriceSeries::new(points)
}

#[async_trait]
impl HistoryProvider for YahooChartProvider {
    #[instrument(
        name = "YahooChartFetch",
        skip(self),
        fields(symbol = %symbol)
    )]
    async fn fetch_history(&self, symbol: &str) -> Result<PriceSeries, SourceError> {
        let url = format!(
            "{}/v8/finance/chart/{}?interval=1d&range=1mo",
            self.base_url, symbol
        );
        debug!("Requesting chart data from {}", url);

        let client = reqwest::Client::builder()
            .user_agent("quotefeed/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let response = client.get(&url).send().await?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status()));
        }

        let text = response.text().await?;
        let data: YahooChartResponse = serde_json::from_str(&text)
            .map_err(|e| SourceError::Malformed(format!("chart payload for {symbol}: {e}")))?;

        let item = data.chart.result.first().ok_or(SourceError::NoData)?;
        let series = chart_series(item);
        debug!(points = series.len(), "Parsed chart series");
        Ok(series)
    }
}

/// Exchange-rate histories come from the same chart endpoint under the
/// `{base}{quote}=X` symbol convention.
pub struct YahooFxProvider {
    inner: YahooChartProvider,
}

impl YahooFxProvider {
    pub fn new(base_url: &str) -> Self {
        YahooFxProvider {
            inner: YahooChartProvider::new(base_url),
        }
    }
}

#[async_trait]
impl FxHistoryProvider for YahooFxProvider {
    async fn fetch_pair_history(
        &self,
        base: &str,
        quote: &str,
    ) -> Result<PriceSeries, SourceError> {
        let symbol = format!("{base}{quote}=X");
        self.inner.fetch_history(&symbol).await
    }
}
