//! Per-instrument normalization and order-preserving batch aggregation

use crate::core::config::Instrument;
use crate::core::error::SourceError;
use crate::core::metrics::{self, round2};
use crate::core::provider::{HistoryProvider, SpotQuoteProvider};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Upper bound on in-flight fetches within one batch.
const MAX_CONCURRENT_FETCHES: usize = 4;

/// A populated per-instrument record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentQuote {
    pub symbol: String,
    pub name: String,
    pub price: f64,
    pub change_1d_pct: f64,
    pub change_1w_pct: f64,
    pub change_1m_pct: f64,
}

/// An error record for a single instrument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentFailure {
    pub symbol: String,
    pub error: String,
}

/// Outcome for one instrument: exactly one of the two shapes, never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum InstrumentResult {
    Quote(InstrumentQuote),
    Failed(InstrumentFailure),
}

impl InstrumentResult {
    pub fn symbol(&self) -> &str {
        match self {
            InstrumentResult::Quote(q) => &q.symbol,
            InstrumentResult::Failed(f) => &f.symbol,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, InstrumentResult::Failed(_))
    }

    fn failed(symbol: &str, error: impl ToString) -> Self {
        InstrumentResult::Failed(InstrumentFailure {
            symbol: symbol.to_string(),
            error: error.to_string(),
        })
    }
}

/// Normalizes one instrument into a result record.
///
/// Every failure on the way (empty history, provider fault, zero
/// reference) is converted into an error record here; nothing propagates
/// to the batch.
pub async fn instrument_snapshot(
    instrument: &Instrument,
    provider: &dyn HistoryProvider,
) -> InstrumentResult {
    match history_quote(instrument, provider).await {
        Ok(quote) => InstrumentResult::Quote(quote),
        Err(e) => {
            warn!(symbol = %instrument.symbol, error = %e, "instrument degraded to error record");
            InstrumentResult::failed(&instrument.symbol, e)
        }
    }
}

async fn history_quote(
    instrument: &Instrument,
    provider: &dyn HistoryProvider,
) -> Result<InstrumentQuote, SourceError> {
    debug!(symbol = %instrument.symbol, "fetching price history");
    let series = provider.fetch_history(&instrument.symbol).await?;
    let metrics = metrics::compute(&series.values())?;

    Ok(InstrumentQuote {
        symbol: instrument.symbol.clone(),
        name: instrument.name.clone(),
        price: round2(metrics.current),
        change_1d_pct: metrics.change_1d_pct,
        change_1w_pct: metrics.change_1w_pct,
        change_1m_pct: metrics.change_1m_pct,
    })
}

/// Aggregates one asset class through per-instrument history fetches.
///
/// Fetches run concurrently, bounded, and the output preserves
/// configuration order. An empty instrument list yields an empty list; a
/// total provider outage yields one error record per instrument.
pub async fn aggregate_history(
    instruments: &[Instrument],
    provider: &dyn HistoryProvider,
) -> Vec<InstrumentResult> {
    let results: Vec<InstrumentResult> = stream::iter(instruments)
        .map(|instrument| instrument_snapshot(instrument, provider))
        .buffered(MAX_CONCURRENT_FETCHES)
        .collect()
        .await;

    info!(
        total = results.len(),
        errors = results.iter().filter(|r| r.is_error()).count(),
        "batch aggregation complete"
    );
    results
}

/// Aggregates one asset class through a single batched spot-quote request.
///
/// Ids missing from the payload become "no data" records; a failed batch
/// request degrades every instrument to the same error record. The output
/// contract is identical to the per-instrument path.
pub async fn aggregate_spot(
    instruments: &[Instrument],
    provider: &dyn SpotQuoteProvider,
) -> Vec<InstrumentResult> {
    if instruments.is_empty() {
        return Vec::new();
    }

    let ids: Vec<String> = instruments.iter().map(|i| i.symbol.clone()).collect();
    debug!(?ids, "fetching batched spot quotes");

    let results: Vec<InstrumentResult> = match provider.fetch_quotes(&ids).await {
        Ok(quotes) => instruments
            .iter()
            .map(|instrument| match quotes.get(&instrument.symbol) {
                Some(quote) => InstrumentResult::Quote(InstrumentQuote {
                    symbol: instrument.symbol.clone(),
                    name: instrument.name.clone(),
                    price: quote.price,
                    change_1d_pct: round2(quote.change_1d_pct),
                    change_1w_pct: round2(quote.change_1w_pct),
                    change_1m_pct: round2(quote.change_1m_pct),
                }),
                None => {
                    warn!(symbol = %instrument.symbol, "id absent from spot payload");
                    InstrumentResult::failed(&instrument.symbol, SourceError::NoData)
                }
            })
            .collect(),
        Err(e) => {
            warn!(error = %e, "batched spot request failed; degrading all instruments");
            let message = e.to_string();
            instruments
                .iter()
                .map(|i| InstrumentResult::failed(&i.symbol, &message))
                .collect()
        }
    };

    info!(
        total = results.len(),
        errors = results.iter().filter(|r| r.is_error()).count(),
        "spot aggregation complete"
    );
    results
}
