//! Singleton-valued macro paths: exchange rate and the fear-greed index

use crate::core::error::SourceError;
use crate::core::metrics::{self, round2};
use crate::core::provider::{FxHistoryProvider, SentimentProvider};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Daily readings requested from the sentiment index.
const SENTIMENT_WINDOW: usize = 7;

/// Exchange-rate snapshot for one currency pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FxSnapshot {
    pub pair: String,
    pub rate: f64,
    pub change_1d_pct: f64,
    pub change_1w_pct: f64,
    pub change_1m_pct: f64,
}

/// Error body for the singleton operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotFailure {
    pub error: String,
}

/// Outcome of the exchange-rate operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FxResult {
    Rate(FxSnapshot),
    Failed(SnapshotFailure),
}

/// Fear-greed index snapshot with trailing context readings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentSnapshot {
    pub score: i64,
    pub rating: String,
    pub yesterday: i64,
    pub one_week_ago: i64,
    pub interpretation: String,
}

/// Outcome of the fear-greed operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SentimentResult {
    Snapshot(SentimentSnapshot),
    Failed(SnapshotFailure),
}

/// Current rate and trailing changes for one currency pair.
///
/// Reuses the same reference-selection policy as the instrument batches; an
/// empty series or any provider fault becomes a structured `{error}` body.
pub async fn fx_snapshot(base: &str, quote: &str, provider: &dyn FxHistoryProvider) -> FxResult {
    debug!(base, quote, "fetching fx history");
    let metrics = match provider
        .fetch_pair_history(base, quote)
        .await
        .and_then(|series| metrics::compute(&series.values()))
    {
        Ok(metrics) => metrics,
        Err(e) => {
            warn!(base, quote, error = %e, "fx snapshot degraded to error");
            return FxResult::Failed(SnapshotFailure {
                error: e.to_string(),
            });
        }
    };

    info!(base, quote, rate = metrics.current, "fx snapshot complete");
    FxResult::Rate(FxSnapshot {
        pair: format!("{base}/{quote}"),
        rate: round2(metrics.current),
        change_1d_pct: metrics.change_1d_pct,
        change_1w_pct: metrics.change_1w_pct,
        change_1m_pct: metrics.change_1m_pct,
    })
}

/// Latest fear-greed reading with yesterday and one-week-ago context.
///
/// Readings arrive newest first. A history shorter than the window degrades
/// the missing context readings to today's score.
pub async fn fear_greed_snapshot(provider: &dyn SentimentProvider) -> SentimentResult {
    let readings = match provider.fetch_readings(SENTIMENT_WINDOW).await {
        Ok(readings) => readings,
        Err(e) => {
            warn!(error = %e, "fear-greed snapshot degraded to error");
            return SentimentResult::Failed(SnapshotFailure {
                error: e.to_string(),
            });
        }
    };

    let Some(today) = readings.first() else {
        warn!("fear-greed feed returned no readings");
        return SentimentResult::Failed(SnapshotFailure {
            error: SourceError::NoData.to_string(),
        });
    };

    let yesterday = readings.get(1).map_or(today.score, |r| r.score);
    let one_week_ago = readings.get(6).map_or(today.score, |r| r.score);

    info!(score = today.score, rating = %today.rating, "fear-greed snapshot complete");
    SentimentResult::Snapshot(SentimentSnapshot {
        score: today.score,
        rating: today.rating.clone(),
        yesterday,
        one_week_ago,
        interpretation: interpret_score(today.score).to_string(),
    })
}

/// Fixed-threshold interpretation of a fear-greed score.
///
/// Total over the index domain; boundary values belong to the lower bucket.
pub fn interpret_score(score: i64) -> &'static str {
    if score <= 25 {
        "extreme fear - potential buying opportunity"
    } else if score <= 45 {
        "fear - market unease"
    } else if score <= 55 {
        "neutral - balanced conditions"
    } else if score <= 75 {
        "greed - caution warranted"
    } else {
        "extreme greed - overheated, correction possible"
    }
}
