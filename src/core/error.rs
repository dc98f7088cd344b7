//! Typed failures for the data-normalization layer

use crate::core::metrics::Horizon;
use thiserror::Error;

/// Failure of one upstream fetch or of the metric computation for one
/// instrument.
///
/// Every variant is caught at the narrowest possible scope and converted
/// into an error-shaped result entry; none of them escapes a batch
/// operation.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Upstream answered but carried no usable observations.
    #[error("no data")]
    NoData,

    /// Network-level failure talking to the provider.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("upstream returned {0}")]
    Status(reqwest::StatusCode),

    /// Provider payload did not match the expected shape.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// A horizon's reference price was zero; the change is undefined.
    #[error("zero reference price at {0} horizon")]
    ZeroReference(Horizon),
}
