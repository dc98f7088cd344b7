//! Core business logic abstractions

pub mod batch;
pub mod config;
pub mod error;
pub mod log;
pub mod metrics;
pub mod provider;
pub mod sentiment;
pub mod series;

// Re-export main types for cleaner imports
pub use batch::InstrumentResult;
pub use config::{AppConfig, Instrument};
pub use error::SourceError;
pub use metrics::{Horizon, ReturnMetrics};
pub use provider::{FxHistoryProvider, HistoryProvider, SentimentProvider, SpotQuoteProvider};
pub use series::{PricePoint, PriceSeries};
