pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{batch, sentiment};
use crate::providers::alternative_me::AlternativeMeProvider;
use crate::providers::coingecko::CoinGeckoProvider;
use crate::providers::yahoo_chart::{YahooChartProvider, YahooFxProvider};
use anyhow::Result;
use serde_json::json;
use tracing::debug;

/// A named data-retrieval operation exposed to the calling boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Stocks,
    Crypto,
    Bonds,
    Gold,
    ExchangeRate,
    FearGreed,
}

/// Runs one operation against the configured instrument universe and prints
/// its result as a JSON document on stdout.
///
/// Partial success is success: batch operations embed item-level failures
/// as error-shaped entries and always produce a well-formed object, even
/// under total upstream unavailability.
pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let yahoo_base = config
        .providers
        .yahoo
        .as_ref()
        .map_or("https://query1.finance.yahoo.com", |p| &p.base_url);
    let coingecko_base = config
        .providers
        .coingecko
        .as_ref()
        .map_or("https://api.coingecko.com", |p| &p.base_url);
    let fear_greed_base = config
        .providers
        .fear_greed
        .as_ref()
        .map_or("https://api.alternative.me", |p| &p.base_url);

    let output = match command {
        AppCommand::Stocks => {
            let provider = YahooChartProvider::new(yahoo_base);
            json!({ "stocks": batch::aggregate_history(&config.stocks, &provider).await })
        }
        AppCommand::Crypto => {
            let provider = CoinGeckoProvider::new(coingecko_base);
            json!({ "crypto": batch::aggregate_spot(&config.crypto, &provider).await })
        }
        AppCommand::Bonds => {
            let provider = YahooChartProvider::new(yahoo_base);
            json!({ "bonds": batch::aggregate_history(&config.bonds, &provider).await })
        }
        AppCommand::Gold => {
            let provider = YahooChartProvider::new(yahoo_base);
            json!({ "gold": batch::aggregate_history(&config.gold, &provider).await })
        }
        AppCommand::ExchangeRate => {
            let provider = YahooFxProvider::new(yahoo_base);
            let snapshot =
                sentiment::fx_snapshot(&config.fx.base, &config.fx.quote, &provider).await;
            serde_json::to_value(snapshot)?
        }
        AppCommand::FearGreed => {
            let provider = AlternativeMeProvider::new(fear_greed_base);
            serde_json::to_value(sentiment::fear_greed_snapshot(&provider).await)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
