use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

/// One tradable asset within a configured asset class.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Instrument {
    pub symbol: String,
    pub name: String,
}

/// Currency pair for the exchange-rate operation.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FxConfig {
    pub base: String,
    pub quote: String,
}

impl Default for FxConfig {
    fn default() -> Self {
        FxConfig {
            base: "USD".to_string(),
            quote: "KRW".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct YahooProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoinGeckoProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FearGreedProviderConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ProvidersConfig {
    pub yahoo: Option<YahooProviderConfig>,
    pub coingecko: Option<CoinGeckoProviderConfig>,
    pub fear_greed: Option<FearGreedProviderConfig>,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        ProvidersConfig {
            yahoo: Some(YahooProviderConfig {
                base_url: "https://query1.finance.yahoo.com".to_string(),
            }),
            coingecko: Some(CoinGeckoProviderConfig {
                base_url: "https://api.coingecko.com".to_string(),
            }),
            fear_greed: Some(FearGreedProviderConfig {
                base_url: "https://api.alternative.me".to_string(),
            }),
        }
    }
}

/// Static instrument universes plus provider endpoints.
///
/// Loaded once per process and treated as read-only; the asset class of an
/// instrument is given by the list it sits in.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub stocks: Vec<Instrument>,
    #[serde(default)]
    pub crypto: Vec<Instrument>,
    #[serde(default)]
    pub bonds: Vec<Instrument>,
    #[serde(default)]
    pub gold: Vec<Instrument>,
    #[serde(default)]
    pub fx: FxConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("dev", "quotefeed", "quotefeed")
            .context("Could not determine project directories")?;
        Ok(proj_dirs.config_dir().join("portfolio.yaml"))
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }
}
