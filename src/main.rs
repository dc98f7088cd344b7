use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use quotefeed::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for quotefeed::AppCommand {
    fn from(cmd: Commands) -> quotefeed::AppCommand {
        match cmd {
            Commands::Stocks => quotefeed::AppCommand::Stocks,
            Commands::Crypto => quotefeed::AppCommand::Crypto,
            Commands::Bonds => quotefeed::AppCommand::Bonds,
            Commands::Gold => quotefeed::AppCommand::Gold,
            Commands::ExchangeRate => quotefeed::AppCommand::ExchangeRate,
            Commands::FearGreed => quotefeed::AppCommand::FearGreed,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Stock/ETF prices with trailing returns
    Stocks,
    /// Crypto spot prices with trailing changes
    Crypto,
    /// Bond ETF prices with trailing returns
    Bonds,
    /// Gold ETF prices with trailing returns
    Gold,
    /// Exchange rate for the configured currency pair
    ExchangeRate,
    /// Crypto fear & greed index snapshot
    FearGreed,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => quotefeed::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup() -> anyhow::Result<()> {
    use anyhow::Context;

    let path = quotefeed::core::config::AppConfig::default_config_path()?;

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
stocks:
  - symbol: "SPY"
    name: "SPDR S&P 500 ETF"
  - symbol: "QQQ"
    name: "Invesco QQQ Trust"

crypto:
  - symbol: "bitcoin"
    name: "Bitcoin"
  - symbol: "ethereum"
    name: "Ethereum"

bonds:
  - symbol: "TLT"
    name: "iShares 20+ Year Treasury Bond ETF"

gold:
  - symbol: "GLD"
    name: "SPDR Gold Shares"

fx:
  base: "USD"
  quote: "KRW"

providers:
  yahoo:
    base_url: "https://query1.finance.yahoo.com"
  coingecko:
    base_url: "https://api.coingecko.com"
  fear_greed:
    base_url: "https://api.alternative.me"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
