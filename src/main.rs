//! Bittrex command line client - main entry point
//!
//! Subcommands fall into two groups:
//! - queries: public market data and signed account data, printed as JSON
//! - secrets: write the plain secrets file or the encrypted vault

use anyhow::Result;
use bittrex_client::bittrex::OrderBookType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "bittrex")]
#[command(about = "Query the Bittrex exchange and manage API credentials", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Password for the credential vault
    #[arg(long, global = true, env = "BITTREX_VAULT_PASSWORD", hide_env_values = true)]
    vault_password: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List open markets
    Markets,

    /// List supported currencies
    Currencies,

    /// Current tick values for a market
    Ticker {
        /// Market name, e.g. BTC-LTC
        market: String,
    },

    /// 24h summaries of all markets
    Summaries,

    /// 24h summary of one market
    Summary { market: String },

    /// Latest trades of a market
    History { market: String },

    /// Order book of a market
    Orderbook {
        market: String,

        /// buy, sell or both
        #[arg(short = 't', long = "type", default_value = "both")]
        book_type: OrderBookType,
    },

    /// All account balances (signed)
    Balances,

    /// Balance of one currency (signed)
    Balance { currency: String },

    /// Open orders (signed)
    OpenOrders {
        #[arg(short, long)]
        market: Option<String>,
    },

    /// Order history (signed)
    OrderHistory {
        #[arg(short, long)]
        market: Option<String>,
    },

    /// Single order by uuid (signed)
    Order { uuid: String },

    /// Write the API key and secret to the plain secrets file
    StoreSecrets {
        #[arg(long)]
        key: String,
        #[arg(long)]
        secret: String,
    },

    /// Encrypt the API key and secret into the vault
    EncryptSecrets {
        #[arg(long)]
        key: String,
        #[arg(long)]
        secret: String,
    },

    /// Check that the vault opens with the given password
    VerifyVault,
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Commands::StoreSecrets { .. }
            | Commands::EncryptSecrets { .. }
            | Commands::VerifyVault => "secrets",
            _ => "query",
        }
    }
}

fn setup_logging(verbose: bool, command_name: &str) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    // Log file naming pattern: {command}_{date}.log
    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    // Filter out noisy external crates
    let level = if verbose { "debug" } else { "info" };
    let filter_str = format!(
        "{},hyper=warn,hyper_util=warn,reqwest=warn,rustls=warn,h2=warn",
        level
    );
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    // Console on stderr so stdout stays pure JSON
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(true);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!("Log file: {}", log_path.display());
    Ok(())
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.command.name())?;

    let config = bittrex_client::Config::load(cli.config.as_deref())?;
    let password = cli.vault_password.as_deref();

    match cli.command {
        Commands::Markets => commands::query::public(&config, |c| c.markets()),
        Commands::Currencies => commands::query::public(&config, |c| c.currencies()),
        Commands::Ticker { market } => commands::query::public(&config, |c| c.ticker(&market)),
        Commands::Summaries => commands::query::public(&config, |c| c.market_summaries()),
        Commands::Summary { market } => {
            commands::query::public(&config, |c| c.market_summary(&market))
        }
        Commands::History { market } => {
            commands::query::public(&config, |c| c.market_history(&market))
        }
        Commands::Orderbook { market, book_type } => {
            commands::query::public(&config, |c| c.order_book(&market, book_type))
        }
        Commands::Balances => commands::query::signed(&config, password, |c| c.balances()),
        Commands::Balance { currency } => {
            commands::query::signed(&config, password, |c| c.balance(&currency))
        }
        Commands::OpenOrders { market } => {
            commands::query::signed(&config, password, |c| c.open_orders(market.as_deref()))
        }
        Commands::OrderHistory { market } => commands::query::signed(&config, password, |c| {
            c.order_history(market.as_deref())
        }),
        Commands::Order { uuid } => commands::query::signed(&config, password, |c| c.order(&uuid)),
        Commands::StoreSecrets { key, secret } => commands::secrets::store(&config, key, secret),
        Commands::EncryptSecrets { key, secret } => {
            commands::secrets::encrypt(&config, key, secret, password)
        }
        Commands::VerifyVault => commands::secrets::verify(&config, password),
    }
}
