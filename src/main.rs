//! grocery-offers - Weekly offers from Swedish grocery stores
//!
//! Normalizes City Gross, Willys and ICA promotions into one schema.

use anyhow::Result;
use clap::{Parser, Subcommand};
use grocery_offers::commands::{CheckCommand, OfferQuery, OffersCommand};
use grocery_offers::config::{Config, OutputFormat};
use grocery_offers::stores::StoreId;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "grocery-offers",
    version,
    about = "Weekly offers from Swedish grocery stores",
    long_about = "Fetches current promotions from City Gross, Willys and ICA and normalizes them into a single offer schema."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format (table, json, markdown, csv)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true)]
    proxy: Option<String>,

    /// Per-request timeout in milliseconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Offers from every store
    #[command(alias = "a")]
    All,

    /// Offers from the store a name refers to
    #[command(alias = "s")]
    Store {
        /// Store name, e.g. "Willys Sundbyberg"
        name: String,
    },

    /// City Gross offers
    #[command(alias = "cg")]
    CityGross,

    /// Willys offers
    Willys,

    /// ICA offers
    Ica,

    /// List supported stores and their endpoints
    Stores,

    /// Check which store APIs are reachable
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(timeout) = cli.timeout {
        config = config.with_timeout(timeout);
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    let query = match cli.command {
        Commands::All => OfferQuery::All,
        Commands::Store { name } => OfferQuery::Named(name),
        Commands::CityGross => OfferQuery::Store(StoreId::CityGross),
        Commands::Willys => OfferQuery::Store(StoreId::Willys),
        Commands::Ica => OfferQuery::Store(StoreId::Ica),

        Commands::Stores => {
            println!("Supported stores:\n");
            println!("{:<10} {:<12} {:<6} {}", "Id", "Name", "Method", "Endpoint");
            println!("{:-<10} {:-<12} {:-<6} {:-<40}", "", "", "", "");

            for store in StoreId::all() {
                let store_config = config.store(*store);
                println!(
                    "{:<10} {:<12} {:<6} {}",
                    store.as_str(),
                    store_config.name,
                    store_config.method,
                    store_config.url()
                );
            }
            return Ok(());
        }

        Commands::Check => {
            let output = CheckCommand::new(config).execute().await?;
            println!("{}", output);
            return Ok(());
        }
    };

    let output = OffersCommand::new(config).execute(query).await?;
    println!("{}", output);

    Ok(())
}
