//! amz-bestsellers - Amazon category best-seller scraper with persistence
//!
//! A Rust implementation with TLS fingerprint emulation for reliable scraping.

use amz_bestsellers::commands::{ListCommand, ScrapeCommand, ServeCommand};
use amz_bestsellers::config::{Config, OutputFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-bestsellers",
    version,
    about = "Amazon category best-seller scraper",
    long_about = "Scrapes the top-ranked products from an Amazon category listing, persists them to SQLite, and serves them over a read-only JSON API."
)]
struct Cli {
    /// SQLite database URL
    #[arg(long, global = true, env = "AMZ_DB")]
    db: Option<String>,

    /// Proxy URL (e.g., socks5://host:port)
    #[arg(long, global = true, env = "AMZ_PROXY")]
    proxy: Option<String>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table", global = true)]
    format: OutputFormat,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape the top products from a category listing
    #[command(alias = "s")]
    Scrape {
        /// Category listing URL (e.g., an Amazon Best Sellers page)
        category_url: String,

        /// Maximum number of products to extract
        #[arg(short, long, default_value = "5")]
        max: usize,

        /// Retry budget per navigation
        #[arg(long)]
        max_retries: Option<u32>,
    },

    /// Serve the stored products over a JSON API
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "AMZ_PORT")]
        port: Option<u16>,

        /// Expose the server through a public tunnel
        #[arg(long)]
        tunnel: bool,
    },

    /// List the products currently in the store
    #[command(alias = "ls")]
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    config.format = cli.format;

    if let Some(db) = cli.db {
        config.database_url = db;
    }
    if let Some(proxy) = cli.proxy {
        config.proxy = Some(proxy);
    }

    match cli.command {
        Commands::Scrape { category_url, max, max_retries } => {
            config.max_products = max;
            if let Some(retries) = max_retries {
                config.max_retries = retries;
            }

            let cmd = ScrapeCommand::new(config);
            let output = cmd.execute(&category_url).await?;
            println!("{}", output);
        }

        Commands::Serve { port, tunnel } => {
            if let Some(port) = port {
                config.port = port;
            }
            if tunnel {
                config.enable_tunnel = true;
            }

            ServeCommand::new(config).execute().await?;
        }

        Commands::List => {
            let cmd = ListCommand::new(config);
            let output = cmd.execute().await?;
            println!("{}", output);
        }
    }

    Ok(())
}
