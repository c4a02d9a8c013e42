//! memory-bridge - MCP bridge to a vector-store backend.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use bridge_backend::HttpBackend;
use bridge_core::{Bridge, BridgeConfig, BridgeError, FetchArgs, SearchArgs, StatsArgs};
use bridge_mcp::BridgeMcpServer;

/// memory-bridge - Expose a vector-store backend as MCP tools
#[derive(Parser)]
#[command(name = "memory-bridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/memory-bridge/config.toml, then ./memory-bridge.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL (overrides config and BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Default collection (overrides config and DEFAULT_COLLECTION)
    #[arg(long, global = true)]
    default_collection: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the MCP tools over stdio, or over HTTP with --http
    Serve {
        /// Serve streamable HTTP at ADDR/mcp (default: server.http_addr)
        #[arg(long, value_name = "ADDR")]
        http: Option<Option<SocketAddr>>,
    },

    /// Search a collection
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short = 'k', long)]
        limit: Option<String>,

        /// Collection to search
        #[arg(short, long)]
        collection: Option<String>,
    },

    /// Fetch a document by id
    Fetch {
        /// Document id
        id: String,

        /// Collection holding the document
        #[arg(short, long)]
        collection: Option<String>,
    },

    /// List collections
    Collections,

    /// Show statistics for a collection
    Stats {
        /// Collection to get stats for
        #[arg(short, long)]
        collection: Option<String>,
    },

    /// Print the effective configuration
    Config,
}

fn setup_logging(verbose: bool) {
    // stdout carries the MCP protocol, so logs go to stderr.
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn load_config(cli: &Cli) -> Result<BridgeConfig, BridgeError> {
    let mut config = match &cli.config {
        Some(path) => BridgeConfig::load(path)?,
        None => BridgeConfig::load_default()?,
    };
    config.apply_env_overrides()?;
    apply_cli_overrides(&mut config, cli);
    config.validate()?;
    Ok(config)
}

fn apply_cli_overrides(config: &mut BridgeConfig, cli: &Cli) {
    if let Some(url) = &cli.base_url {
        config.backend.base_url = url.clone();
    }
    if let Some(collection) = &cli.default_collection {
        config.search.default_collection = collection.clone();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose);

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    match cli.command {
        Commands::Serve { http } => {
            let http_addr = match http {
                Some(Some(addr)) => Some(addr),
                Some(None) => Some(config.server.http_addr()?),
                None => None,
            };
            let server = BridgeMcpServer::from_config(config)?;
            match http_addr {
                Some(addr) => server.serve_http(addr).await?,
                None => server.serve_stdio().await?,
            }
        }
        Commands::Config => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        Commands::Search {
            query,
            limit,
            collection,
        } => {
            let bridge = get_bridge(config)?;
            let args = SearchArgs {
                collection,
                query: Some(query),
                limit: limit.map(serde_json::Value::String),
            };
            print_result(bridge.search(args).await);
        }
        Commands::Fetch { id, collection } => {
            let bridge = get_bridge(config)?;
            let args = FetchArgs {
                collection,
                document_id: Some(id),
            };
            print_result(bridge.fetch(args).await);
        }
        Commands::Collections => {
            let bridge = get_bridge(config)?;
            print_result(bridge.list_collections().await);
        }
        Commands::Stats { collection } => {
            let bridge = get_bridge(config)?;
            print_result(bridge.stats(StatsArgs { collection }).await);
        }
    }

    Ok(())
}

fn get_bridge(config: BridgeConfig) -> Result<Bridge<HttpBackend>, BridgeError> {
    let backend = HttpBackend::new(&config.backend)?;
    Bridge::new(Arc::new(backend), Arc::new(config))
}

fn print_result<T: Serialize>(result: Result<T, BridgeError>) {
    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(json) => println!("{}", json),
            Err(e) => fail(&BridgeError::backend_logical(format!(
                "failed to encode result: {}",
                e
            ))),
        },
        Err(e) => fail(&e),
    }
}

fn fail(error: &BridgeError) -> ! {
    eprintln!("Error [{}]: {}", error.error_code(), error);
    process::exit(1);
}
