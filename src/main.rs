use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use paper_glimpse::config::{find_config_file, load_config, Config, LogFormat};
use paper_glimpse::server::{serve, AppState};
use paper_glimpse::{ArxivSource, PaperService};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Paper Glimpse - search arXiv and return normalized paper records
#[derive(Parser, Debug)]
#[command(name = "paper-glimpse")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Search arXiv and return normalized paper records", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (-v for debug, -vv for trace)
    #[arg(long, short, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server (default)
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (overrides server.port)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Run a single search and print the result as JSON
    #[command(alias = "s")]
    Search {
        /// Search query string
        query: String,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn init_tracing(cli: &Cli, config: &Config) {
    let level = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => config.logging.level.as_str(),
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG")
            .unwrap_or_else(|_| format!("paper_glimpse={},tower_http={}", level, level)),
    );

    // stdout carries command output (`search`, `config`), so logs go to stderr
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Json => registry.with(fmt_layer.json()).init(),
        LogFormat::Text => registry.with(fmt_layer).init(),
    }
}

fn build_service(config: &Config) -> Result<PaperService> {
    let source = ArxivSource::from_config(&config.arxiv).context("Failed to create arXiv source")?;
    Ok(PaperService::new(Arc::new(source)))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().or_else(find_config_file);
    let config = load_config(config_path.as_deref()).context("Failed to load configuration")?;

    init_tracing(&cli, &config);
    if let Some(path) = &config_path {
        tracing::info!("Using config file: {}", path.display());
    }

    match cli.command.unwrap_or(Commands::Serve {
        host: None,
        port: None,
    }) {
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let service = build_service(&config)?;
            let state = Arc::new(AppState::new(service, &config));
            serve(&config.server.bind_addr(), state)
                .await
                .context("Server error")?;
        }
        Commands::Search { query } => {
            let service = build_service(&config)?;
            let result = service.search_papers(&query).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
