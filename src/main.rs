use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use circuit_designer_mcp::config::{find_config_file, load_config, Config};
use circuit_designer_mcp::mcp::{format_outcome, McpServer, ToolRegistry};
use circuit_designer_mcp::retrieval::{HttpFetcher, PdfConverter, RetrievalPipeline};
use circuit_designer_mcp::search::DuckDuckGoProvider;
use circuit_designer_mcp::sim::SimulationSandbox;

/// Circuit Designer MCP - datasheet/paper retrieval and sandboxed ngspice simulation
#[derive(Parser, Debug)]
#[command(name = "circuit-designer-mcp")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "MCP server exposing circuit design tools", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (can be used multiple times for more verbosity: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(long, short)]
    quiet: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the MCP server (default)
    Serve {
        /// Run in HTTP/SSE mode instead of stdio
        #[arg(long)]
        http: bool,

        /// Port for HTTP mode
        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Host for HTTP mode
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Fetch a research paper and print the extracted text
    Paper {
        /// Topic to search for
        topic: String,

        /// Number of PDF pages to extract
        #[arg(long, default_value_t = 4)]
        max_pages: usize,
    },

    /// Fetch a component datasheet and print the extracted text
    Datasheet {
        /// Component name or part number (e.g. "NE555")
        component: String,
    },

    /// Run an ngspice command against a netlist file
    Simulate {
        /// ngspice command (e.g. 'op', 'tran 1u 1m')
        command: String,

        /// Path to the netlist file
        netlist: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity
    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = if cli.quiet { "error" } else { log_level };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("circuit_designer_mcp={}", env_filter)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration from file if specified or found in default locations
    let config = if let Some(config_path) = &cli.config {
        load_config(config_path)
            .with_context(|| format!("loading config from {}", config_path.display()))?
    } else if let Some(config_path) = find_config_file() {
        tracing::info!("Using config file: {}", config_path.display());
        load_config(&config_path)
            .with_context(|| format!("loading config from {}", config_path.display()))?
    } else {
        Config::default()
    };

    // Wire up the pipeline and sandbox
    let provider = Arc::new(DuckDuckGoProvider::new().context("creating search provider")?);
    let fetcher = Arc::new(HttpFetcher::new(&config.fetch).context("creating fetcher")?);
    let converter = Arc::new(PdfConverter::new());
    let pipeline = Arc::new(RetrievalPipeline::new(
        provider,
        fetcher,
        converter,
        config.search.max_results,
    ));
    let sandbox = Arc::new(SimulationSandbox::new(&config.simulation));

    match cli.command {
        None
        | Some(Commands::Serve {
            http: false, ..
        }) => {
            let registry = ToolRegistry::new(pipeline, sandbox, &config.search);
            let server = McpServer::new(registry);
            tracing::info!("Running MCP server in stdio mode");
            server.run_stdio().await?;
        }
        Some(Commands::Serve { port, host, .. }) => {
            let registry = ToolRegistry::new(pipeline, sandbox, &config.search);
            let server = McpServer::new(registry);
            let addr = format!("{}:{}", host, port);
            let (bound_addr, handle) = server.run_http(&addr).await?;
            tracing::info!("MCP server listening on http://{}", bound_addr);
            handle.await?;
        }
        Some(Commands::Paper { topic, max_pages }) => {
            let query = format!("{} : technical research paper filetype:pdf", topic);
            println!("{}", pipeline.retrieve(&query, max_pages).await);
        }
        Some(Commands::Datasheet { component }) => {
            let query = format!("{} datasheet filetype:pdf", component);
            println!(
                "{}",
                pipeline
                    .retrieve(&query, config.search.default_max_pages)
                    .await
            );
        }
        Some(Commands::Simulate { command, netlist }) => {
            let netlist_text = std::fs::read_to_string(&netlist)
                .with_context(|| format!("reading netlist from {}", netlist.display()))?;
            let outcome = sandbox.run(&command, &netlist_text).await;
            println!("{}", format_outcome(outcome));
        }
    }

    Ok(())
}
