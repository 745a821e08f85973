//! amz-recscrape - Amazon recommendation carousel extractor
//!
//! Extracts the recommendation carousels of rendered product pages and
//! turns many extraction results into a product recommendation network.

use amz_recscrape::commands::{ExtractCommand, GraphCommand, PageTurn};
use amz_recscrape::config::{Config, OutputFormat};
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "amz-recscrape",
    version,
    about = "Amazon recommendation carousel extractor",
    long_about = "Extracts 'customers also bought' style carousels from rendered Amazon product pages and exports recommendation networks as GDF."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Maximum number of items per carousel
    #[arg(short, long, global = true, env = "RECSCRAPE_MAX_ITEMS")]
    max_items: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract carousels from a saved product page
    #[command(alias = "x")]
    Extract {
        /// Rendered product page HTML
        html: PathBuf,

        /// URL the page was loaded from
        #[arg(short, long)]
        url: String,

        /// Next page of a carousel, as CONTAINER_ID=FILE (repeatable, in order)
        #[arg(long = "page-turn")]
        page_turns: Vec<PageTurn>,
    },

    /// Build GDF recommendation networks from saved JSON results
    #[command(alias = "g")]
    Graph {
        /// JSON extraction results
        #[arg(required = true)]
        results: Vec<PathBuf>,

        /// File name prefix for the GDF files
        #[arg(short, long)]
        prefix: Option<String>,

        /// Directory to write the GDF files to
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,

        /// List product links not yet extracted as seeds
        #[arg(long)]
        next_seeds: bool,
    },
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

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(max_items) = cli.max_items {
        config.max_carousel_items = max_items;
    }

    match cli.command {
        Commands::Extract { html, url, page_turns } => {
            let cmd = ExtractCommand::new(config);
            let output = cmd.execute(&html, &url, &page_turns).await?;
            println!("{}", output);
        }

        Commands::Graph { results, prefix, out_dir, next_seeds } => {
            let cmd = GraphCommand::new(out_dir, prefix);
            let output = cmd.execute(&results, next_seeds)?;
            println!("{}", output);
        }
    }

    Ok(())
}
