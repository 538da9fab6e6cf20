//! PartScout CLI - for testing the retrieval library
//!
//! # Commands
//!
//! ```bash
//! # Show every chunk built from the sources
//! partscout chunks
//!
//! # Embed text and show vector stats
//! partscout embed "моторчик омывателя Golf 6"
//!
//! # Index the sources and search them
//! partscout search "сколько стоит задний фонарь на пассат б7" -k 3
//!
//! # Print the knowledge-context block an assistant prompt would get
//! partscout context "как закрыть сделку"
//!
//! # Run the sample queries
//! partscout demo
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use partscout_lib::{
    chunk::{self, Source},
    config::{Config, DEFAULT_CATALOG_PATH, DEFAULT_MODEL, DEFAULT_SALES_PATH},
    embed::{Embedder, MiniLmEmbedder},
    search::{render_context, Retriever, SearchResult},
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Queries run by `demo`, with their result counts
const DEMO_QUERIES: [(&str, usize); 3] = [
    ("моторчик омывателя Golf 6", 3),
    ("как закрыть сделку", 2),
    ("сколько стоит задний фонарь на пассат б7", 3),
];

#[derive(Parser)]
#[command(name = "partscout")]
#[command(about = "Semantic retrieval over a parts catalog and sales book")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    sources: SourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct SourceArgs {
    /// Product catalog CSV
    #[arg(long, env = "PARTSCOUT_CATALOG", default_value = DEFAULT_CATALOG_PATH, global = true)]
    catalog: PathBuf,

    /// Sales book text file
    #[arg(long, env = "PARTSCOUT_SALES", default_value = DEFAULT_SALES_PATH, global = true)]
    sales: PathBuf,

    /// Embedding model name
    #[arg(long, env = "PARTSCOUT_MODEL", default_value = DEFAULT_MODEL, global = true)]
    model: String,

    /// Directory for downloaded model files
    #[arg(long, env = "PARTSCOUT_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,
}

impl SourceArgs {
    fn into_config(self) -> Config {
        Config {
            catalog_path: self.catalog,
            sales_path: self.sales,
            model: self.model,
            cache_dir: self.cache_dir,
            ..Config::default()
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Load the sources and list every chunk
    Chunks,

    /// Embed text and show vector info
    Embed {
        /// Text to embed
        text: String,
    },

    /// Index the sources and search them
    Search {
        /// Query to search for
        query: String,

        /// Number of results to return [default: 5]
        #[arg(short)]
        k: Option<usize>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Index the sources and print the knowledge-context block for a query
    Context {
        /// Query to search for
        query: String,

        /// Number of results to include [default: 5]
        #[arg(short)]
        k: Option<usize>,
    },

    /// Index the sources once and run the sample queries
    Demo,
}

/// Build the retriever off the async runtime; model loading and batch
/// embedding are CPU-bound and block for a while.
async fn open_retriever(config: Config) -> Result<Retriever<MiniLmEmbedder>> {
    println!("Loading model and indexing (first run downloads the model)...");
    let retriever = tokio::task::spawn_blocking(move || Retriever::from_config(&config))
        .await
        .context("indexing task panicked")?
        .context("failed to initialize retriever")?;
    info!(chunks = retriever.len(), "retriever ready");
    Ok(retriever)
}

fn print_results(query: &str, results: &[SearchResult]) {
    println!("\nSearch results for: '{query}'");
    if results.is_empty() {
        println!("  No relevant information found.");
    }
    for result in results {
        println!(
            "  Distance: {:.4} - Source Type: {}",
            result.distance,
            result.source.kind()
        );
        println!("  Text: {}\n", result.text);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = cli.sources.into_config();
    let top_k = config.top_k;

    match cli.command {
        Commands::Chunks => {
            let chunks = chunk::load(&config.catalog_path, &config.sales_path)
                .context("failed to load corpus")?;

            println!("Loaded {} chunks:\n", chunks.len());
            for c in &chunks {
                let label = match &c.source {
                    Source::CatalogItem(item) => format!("catalog {}", item.article),
                    Source::SalesTip(tip) if tip.category.is_empty() => "sales tip".to_string(),
                    Source::SalesTip(tip) => format!("sales tip / {}", tip.category),
                };
                println!("[{}] ({label}) {}", c.position, c.text);
            }
        }

        Commands::Embed { text } => {
            println!("Loading {} ...", config.model);
            let embedder = MiniLmEmbedder::from_config(&config)?;
            let embedding = embedder.embed_one(&text)?;

            println!("\nEmbedding stats:");
            println!("  Dimensions: {}", embedding.len());
            println!("  First 5 values: {:?}", &embedding[..embedding.len().min(5)]);
            println!("  Min: {:.4}", embedding.iter().cloned().fold(f32::INFINITY, f32::min));
            println!("  Max: {:.4}", embedding.iter().cloned().fold(f32::NEG_INFINITY, f32::max));
        }

        Commands::Search { query, k, json } => {
            let retriever = open_retriever(config).await?;
            let results = retriever.search(&query, k.unwrap_or(top_k))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            } else {
                print_results(&query, &results);
            }
        }

        Commands::Context { query, k } => {
            let retriever = open_retriever(config).await?;
            let results = retriever.search(&query, k.unwrap_or(top_k))?;
            print!("{}", render_context(&results));
        }

        Commands::Demo => {
            let retriever = open_retriever(config).await?;
            println!("\n--- Test Search ---");
            for (query, k) in DEMO_QUERIES {
                let results = retriever.search(query, k)?;
                print_results(query, &results);
            }
        }
    }

    Ok(())
}
