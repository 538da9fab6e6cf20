//! Retriever configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default catalog location, relative to the working directory
pub const DEFAULT_CATALOG_PATH: &str = "data/catalog.csv";
/// Default sales-book location, relative to the working directory
pub const DEFAULT_SALES_PATH: &str = "data/sales_book.txt";
/// Multilingual sentence-embedding model used for both corpus and queries
pub const DEFAULT_MODEL: &str = "paraphrase-multilingual-MiniLM-L12-v2";
/// Number of results returned when the caller does not ask for a specific count
pub const DEFAULT_TOP_K: usize = 5;

/// Where to find the knowledge sources and which model embeds them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Product catalog (CSV with a header row)
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,

    /// Sales-technique document (UTF-8 text, one statement per line)
    #[serde(default = "default_sales_path")]
    pub sales_path: PathBuf,

    /// Embedding model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Directory for downloaded model files; fastembed's default when unset
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,

    /// Default number of results per search
    #[serde(default = "default_top_k")]
    pub top_k: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: default_catalog_path(),
            sales_path: default_sales_path(),
            model: default_model(),
            cache_dir: None,
            top_k: DEFAULT_TOP_K,
        }
    }
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOG_PATH)
}

fn default_sales_path() -> PathBuf {
    PathBuf::from(DEFAULT_SALES_PATH)
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}
