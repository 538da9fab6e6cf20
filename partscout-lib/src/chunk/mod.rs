//! Corpus loading and chunking
//!
//! The knowledge base comes from two differently shaped sources:
//! - Product catalog: one CSV row becomes one chunk
//! - Sales book: one statement line becomes one chunk, tagged with the
//!   most recent section header
//!
//! Both end up as [`Chunk`]s whose [`Source`] records where they came from.
//! Catalog chunks always come first, then sales tips, each in file order.
//!
//! # Usage
//!
//! ```ignore
//! use partscout_lib::chunk;
//!
//! let chunks = chunk::load("data/catalog.csv", "data/sales_book.txt")?;
//! for c in &chunks {
//!     println!("{} [{}] {}", c.position, c.source.kind(), c.text);
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{Error, Result};

/// A unit of retrievable text with its provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Row number in the vector index (0-based, contiguous, load order)
    pub position: usize,
    /// The text that is embedded and shown in results
    pub text: String,
    /// Where this chunk came from
    pub source: Source,
}

/// Provenance of a chunk
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Source {
    CatalogItem(CatalogItem),
    SalesTip(SalesTip),
}

impl Source {
    /// Short label for the source type
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Source::CatalogItem(_) => "catalog_item",
            Source::SalesTip(_) => "sales_tip",
        }
    }
}

/// One catalog row, fields kept verbatim as they appeared in the file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    /// Compatible vehicle models, free text (may mix "Golf 6" and "Гольф VI")
    pub models: String,
    /// Raw originality flag; `"Да"` means an original part
    pub original: String,
    pub price: String,
    /// Manufacturer article code
    pub article: String,
    /// Any columns beyond the required ones
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl CatalogItem {
    /// Whether the row is an original part rather than an aftermarket equivalent.
    #[must_use]
    pub fn is_original(&self) -> bool {
        self.original == ORIGINAL_FLAG
    }
}

/// One statement from the sales book
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SalesTip {
    /// The trimmed source line
    pub raw_line: String,
    /// Nearest preceding section header without its colon, or empty
    pub category: String,
}

/// Literal value of the originality column that marks an original part
pub const ORIGINAL_FLAG: &str = "Да";

/// Trait for turning one source document into chunks
pub trait Chunker: Send + Sync {
    /// Split content into chunks
    ///
    /// # Arguments
    /// * `content` - The full text of the source document
    /// * `offset` - Position assigned to the first produced chunk
    fn chunk(&self, content: &str, offset: usize) -> Result<Vec<Chunk>>;

    /// Returns the name of this source type
    fn name(&self) -> &str;
}

/// Load both sources and return every chunk in index order.
///
/// Fails if either file cannot be read, the catalog is malformed, or the two
/// sources together yield no chunks.
pub fn load(catalog_path: impl AsRef<Path>, sales_path: impl AsRef<Path>) -> Result<Vec<Chunk>> {
    let catalog = read_source(catalog_path.as_ref())?;
    let sales = read_source(sales_path.as_ref())?;

    let sources: [(&dyn Chunker, &str); 2] = [(&CatalogChunker, &catalog), (&SalesBookChunker, &sales)];

    let mut chunks = Vec::new();
    for (chunker, content) in sources {
        let produced = chunker.chunk(content, chunks.len())?;
        info!(source = chunker.name(), chunks = produced.len(), "source chunked");
        chunks.extend(produced);
    }
    info!(total = chunks.len(), "corpus loaded");

    if chunks.is_empty() {
        return Err(Error::EmptyCorpus);
    }
    Ok(chunks)
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

mod catalog;
mod sales;

pub use catalog::*;
pub use sales::*;

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    const CATALOG: &str = "\
ID,Название детали,Совместимость моделей,Оригинал,Цена (₽),Артикул
101,Моторчик омывателя,\"Golf 6, Гольф VI\",Да,1200,1K6955119
102,Задний фонарь,Passat B7,Нет,4500,3AF945095
";

    const SALES: &str = "\
Работа с возражениями:
Слушайте внимательно клиента.

Закрытие сделки:
Предложите оформить заказ.
";

    fn write_sources(catalog: &str, sales: &str) -> (tempfile::TempDir, std::path::PathBuf, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("catalog.csv");
        let sales_path = dir.path().join("sales_book.txt");
        fs::write(&catalog_path, catalog).unwrap();
        fs::write(&sales_path, sales).unwrap();
        (dir, catalog_path, sales_path)
    }

    #[test]
    fn test_load_orders_catalog_before_sales() {
        let (_dir, catalog, sales) = write_sources(CATALOG, SALES);
        let chunks = load(&catalog, &sales).unwrap();

        assert_eq!(chunks.len(), 4);
        let kinds: Vec<_> = chunks.iter().map(|c| c.source.kind()).collect();
        assert_eq!(kinds, ["catalog_item", "catalog_item", "sales_tip", "sales_tip"]);
    }

    #[test]
    fn test_load_positions_are_contiguous() {
        let (_dir, catalog, sales) = write_sources(CATALOG, SALES);
        let chunks = load(&catalog, &sales).unwrap();

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.position, i);
        }
    }

    #[test]
    fn test_load_chunk_count_invariant() {
        let (_dir, catalog, sales) = write_sources(CATALOG, SALES);
        let chunks = load(&catalog, &sales).unwrap();

        // 2 catalog rows + 2 non-header, non-blank sales lines
        assert_eq!(chunks.len(), 2 + 2);
    }

    #[test]
    fn test_load_empty_sources_fails() {
        let header_only = "ID,Название детали,Совместимость моделей,Оригинал,Цена (₽),Артикул\n";
        let (_dir, catalog, sales) = write_sources(header_only, "\n\n");

        assert!(matches!(load(&catalog, &sales), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn test_load_only_sales_tips() {
        let header_only = "ID,Название детали,Совместимость моделей,Оригинал,Цена (₽),Артикул\n";
        let (_dir, catalog, sales) = write_sources(header_only, SALES);
        let chunks = load(&catalog, &sales).unwrap();

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].position, 0);
    }

    #[test]
    fn test_load_missing_file() {
        let (dir, catalog, _sales) = write_sources(CATALOG, SALES);
        let missing = dir.path().join("nope.txt");

        match load(&catalog, &missing) {
            Err(Error::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected io error, got {other:?}"),
        }
    }

    #[test]
    fn test_chunker_names() {
        assert_eq!(CatalogChunker.name(), "catalog");
        assert_eq!(SalesBookChunker.name(), "sales_book");
    }

    #[test]
    fn test_source_kind() {
        let item = Source::CatalogItem(CatalogItem::default());
        let tip = Source::SalesTip(SalesTip::default());
        assert_eq!(item.kind(), "catalog_item");
        assert_eq!(tip.kind(), "sales_tip");
    }
}
