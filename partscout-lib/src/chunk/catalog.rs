use std::collections::BTreeMap;

use crate::chunk::{CatalogItem, Chunk, Chunker, Source};
use crate::{Error, Result};

const COL_ID: &str = "ID";
const COL_NAME: &str = "Название детали";
const COL_MODELS: &str = "Совместимость моделей";
const COL_ORIGINAL: &str = "Оригинал";
const COL_PRICE: &str = "Цена (₽)";
const COL_ARTICLE: &str = "Артикул";

/// Columns the catalog must carry, in the order they appear in chunk text
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_ID,
    COL_NAME,
    COL_MODELS,
    COL_ORIGINAL,
    COL_PRICE,
    COL_ARTICLE,
];

/// Catalog chunker - one chunk per CSV row
///
/// Rows are neither filtered nor deduplicated. Every field is interpolated
/// verbatim into a fixed sentence so the embedding sees all of them.
pub struct CatalogChunker;

impl Chunker for CatalogChunker {
    fn name(&self) -> &str {
        "catalog"
    }

    fn chunk(&self, content: &str, offset: usize) -> Result<Vec<Chunk>> {
        let mut reader = csv::Reader::from_reader(content.as_bytes());
        let headers = reader.headers()?.clone();

        // locate required columns by header name
        let mut columns = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| Error::Catalog(format!("missing required column `{name}`")))?;
        }

        let mut chunks = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let field = |i: usize| -> Result<String> {
                record
                    .get(columns[i])
                    .map(str::to_string)
                    .ok_or_else(|| Error::Catalog(format!("row {}: missing `{}`", row + 1, REQUIRED_COLUMNS[i])))
            };

            let extra: BTreeMap<String, String> = headers
                .iter()
                .zip(record.iter())
                .enumerate()
                .filter(|(i, _)| !columns.contains(i))
                .map(|(_, (h, v))| (h.to_string(), v.to_string()))
                .collect();

            let item = CatalogItem {
                id: field(0)?,
                name: field(1)?,
                models: field(2)?,
                original: field(3)?,
                price: field(4)?,
                article: field(5)?,
                extra,
            };

            chunks.push(Chunk {
                position: offset + chunks.len(),
                text: catalog_text(&item),
                source: Source::CatalogItem(item),
            });
        }

        Ok(chunks)
    }
}

/// Render the sentence that represents a catalog row in the index.
#[must_use]
pub fn catalog_text(item: &CatalogItem) -> String {
    let kind = if item.is_original() { "Оригинал" } else { "Аналог" };
    format!(
        "ID: {}. Название: {}. Совместимость: {}. Тип: {kind}. Цена: {} руб. Артикул: {}.",
        item.id, item.name, item.models, item.price, item.article
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "ID,Название детали,Совместимость моделей,Оригинал,Цена (₽),Артикул";

    fn chunk(content: &str) -> Result<Vec<Chunk>> {
        CatalogChunker.chunk(content, 0)
    }

    #[test]
    fn test_original_item_text() {
        let content = format!("{HEADER}\n101,Моторчик омывателя,\"Golf 6, Гольф VI\",Да,1200,1K6955119\n");
        let chunks = chunk(&content).unwrap();

        assert_eq!(chunks.len(), 1);
        assert_eq!(
            chunks[0].text,
            "ID: 101. Название: Моторчик омывателя. Совместимость: Golf 6, Гольф VI. Тип: Оригинал. Цена: 1200 руб. Артикул: 1K6955119."
        );
    }

    #[test]
    fn test_non_original_is_analog() {
        let content = format!("{HEADER}\n7,Фонарь,Passat B7,Нет,4500,X1\n8,Фонарь,Passat B7,да,4600,X2\n");
        let chunks = chunk(&content).unwrap();

        assert!(chunks[0].text.contains("Тип: Аналог."));
        // only the exact literal counts as original
        assert!(chunks[1].text.contains("Тип: Аналог."));
    }

    #[test]
    fn test_rows_kept_in_order_without_dedup() {
        let content = format!("{HEADER}\n1,A,M,Да,10,X\n1,A,M,Да,10,X\n2,B,M,Нет,20,Y\n");
        let chunks = chunk(&content).unwrap();

        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].text, chunks[1].text);
        assert!(chunks[2].text.starts_with("ID: 2."));
    }

    #[test]
    fn test_offset_assigns_positions() {
        let content = format!("{HEADER}\n1,A,M,Да,10,X\n2,B,M,Нет,20,Y\n");
        let chunks = CatalogChunker.chunk(&content, 10).unwrap();

        assert_eq!(chunks[0].position, 10);
        assert_eq!(chunks[1].position, 11);
    }

    #[test]
    fn test_source_keeps_raw_fields() {
        let content = format!("{HEADER},Склад\n101,Моторчик омывателя,Golf 6,Да,1200,1K6955119,Москва\n");
        let chunks = chunk(&content).unwrap();

        let Source::CatalogItem(item) = &chunks[0].source else {
            panic!("expected catalog item");
        };
        assert_eq!(item.id, "101");
        assert_eq!(item.article, "1K6955119");
        assert!(item.is_original());
        assert_eq!(item.extra.get("Склад").map(String::as_str), Some("Москва"));
        assert!(!chunks[0].text.contains("Москва"));
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let content = "Артикул,Цена (₽),Оригинал,Совместимость моделей,Название детали,ID\nX,10,Да,M,A,1\n";
        let chunks = chunk(content).unwrap();

        assert_eq!(
            chunks[0].text,
            "ID: 1. Название: A. Совместимость: M. Тип: Оригинал. Цена: 10 руб. Артикул: X."
        );
    }

    #[test]
    fn test_missing_column_fails() {
        let content = "ID,Название детали,Совместимость моделей,Оригинал,Артикул\n1,A,M,Да,X\n";
        let err = chunk(content).unwrap_err();

        assert!(matches!(err, Error::Catalog(msg) if msg.contains("Цена (₽)")));
    }

    #[test]
    fn test_malformed_row_fails() {
        let content = format!("{HEADER}\n1,A,M,Да,10\n");
        assert!(matches!(chunk(&content), Err(Error::Catalog(_))));
    }

    #[test]
    fn test_header_only() {
        let content = format!("{HEADER}\n");
        assert!(chunk(&content).unwrap().is_empty());
    }
}
