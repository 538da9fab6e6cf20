use crate::chunk::{Chunk, Chunker, SalesTip, Source};
use crate::Result;

/// Sales-book chunker - one chunk per statement line
///
/// A line ending in `:` is a section header: it becomes the category of the
/// lines that follow and produces no chunk itself. Blank lines are skipped
/// and leave the current category alone.
pub struct SalesBookChunker;

impl Chunker for SalesBookChunker {
    fn name(&self) -> &str {
        "sales_book"
    }

    fn chunk(&self, content: &str, offset: usize) -> Result<Vec<Chunk>> {
        let mut chunks = Vec::new();
        let mut category = String::new();

        // a lone '\r' also ends a line; the empty piece inside "\r\n" is skipped as blank
        for line in content.split(['\n', '\r']) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(header) = line.strip_suffix(':') {
                category = header.to_string();
                continue;
            }

            chunks.push(Chunk {
                position: offset + chunks.len(),
                text: tip_text(&category, line),
                source: Source::SalesTip(SalesTip {
                    raw_line: line.to_string(),
                    category: category.clone(),
                }),
            });
        }

        Ok(chunks)
    }
}

/// Render the sentence that represents a sales tip in the index.
#[must_use]
pub fn tip_text(category: &str, line: &str) -> String {
    format!("Совет по продажам ({category}): {line}")
}
