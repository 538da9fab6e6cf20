use std::fmt::Write;

use crate::search::SearchResult;

/// First line of every knowledge-context block
pub const CONTEXT_HEADER: &str = "Контекст из базы знаний:";
/// Line shown in place of results when nothing was found
pub const NO_CONTEXT: &str = "Не найдено релевантной информации в базе знаний по данному запросу.";

/// Render search results as the knowledge-context block that is prepended
/// to an assistant prompt.
///
/// An empty result list renders an explicit "nothing found" line so the
/// assistant reports missing information instead of inventing it.
#[must_use]
pub fn render_context(results: &[SearchResult]) -> String {
    let mut out = format!("{CONTEXT_HEADER}\n");
    if results.is_empty() {
        out.push_str(NO_CONTEXT);
        out.push('\n');
    }
    for result in results {
        // writing to a String cannot fail
        let _ = writeln!(out, "- {}", result.text);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::{SalesTip, Source};

    fn result(text: &str) -> SearchResult {
        SearchResult {
            text: text.to_string(),
            source: Source::SalesTip(SalesTip::default()),
            distance: 0.0,
        }
    }

    #[test]
    fn test_render_results() {
        let rendered = render_context(&[result("first"), result("second")]);
        assert_eq!(rendered, "Контекст из базы знаний:\n- first\n- second\n");
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            render_context(&[]),
            "Контекст из базы знаний:\nНе найдено релевантной информации в базе знаний по данному запросу.\n"
        );
    }
}
