//! Text chunker for ingestion.
//!
//! Uses the `text-splitter` crate. Markdown files use `MarkdownSplitter` for
//! heading-aware splitting; everything else uses `TextSplitter`.

use std::path::Path;

use text_splitter::{MarkdownSplitter, TextSplitter};

/// Maximum chunk size in characters.
pub const CHUNK_SIZE: usize = 1000;

/// Split `text` into chunks of at most [`CHUNK_SIZE`] characters.
pub fn chunk_text(text: &str, is_markdown: bool) -> Vec<String> {
    if is_markdown {
        MarkdownSplitter::new(CHUNK_SIZE)
            .chunks(text)
            .map(str::to_string)
            .collect()
    } else {
        TextSplitter::new(CHUNK_SIZE)
            .chunks(text)
            .map(str::to_string)
            .collect()
    }
}

/// Whether `path` should be split as markdown.
pub fn is_markdown(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("md" | "markdown")
    )
}

/// Whether `path` is a PDF whose text layer must be extracted.
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}
