//! Plain-text extraction from downloaded documents

use std::path::Path;

use anyhow::{Context, Result};
use lopdf::Document;

/// Extract the text of every page of a PDF file.
///
/// Unreadable documents (truncated downloads, HTML error pages saved as
/// `.pdf`, encrypted files) fail here; the caller treats that as a content
/// rejection, not a pipeline error.
pub fn extract_text(path: &Path) -> Result<String> {
    let doc =
        Document::load(path).with_context(|| format!("cannot open PDF {}", path.display()))?;
    let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
    anyhow::ensure!(!pages.is_empty(), "PDF has no pages: {}", path.display());
    doc.extract_text(&pages)
        .with_context(|| format!("cannot extract text from {}", path.display()))
}
