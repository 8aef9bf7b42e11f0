//! Candidate paper record collected from the feed

use chrono::NaiveDate;

/// Paper metadata collected from the feed, not yet persisted.
///
/// `score` starts at 0 and is attached during enrichment; a candidate that
/// survives ranking becomes a winner with no structural change.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// arXiv identifier (`2401.12345v1` style), stable across runs
    pub arxiv_id: String,
    pub title: String,
    pub abstract_text: String,
    /// Author names in listing order
    pub authors: Vec<String>,
    pub published: NaiveDate,
    /// Abstract page URL
    pub page_url: String,
    /// Document (PDF) URL — explicit feed link or derived from `page_url`
    pub pdf_url: String,
    /// Raw category tags as listed in the feed (`cs.AI`, `cs.LG`, ...)
    pub tags: Vec<String>,
    /// Relevance score, attached during enrichment (0 = no signal)
    pub score: f64,
}
