//! Pipeline run configuration

use std::path::PathBuf;
use std::time::Duration;

use curata_arxiv::FeedSettings;
use curata_scholar::EnrichmentSettings;

/// Everything one curation run needs besides the store handle.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Trailing collection window in days
    pub window_days: u32,
    /// Winners to select per run
    pub top_n: usize,
    /// Minimum extracted-text length (chars) for a document to be kept
    pub min_text_len: usize,
    /// Local document cache directory
    pub pdf_dir: PathBuf,
    /// Per-document download timeout
    pub download_timeout: Duration,
    pub feed: FeedSettings,
    pub enrichment: EnrichmentSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            window_days: 1,
            top_n: 20,
            min_text_len: 500,
            pdf_dir: PathBuf::from("articles_pdf"),
            download_timeout: Duration::from_secs(60),
            feed: FeedSettings::default(),
            enrichment: EnrichmentSettings::default(),
        }
    }
}
