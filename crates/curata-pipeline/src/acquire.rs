//! Document acquisition and idempotent persistence
//!
//! Each winner is processed in selection order: cached-or-downloaded PDF,
//! text extraction with a minimum-length content gate, tag→keyword mapping,
//! and an insert in its own transaction. Every failure is isolated to the
//! winner that caused it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use curata_arxiv::{Candidate, map_keywords};
use curata_core::{HttpClient, is_shutdown_requested};
use curata_store::{Article, ProcessingStatus, Store};
use indicatif::ProgressBar;

use crate::config::PipelineConfig;
use crate::pdf;

/// What happened to one winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// Row written with status `parsed`
    Persisted,
    /// Conflict no-op — identifier already in the store
    AlreadyPersisted,
    /// Download failed after retries; nothing cached, nothing persisted
    DownloadFailed,
    /// Extraction failed or text below the minimum; cached file discarded
    RejectedContent,
    /// Unexpected persistence error; transaction rolled back
    Failed,
}

/// Per-batch acquisition counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AcquireStats {
    pub persisted: usize,
    pub duplicates: usize,
    pub download_failures: usize,
    pub rejected_content: usize,
    pub persist_errors: usize,
    /// Interrupt was requested; the loop halted before the next winner
    pub interrupted: bool,
}

impl AcquireStats {
    fn record(&mut self, outcome: AcquireOutcome) {
        match outcome {
            AcquireOutcome::Persisted => self.persisted += 1,
            AcquireOutcome::AlreadyPersisted => self.duplicates += 1,
            AcquireOutcome::DownloadFailed => self.download_failures += 1,
            AcquireOutcome::RejectedContent => self.rejected_content += 1,
            AcquireOutcome::Failed => self.persist_errors += 1,
        }
    }
}

/// Downloads, validates and persists winners.
pub struct Acquirer<'a> {
    client: &'a HttpClient,
    pdf_dir: PathBuf,
    min_text_len: usize,
    download_timeout: Duration,
}

impl<'a> Acquirer<'a> {
    /// Create the acquirer, ensuring the document cache directory exists.
    pub fn new(client: &'a HttpClient, config: &PipelineConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.pdf_dir).with_context(|| {
            format!("cannot create PDF cache dir {}", config.pdf_dir.display())
        })?;
        Ok(Self {
            client,
            pdf_dir: config.pdf_dir.clone(),
            min_text_len: config.min_text_len,
            download_timeout: config.download_timeout,
        })
    }

    /// Deterministic cache path for an identifier (old-style ids contain `/`).
    pub fn pdf_path(&self, arxiv_id: &str) -> PathBuf {
        self.pdf_dir.join(format!("{}.pdf", arxiv_id.replace('/', "_")))
    }

    /// Acquire and persist one winner. Never propagates a per-winner error —
    /// unexpected failures roll back that winner's transaction, get logged,
    /// and map to [`AcquireOutcome::Failed`].
    pub fn acquire_one(&self, store: &mut Store, winner: &Candidate) -> AcquireOutcome {
        match self.try_acquire(store, winner) {
            Ok(outcome) => outcome,
            Err(e) => {
                log::error!("{}: persistence failed: {e:#}", winner.arxiv_id);
                AcquireOutcome::Failed
            }
        }
    }

    fn try_acquire(&self, store: &mut Store, winner: &Candidate) -> Result<AcquireOutcome> {
        let path = self.pdf_path(&winner.arxiv_id);

        if path.exists() {
            log::debug!("{}: using cached document", winner.arxiv_id);
        } else {
            let bytes = match self.client.get_bytes(&winner.pdf_url, self.download_timeout) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("{}: download failed: {e}", winner.arxiv_id);
                    return Ok(AcquireOutcome::DownloadFailed);
                }
            };
            std::fs::write(&path, &bytes)
                .with_context(|| format!("cannot write {}", path.display()))?;
        }

        let text = match pdf::extract_text(&path) {
            Ok(text) => text,
            Err(e) => {
                log::warn!("{}: unreadable document, discarding: {e:#}", winner.arxiv_id);
                discard_document(&path);
                return Ok(AcquireOutcome::RejectedContent);
            }
        };
        if text.chars().count() < self.min_text_len {
            log::warn!(
                "{}: extracted text under {} chars, discarding",
                winner.arxiv_id,
                self.min_text_len
            );
            discard_document(&path);
            return Ok(AcquireOutcome::RejectedContent);
        }

        let keywords = map_keywords(&winner.tags);
        let article = Article {
            id: winner.arxiv_id.clone(),
            title: strip_nulls(&winner.title),
            authors: winner.authors.iter().map(|a| strip_nulls(a)).collect(),
            publication_date: winner.published,
            abstract_text: strip_nulls(&winner.abstract_text),
            keywords: keywords.iter().map(|k| strip_nulls(k)).collect(),
            full_text: strip_nulls(&text),
            source_url: winner.page_url.clone(),
            original_pdf_path: path.display().to_string(),
            processing_status: ProcessingStatus::Parsed,
            relevance_score: Some(winner.score),
        };

        if store.insert_article(&article)? {
            log::info!("{}: persisted (score {:.1})", winner.arxiv_id, winner.score);
            Ok(AcquireOutcome::Persisted)
        } else {
            log::debug!("{}: already persisted, conflict no-op", winner.arxiv_id);
            Ok(AcquireOutcome::AlreadyPersisted)
        }
    }
}

/// Acquire all winners in selection order, checking the shutdown flag
/// between winners — never inside one winner's download/extract/insert
/// sequence, so an interrupt always lands on a clean row boundary.
pub fn acquire_batch(
    acquirer: &Acquirer,
    store: &mut Store,
    winners: &[Candidate],
    pb: &ProgressBar,
) -> AcquireStats {
    let mut stats = AcquireStats::default();
    for winner in winners {
        if is_shutdown_requested() {
            log::warn!("interrupt requested, halting before next winner");
            stats.interrupted = true;
            break;
        }
        pb.set_message(truncate(&winner.title, 60));
        stats.record(acquirer.acquire_one(store, winner));
        pb.inc(1);
    }
    stats
}

/// Remove a cached document that failed content validation.
fn discard_document(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        log::warn!("cannot remove {}: {e}", path.display());
    }
}

/// The persistence layer rejects NUL bytes; this is the only
/// character-encoding normalization applied.
fn strip_nulls(s: &str) -> String {
    s.replace('\0', "")
}

fn truncate(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}
