//! Relevance scoring from bibliometric signals
//!
//! Pure function, no I/O. Citation terms are logarithmic so a single
//! hyper-cited author cannot crowd out papers by several solid mid-career
//! authors; h-index stays linear because it is already a compressed,
//! slow-moving signal.

use crate::client::PaperSignals;

const PAPER_CITATION_WEIGHT: f64 = 10.0;
const AUTHOR_CITATION_WEIGHT: f64 = 5.0;
const H_INDEX_WEIGHT: f64 = 0.5;

/// Score matched signals.
///
/// Author terms take the maximum over the matched authors; absent authors or
/// fields contribute 0. Candidates without any enrichment match score 0 at
/// the call site — absence of external validation is a low signal, not an
/// error.
pub fn relevance_score(signals: &PaperSignals) -> f64 {
    let max_author_citations = signals
        .authors
        .iter()
        .map(|a| a.citation_count)
        .max()
        .unwrap_or(0);
    let max_author_h_index = signals.authors.iter().map(|a| a.h_index).max().unwrap_or(0);

    PAPER_CITATION_WEIGHT * (signals.citation_count as f64).ln_1p()
        + AUTHOR_CITATION_WEIGHT * (max_author_citations as f64).ln_1p()
        + H_INDEX_WEIGHT * max_author_h_index as f64
}
