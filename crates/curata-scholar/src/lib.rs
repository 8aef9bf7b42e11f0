//! curata-scholar: bibliometric enrichment via the Semantic Scholar Graph API
//!
//! One search call per candidate title, a strict title-prefix acceptance
//! heuristic, and a pure scoring function over the returned signals. Every
//! lookup failure degrades to "no signal" — enrichment is never fatal.

pub mod client;
pub mod score;

pub use client::{AuthorSignals, EnrichmentClient, EnrichmentSettings, PaperSignals, title_matches};
pub use score::relevance_score;
