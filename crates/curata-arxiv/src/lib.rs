//! curata-arxiv: candidate collection from the arXiv Atom feed
//!
//! Pages through the arXiv query API in descending submission-date order,
//! parses entries into [`Candidate`] records, and maps raw category tags to
//! human-readable keywords.

pub mod categories;
pub mod collector;
pub mod model;
pub mod parser;

pub use categories::{keyword_for, map_keywords};
pub use collector::{FeedCollector, FeedSettings};
pub use model::Candidate;
pub use parser::parse_feed;
