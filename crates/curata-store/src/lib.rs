//! curata-store: durable article persistence
//!
//! Single-connection embedded store with idempotent, per-row transactional
//! inserts. The curation core exclusively owns row creation; downstream
//! consumers advance `processing_status` and fill the generated text.

pub mod article;
pub mod store;

pub use article::{Article, ProcessingStatus};
pub use store::Store;
