//! Curata Core - Common infrastructure for the preprint curation pipeline
//!
//! This crate provides the resilient HTTP client, cooperative shutdown flag,
//! logging and progress reporting shared by the collection, enrichment and
//! acquisition phases.

pub mod http;
pub mod logging;
pub mod progress;
pub mod shutdown;

// Re-exports for convenience
pub use http::{HttpClient, HttpError, SHARED_RUNTIME, http_client};
pub use logging::{ProgressLogger, init_logging};
pub use progress::{ProgressContext, SharedProgress, fmt_num};
pub use shutdown::{is_shutdown_requested, request_shutdown, shutdown_flag};
