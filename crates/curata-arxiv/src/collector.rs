//! Paged candidate collection within a trailing date window

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use curata_core::HttpClient;

use crate::model::Candidate;
use crate::parser::parse_feed;

/// Feed endpoint settings.
#[derive(Debug, Clone)]
pub struct FeedSettings {
    /// Query API endpoint
    pub base_url: String,
    /// Category filter passed as `search_query` (e.g. `cat:cs.*`)
    pub search_query: String,
    /// Entries per page request
    pub page_size: usize,
    /// Polite delay between successive page requests
    pub page_delay: Duration,
    /// Per-page request timeout
    pub timeout: Duration,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            base_url: "http://export.arxiv.org/api/query".to_string(),
            search_query: "cat:cs.*".to_string(),
            page_size: 100,
            page_delay: Duration::from_secs(3),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Collects candidates from the feed in descending-submission-date pages.
pub struct FeedCollector<'a> {
    client: &'a HttpClient,
    settings: FeedSettings,
}

impl<'a> FeedCollector<'a> {
    pub fn new(client: &'a HttpClient, settings: FeedSettings) -> Self {
        Self { client, settings }
    }

    /// Fetch all candidates published within the trailing window.
    ///
    /// Pages are requested until one contains an entry older than the cutoff
    /// date (that page is still parsed in full) or the feed runs out. A fresh
    /// call re-fetches from the start; there is no mid-batch resume. Any
    /// page-level failure aborts the collection — nothing has been persisted
    /// at this point, so the whole run is safe to retry.
    pub fn collect(&self, window_days: u32) -> Result<Vec<Candidate>> {
        let cutoff = Utc::now().date_naive() - chrono::Duration::days(i64::from(window_days));
        log::info!("feed: collecting entries published on or after {cutoff}");

        let mut all: Vec<Candidate> = Vec::new();
        let mut start = 0usize;
        let mut keep_fetching = true;

        while keep_fetching {
            log::debug!(
                "feed: requesting entries {start}..{}",
                start + self.settings.page_size
            );
            let params = [
                ("search_query", self.settings.search_query.clone()),
                ("sortBy", "submittedDate".to_string()),
                ("sortOrder", "descending".to_string()),
                ("start", start.to_string()),
                ("max_results", self.settings.page_size.to_string()),
            ];

            let xml = self
                .client
                .get(&self.settings.base_url, &params, self.settings.timeout)
                .context("feed page request failed")?;
            let page = parse_feed(&xml).context("feed response rejected")?;

            if page.is_empty() {
                log::debug!("feed: end of feed reached");
                break;
            }

            for candidate in page {
                if candidate.published < cutoff {
                    // Finish this page, stop requesting further ones
                    keep_fetching = false;
                    continue;
                }
                all.push(candidate);
            }

            start += self.settings.page_size;
            if keep_fetching {
                std::thread::sleep(self.settings.page_delay);
            }
        }

        log::info!(
            "feed: {} candidates within the {window_days}-day window",
            all.len()
        );
        Ok(all)
    }
}
