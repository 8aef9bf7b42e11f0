//! Semantic Scholar paper-search client

use std::time::Duration;

use curata_core::HttpClient;
use serde::{Deserialize, Deserializer};

/// Fields requested from the search endpoint
const SEARCH_FIELDS: &str =
    "title,authors.name,authors.hIndex,authors.citationCount,citationCount";

/// Prefix length for the title acceptance heuristic
const TITLE_MATCH_PREFIX: usize = 30;

/// Enrichment endpoint settings.
#[derive(Debug, Clone)]
pub struct EnrichmentSettings {
    pub api_url: String,
    /// Fixed delay before every call, to respect third-party rate limits
    pub call_delay: Duration,
    /// Per-call timeout
    pub timeout: Duration,
}

impl Default for EnrichmentSettings {
    fn default() -> Self {
        Self {
            api_url: "https://api.semanticscholar.org/graph/v1/paper/search".to_string(),
            call_delay: Duration::from_millis(500),
            timeout: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<PaperSignals>,
}

/// Bibliometric signals for one matched paper.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaperSignals {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "citationCount", default, deserialize_with = "null_as_zero")]
    pub citation_count: u64,
    #[serde(default)]
    pub authors: Vec<AuthorSignals>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorSignals {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "hIndex", default, deserialize_with = "null_as_zero")]
    pub h_index: u64,
    #[serde(rename = "citationCount", default, deserialize_with = "null_as_zero")]
    pub citation_count: u64,
}

/// The API reports unknown metrics as explicit nulls
fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

/// Looks up bibliometric signals for a candidate by title.
pub struct EnrichmentClient<'a> {
    client: &'a HttpClient,
    settings: EnrichmentSettings,
}

impl<'a> EnrichmentClient<'a> {
    pub fn new(client: &'a HttpClient, settings: EnrichmentSettings) -> Self {
        Self { client, settings }
    }

    /// One search call for a candidate title.
    ///
    /// Any failure — timeout, non-2xx after retries, unparseable body, no
    /// result, heuristic rejection — degrades to `None`. The pipeline treats
    /// absence of external validation as a legitimate zero signal, never as
    /// an error.
    pub fn lookup(&self, title: &str) -> Option<PaperSignals> {
        std::thread::sleep(self.settings.call_delay);

        let params = [
            ("query", title.to_string()),
            ("fields", SEARCH_FIELDS.to_string()),
            ("limit", "1".to_string()),
        ];
        let body = match self
            .client
            .get(&self.settings.api_url, &params, self.settings.timeout)
        {
            Ok(body) => body,
            Err(e) => {
                log::debug!("enrichment lookup failed for {title:?}: {e}");
                return None;
            }
        };

        let resp: SearchResponse = match serde_json::from_str(&body) {
            Ok(resp) => resp,
            Err(e) => {
                log::debug!("enrichment response rejected for {title:?}: {e}");
                return None;
            }
        };

        let paper = resp.data.into_iter().next()?;
        if !title_matches(title, &paper.title) {
            log::debug!(
                "enrichment match rejected for {title:?} (returned {:?})",
                paper.title
            );
            return None;
        }
        Some(paper)
    }
}

/// Acceptance heuristic: the lowercased first 30 characters of the returned
/// title must appear as a substring of the lowercased queried title. Guards
/// against false joins on ambiguous or generic titles.
pub fn title_matches(queried: &str, returned: &str) -> bool {
    let prefix: String = returned.to_lowercase().chars().take(TITLE_MATCH_PREFIX).collect();
    if prefix.is_empty() {
        return false;
    }
    queried.to_lowercase().contains(&prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_match_exact() {
        assert!(title_matches("Attention Is All You Need", "Attention Is All You Need"));
    }

    #[test]
    fn title_match_case_insensitive() {
        assert!(title_matches("ATTENTION IS ALL YOU NEED", "attention is all you need"));
    }

    #[test]
    fn title_match_prefix_only_first_30_chars() {
        // Returned title diverges after 30 chars — still a match
        let queried = "A Comprehensive Survey of Graph Neural Networks";
        let returned = "A Comprehensive Survey of Graph-Based Learning";
        assert!(title_matches(queried, returned));
    }

    #[test]
    fn title_match_rejects_different_titles() {
        assert!(!title_matches(
            "Deep Reinforcement Learning for Robotics",
            "Quantum Error Correction Codes"
        ));
    }

    #[test]
    fn title_match_rejects_empty_returned_title() {
        assert!(!title_matches("Some Title", ""));
    }

    #[test]
    fn parse_search_response_with_nulls() {
        let body = r#"{
            "total": 1,
            "data": [{
                "title": "Example Paper",
                "citationCount": null,
                "authors": [
                    {"name": "A", "hIndex": 12, "citationCount": 3400},
                    {"name": "B", "hIndex": null, "citationCount": null}
                ]
            }]
        }"#;
        let resp: SearchResponse = serde_json::from_str(body).unwrap();
        let paper = &resp.data[0];
        assert_eq!(paper.citation_count, 0);
        assert_eq!(paper.authors[0].h_index, 12);
        assert_eq!(paper.authors[0].citation_count, 3400);
        assert_eq!(paper.authors[1].h_index, 0);
    }

    #[test]
    fn parse_search_response_empty_data() {
        let resp: SearchResponse = serde_json::from_str(r#"{"total": 0}"#).unwrap();
        assert!(resp.data.is_empty());
    }
}
