//! Configuration loading from TOML files

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use curata_arxiv::FeedSettings;
use curata_pipeline::PipelineConfig;
use curata_scholar::EnrichmentSettings;
use serde::Deserialize;

/// Global configuration for curata
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub feed: FeedConfig,
    pub s2: S2Config,
    pub storage: StorageConfig,
    pub pipeline: PipelineSection,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub base_url: String,
    pub search_query: String,
    pub page_size: usize,
    pub page_delay_secs: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: "http://export.arxiv.org/api/query".to_string(),
            search_query: "cat:cs.*".to_string(),
            page_size: 100,
            page_delay_secs: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct S2Config {
    pub api_url: String,
    #[serde(deserialize_with = "deserialize_env_var")]
    pub api_key: Option<String>,
    pub call_delay_ms: u64,
    pub timeout_secs: u64,
}

impl Default for S2Config {
    fn default() -> Self {
        Self {
            api_url: "https://api.semanticscholar.org/graph/v1/paper/search".to_string(),
            api_key: std::env::var("S2_API_KEY").ok(),
            call_delay_ms: 500,
            timeout_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
    pub pdf_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("curata.duckdb"),
            pdf_dir: PathBuf::from("articles_pdf"),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct PipelineSection {
    pub window_days: u32,
    pub top_n: usize,
    pub min_text_len: usize,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            window_days: 1,
            top_n: 20,
            min_text_len: 500,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub max_retries: u32,
    pub feed_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            feed_timeout_secs: 30,
            download_timeout_secs: 60,
        }
    }
}

/// Deserialize a string that may contain an environment variable reference like ${VAR}
fn deserialize_env_var<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| expand_env_var(&s)))
}

/// Expand ${VAR} to the environment variable value
fn expand_env_var(s: &str) -> Option<String> {
    if let Some(var_name) = s.strip_prefix("${").and_then(|s| s.strip_suffix('}')) {
        std::env::var(var_name).ok()
    } else {
        Some(s.to_string())
    }
}

impl Config {
    /// Load configuration from default locations
    ///
    /// Search order:
    /// 1. ./curata.toml (current directory)
    /// 2. ~/.config/curata/config.toml
    ///
    /// If no config file is found, returns the defaults.
    pub fn load() -> Result<Self> {
        let local_config = PathBuf::from("curata.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = directories::ProjectDirs::from("", "", "curata") {
            let user_config = config_dir.config_dir().join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        log::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Assemble the pipeline-facing configuration.
    pub fn to_pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            window_days: self.pipeline.window_days,
            top_n: self.pipeline.top_n,
            min_text_len: self.pipeline.min_text_len,
            pdf_dir: self.storage.pdf_dir.clone(),
            download_timeout: Duration::from_secs(self.http.download_timeout_secs),
            feed: FeedSettings {
                base_url: self.feed.base_url.clone(),
                search_query: self.feed.search_query.clone(),
                page_size: self.feed.page_size,
                page_delay: Duration::from_secs(self.feed.page_delay_secs),
                timeout: Duration::from_secs(self.http.feed_timeout_secs),
            },
            enrichment: EnrichmentSettings {
                api_url: self.s2.api_url.clone(),
                call_delay: Duration::from_millis(self.s2.call_delay_ms),
                timeout: Duration::from_secs(self.s2.timeout_secs),
            },
        }
    }
}
