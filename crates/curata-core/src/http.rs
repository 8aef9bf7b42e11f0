//! Resilient HTTP client: shared async reqwest behind a sync facade.
//!
//! The pipeline is strictly sequential, so requests are issued one at a time
//! through a shared tokio runtime. Idempotent GETs are retried with
//! exponential backoff on transient status codes; everything else surfaces
//! the error to the caller.

use std::sync::LazyLock;
use std::time::Duration;

/// Connect timeout for all requests
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Status codes treated as transient for idempotent requests
const TRANSIENT_STATUS: [u16; 5] = [429, 500, 502, 503, 504];

/// Error from an HTTP request.
///
/// `status` is `None` for transport-level failures (connect error, timeout)
/// that never produced a response.
#[derive(Debug)]
pub struct HttpError {
    pub status: Option<u16>,
    pub message: String,
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(s) => write!(f, "HTTP {s}: {}", self.message),
            None => write!(f, "HTTP error: {}", self.message),
        }
    }
}

impl std::error::Error for HttpError {}

impl HttpError {
    /// Create HTTP error from reqwest error
    pub fn from_reqwest(e: &reqwest::Error) -> Self {
        Self {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        }
    }

    /// Whether retrying an idempotent request can plausibly succeed.
    ///
    /// Transport errors without a status are transient; anything with a
    /// status outside [`TRANSIENT_STATUS`] is not.
    pub fn is_transient(&self) -> bool {
        match self.status {
            Some(s) => TRANSIENT_STATUS.contains(&s),
            None => true,
        }
    }
}

/// Shared async HTTP client with connection pooling.
static SHARED_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(4)
        .build()
        .expect("failed to build HTTP client")
});

/// Get shared HTTP client.
pub fn http_client() -> &'static reqwest::Client {
    &SHARED_CLIENT
}

/// Shared tokio runtime for HTTP operations.
pub static SHARED_RUNTIME: LazyLock<tokio::runtime::Runtime> = LazyLock::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
});

/// Exponential backoff: 2^attempt seconds (1s, 2s, 4s, ...)
pub const fn backoff_duration(attempt: u32) -> Duration {
    Duration::from_secs(2u64.pow(attempt))
}

/// HTTP client with a retry budget and stable identity headers.
///
/// Only idempotent GETs are exposed, so every request that goes through here
/// is safe to retry. Non-idempotent methods have no retry path.
#[derive(Debug, Clone)]
pub struct HttpClient {
    user_agent: String,
    api_key: Option<String>,
    max_retries: u32,
}

impl HttpClient {
    pub fn new(user_agent: impl Into<String>, api_key: Option<String>, max_retries: u32) -> Self {
        Self {
            user_agent: user_agent.into(),
            api_key,
            max_retries,
        }
    }

    /// GET returning the response body as text.
    pub fn get(
        &self,
        url: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<String, HttpError> {
        self.with_retry(url, || {
            SHARED_RUNTIME.handle().block_on(async {
                let resp = self
                    .request(url, params, timeout)
                    .send()
                    .await?
                    .error_for_status()?;
                resp.text().await
            })
        })
    }

    /// GET returning the raw response body (document downloads).
    pub fn get_bytes(&self, url: &str, timeout: Duration) -> Result<Vec<u8>, HttpError> {
        self.with_retry(url, || {
            SHARED_RUNTIME.handle().block_on(async {
                let resp = self
                    .request(url, &[], timeout)
                    .send()
                    .await?
                    .error_for_status()?;
                Ok(resp.bytes().await?.to_vec())
            })
        })
    }

    fn request(
        &self,
        url: &str,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> reqwest::RequestBuilder {
        let mut req = http_client()
            .get(url)
            .timeout(timeout)
            .header(reqwest::header::USER_AGENT, self.user_agent.as_str());
        if let Some(key) = &self.api_key {
            req = req.header("x-api-key", key.as_str());
        }
        if !params.is_empty() {
            req = req.query(params);
        }
        req
    }

    /// Run a request up to `max_retries + 1` times, backing off on
    /// transient failures. Exhaustion returns the last error.
    fn with_retry<T>(
        &self,
        url: &str,
        mut attempt_fn: impl FnMut() -> Result<T, reqwest::Error>,
    ) -> Result<T, HttpError> {
        let mut attempt = 0u32;
        loop {
            match attempt_fn() {
                Ok(v) => return Ok(v),
                Err(e) => {
                    let err = HttpError::from_reqwest(&e);
                    if attempt < self.max_retries && err.is_transient() {
                        log::debug!(
                            "GET {url}: attempt {}/{} failed: {err}, retrying...",
                            attempt + 1,
                            self.max_retries
                        );
                        std::thread::sleep(backoff_duration(attempt));
                        attempt += 1;
                    } else {
                        return Err(err);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http_err(status: u16) -> HttpError {
        HttpError {
            status: Some(status),
            message: "test".to_string(),
        }
    }

    #[test]
    fn backoff_exponential_from_one_second() {
        assert_eq!(backoff_duration(0), Duration::from_secs(1));
        assert_eq!(backoff_duration(1), Duration::from_secs(2));
        assert_eq!(backoff_duration(2), Duration::from_secs(4));
    }

    #[test]
    fn http_429_transient() {
        assert!(http_err(429).is_transient());
    }

    #[test]
    fn http_5xx_transient() {
        assert!(http_err(500).is_transient());
        assert!(http_err(502).is_transient());
        assert!(http_err(503).is_transient());
        assert!(http_err(504).is_transient());
    }

    #[test]
    fn http_404_not_transient() {
        assert!(!http_err(404).is_transient());
    }

    #[test]
    fn http_501_not_transient() {
        // Only the fixed transient set is retried, not all of 5xx
        assert!(!http_err(501).is_transient());
    }

    #[test]
    fn http_none_status_transient() {
        // Transport error without status code (connection refused, timeout)
        let err = HttpError {
            status: None,
            message: "connection refused".to_string(),
        };
        assert!(err.is_transient());
    }

    #[test]
    fn display_with_status() {
        assert_eq!(format!("{}", http_err(404)), "HTTP 404: test");
    }

    #[test]
    fn display_without_status() {
        let err = HttpError {
            status: None,
            message: "timeout".to_string(),
        };
        assert_eq!(format!("{err}"), "HTTP error: timeout");
    }
}
