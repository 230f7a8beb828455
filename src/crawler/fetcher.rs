//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Retry with exponential backoff and jitter for transient failures
//! - Error classification (transient vs permanent)

use crate::config::{CrawlerConfig, RetryConfig, UserAgentConfig};
use async_trait::async_trait;
use rand::Rng;
use reqwest::{redirect::Policy, Client};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use url::Url;

/// Maximum redirect hops followed for a single page
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page body
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Final URL after redirects, used to resolve relative links
    pub url: Url,

    /// HTTP status code
    pub status: u16,

    /// Page body content
    pub body: String,

    /// When the request that produced this document was sent
    pub requested_at: Instant,
}

/// Why a single fetch attempt failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchCause {
    /// Non-success HTTP status
    Status(u16),

    /// Request or body read timed out
    Timeout,

    /// Connection refused, reset, or DNS failure
    Connect(String),

    /// Response could not be read as a document
    Malformed(String),

    /// Any other transport failure
    Request(String),
}

impl FetchCause {
    /// Returns true if another attempt may succeed
    ///
    /// | Condition | Transient |
    /// |-----------|-----------|
    /// | HTTP 5xx | yes |
    /// | Timeout | yes |
    /// | Connection error | yes |
    /// | Transport error | yes |
    /// | HTTP 4xx / other status | no |
    /// | Malformed response | no |
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Status(code) => (500..600).contains(code),
            Self::Timeout | Self::Connect(_) | Self::Request(_) => true,
            Self::Malformed(_) => false,
        }
    }
}

impl fmt::Display for FetchCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(code) => write!(f, "HTTP {}", code),
            Self::Timeout => write!(f, "request timeout"),
            Self::Connect(e) => write!(f, "connection failed: {}", e),
            Self::Malformed(e) => write!(f, "malformed response: {}", e),
            Self::Request(e) => write!(f, "request failed: {}", e),
        }
    }
}

/// A fetch that could not produce a document
#[derive(Debug, Clone, Error)]
#[error("Fetch failed for {url} after {attempts} attempt(s): {cause}")]
pub struct FetchError {
    /// The URL that was requested
    pub url: String,

    /// Cause of the last attempt
    pub cause: FetchCause,

    /// Number of attempts made
    pub attempts: u32,

    /// True when the failure was not retried because retrying cannot help
    pub permanent: bool,
}

/// Retrieves raw documents for the crawl controller
///
/// Implementations perform their own retry; a returned error is final.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<RawDocument, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// The user agent has the form `CrawlerName/Version (+ContactURL; ContactEmail)`.
///
/// # Example
///
/// ```no_run
/// use quote_crawler::config::{CrawlerConfig, UserAgentConfig};
/// use quote_crawler::crawler::build_http_client;
///
/// let user_agent = UserAgentConfig {
///     crawler_name: "QuoteCrawler".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
/// let crawler = CrawlerConfig {
///     seed_url: "http://quotes.toscrape.com/".to_string(),
///     politeness_interval: 1000,
///     max_pages: None,
///     request_timeout: 30,
///     connect_timeout: 10,
/// };
///
/// let client = build_http_client(&user_agent, &crawler).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(format_user_agent(user_agent))
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Formats the user agent string sent with every request
pub fn format_user_agent(config: &UserAgentConfig) -> String {
    format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    )
}

/// Computes the wait before the attempt following `attempt` (1-based)
///
/// The exponential delay `base * 2^(attempt-1)` is capped at `max_delay`, then
/// equal jitter keeps half of it fixed and randomizes the other half.
pub fn backoff_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(31);
    let delay = config
        .base_delay
        .saturating_mul(2u64.saturating_pow(exponent))
        .min(config.max_delay);

    let half = delay / 2;
    let jittered = if half == 0 {
        delay
    } else {
        delay - half + rand::thread_rng().gen_range(0..=half)
    };

    Duration::from_millis(jittered)
}

/// Fetcher backed by a reqwest client
///
/// A retry is never sent sooner than `politeness_interval` after the failed
/// attempt started, whatever the backoff says.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryConfig,
    politeness_interval: Duration,
}

impl HttpFetcher {
    pub fn new(client: Client, retry: RetryConfig, politeness_interval: Duration) -> Self {
        Self {
            client,
            retry,
            politeness_interval,
        }
    }

    /// Delay before retry number `attempt`
    pub fn retry_delay(&self, attempt: u32) -> Duration {
        backoff_delay(&self.retry, attempt).max(self.politeness_interval)
    }

    /// Performs a single GET without retry
    async fn fetch_once(&self, url: &Url) -> Result<RawDocument, FetchCause> {
        let requested_at = Instant::now();
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_error)?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchCause::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(classify_error)?;

        Ok(RawDocument {
            url: final_url,
            status: status.as_u16(),
            body,
            requested_at,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Fetches a URL, retrying transient failures up to `max_attempts` times
    async fn fetch(&self, url: &Url) -> Result<RawDocument, FetchError> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let cause = match self.fetch_once(url).await {
                Ok(document) => {
                    tracing::debug!(
                        "Fetched {} (HTTP {}, {} bytes, attempt {})",
                        document.url,
                        document.status,
                        document.body.len(),
                        attempt
                    );
                    return Ok(document);
                }
                Err(cause) => cause,
            };

            let transient = cause.is_transient();
            if !transient || attempt >= self.retry.max_attempts {
                return Err(FetchError {
                    url: url.to_string(),
                    cause,
                    attempts: attempt,
                    permanent: !transient,
                });
            }

            let delay = self.retry_delay(attempt);
            tracing::warn!(
                "Attempt {}/{} for {} failed ({}), retrying in {:?}",
                attempt,
                self.retry.max_attempts,
                url,
                cause,
                delay
            );
            tokio::time::sleep(delay).await;
        }
    }
}

/// Maps a reqwest error onto a fetch cause
fn classify_error(e: reqwest::Error) -> FetchCause {
    if e.is_timeout() {
        FetchCause::Timeout
    } else if e.is_connect() {
        FetchCause::Connect(e.to_string())
    } else if e.is_decode() || e.is_redirect() || e.is_builder() {
        FetchCause::Malformed(e.to_string())
    } else if let Some(status) = e.status() {
        FetchCause::Status(status.as_u16())
    } else {
        FetchCause::Request(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_user_agent() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    fn create_crawler_config() -> CrawlerConfig {
        CrawlerConfig {
            seed_url: "http://quotes.toscrape.com/".to_string(),
            politeness_interval: 1000,
            max_pages: None,
            request_timeout: 30,
            connect_timeout: 10,
        }
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&create_user_agent(), &create_crawler_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            format_user_agent(&create_user_agent()),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_transient_classification() {
        assert!(FetchCause::Status(500).is_transient());
        assert!(FetchCause::Status(503).is_transient());
        assert!(FetchCause::Timeout.is_transient());
        assert!(FetchCause::Connect("reset".to_string()).is_transient());

        assert!(!FetchCause::Status(404).is_transient());
        assert!(!FetchCause::Status(403).is_transient());
        assert!(!FetchCause::Status(429).is_transient());
        assert!(!FetchCause::Malformed("bad".to_string()).is_transient());
    }

    #[test]
    fn test_backoff_grows_and_is_capped() {
        let config = RetryConfig {
            max_attempts: 10,
            base_delay: 100,
            max_delay: 1000,
        };

        for _ in 0..20 {
            let first = backoff_delay(&config, 1);
            assert!(first >= Duration::from_millis(50) && first <= Duration::from_millis(100));

            let third = backoff_delay(&config, 3);
            assert!(third >= Duration::from_millis(200) && third <= Duration::from_millis(400));

            let capped = backoff_delay(&config, 30);
            assert!(capped >= Duration::from_millis(500) && capped <= Duration::from_millis(1000));
        }
    }

    #[test]
    fn test_retry_delay_never_undercuts_politeness_interval() {
        let retry = RetryConfig {
            max_attempts: 5,
            base_delay: 10,
            max_delay: 20_000,
        };
        let client = build_http_client(&create_user_agent(), &create_crawler_config()).unwrap();
        let fetcher = HttpFetcher::new(client, retry, Duration::from_millis(300));

        for _ in 0..20 {
            assert_eq!(fetcher.retry_delay(1), Duration::from_millis(300));
        }
        // Far enough along the backoff curve to exceed the interval
        assert!(fetcher.retry_delay(10) >= Duration::from_millis(2_560));
    }

    #[test]
    fn test_backoff_zero_base() {
        let config = RetryConfig {
            max_attempts: 3,
            base_delay: 0,
            max_delay: 0,
        };
        assert_eq!(backoff_delay(&config, 2), Duration::ZERO);
    }

    #[test]
    fn test_fetch_error_display_includes_url_and_cause() {
        let error = FetchError {
            url: "http://quotes.toscrape.com/page/2/".to_string(),
            cause: FetchCause::Status(404),
            attempts: 1,
            permanent: true,
        };
        let message = error.to_string();
        assert!(message.contains("http://quotes.toscrape.com/page/2/"));
        assert!(message.contains("HTTP 404"));
    }

    // Network behaviour (retry on 5xx, no retry on 4xx) is covered with
    // wiremock in the integration tests.
}
