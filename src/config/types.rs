use serde::Deserialize;

/// Main configuration structure for Quote-Crawler
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub extractor: ExtractorConfig,
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// First page of the paginated chain
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Minimum time between the start of two consecutive fetches (milliseconds)
    #[serde(rename = "politeness-interval")]
    pub politeness_interval: u64,

    /// Maximum number of pages to fetch before the run fails
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,

    /// Whole-request timeout (seconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// TCP connect timeout (seconds)
    #[serde(rename = "connect-timeout", default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

/// Retry policy for transient fetch failures
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per page, including the first
    #[serde(rename = "max-attempts", default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff before the second attempt (milliseconds)
    #[serde(rename = "base-delay", default = "default_base_delay")]
    pub base_delay: u64,

    /// Upper bound on a single backoff (milliseconds)
    #[serde(rename = "max-delay", default = "default_max_delay")]
    pub max_delay: u64,
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay() -> u64 {
    500
}

fn default_max_delay() -> u64 {
    10_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay: default_base_delay(),
            max_delay: default_max_delay(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// CSS selectors used to pull records out of a page
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// One match per quote container
    pub quote: String,

    /// Quote text, relative to a container
    pub text: String,

    /// Author name, relative to a container
    pub author: String,

    /// Tag labels, relative to a container
    pub tag: String,

    /// Anchor of the "next page" control
    pub next: String,

    /// Anything that proves the document is a quote listing page
    #[serde(rename = "page-marker")]
    pub page_marker: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            quote: "div.quote".to_string(),
            text: ".text".to_string(),
            author: ".author".to_string(),
            tag: ".tag".to_string(),
            next: "li.next > a".to_string(),
            page_marker: "div.quote, ul.pager, div.col-md-8".to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV dataset
    #[serde(rename = "dataset-path")]
    pub dataset_path: String,

    /// Directory for statistics artifacts
    #[serde(rename = "stats-dir", default = "default_stats_dir")]
    pub stats_dir: String,

    /// Directory for sentiment artifacts
    #[serde(rename = "sentiment-dir", default = "default_sentiment_dir")]
    pub sentiment_dir: String,
}

fn default_stats_dir() -> String {
    "eda/visuals".to_string()
}

fn default_sentiment_dir() -> String {
    "sentiment".to_string()
}
