//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, from the seed URL to the CSV file.

use quote_crawler::config::{
    Config, CrawlerConfig, ExtractorConfig, OutputConfig, RetryConfig, UserAgentConfig,
};
use quote_crawler::crawler::{crawl, FetchCause};
use quote_crawler::CrawlError;
use std::path::Path;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(seed_url: String, dataset_path: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            seed_url,
            politeness_interval: 10, // Very short for testing
            max_pages: Some(10),
            request_timeout: 5,
            connect_timeout: 5,
        },
        retry: RetryConfig {
            max_attempts: 3,
            base_delay: 5,
            max_delay: 20,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        extractor: ExtractorConfig::default(),
        output: OutputConfig {
            dataset_path: dataset_path.display().to_string(),
            stats_dir: "eda/visuals".to_string(),
            sentiment_dir: "sentiment".to_string(),
        },
    }
}

/// Renders a listing page with the given quotes and optional next link
///
/// Each quote is `(text, author, tags)` with tags separated by spaces.
fn listing_page(quotes: &[(&str, &str, &str)], next: Option<&str>) -> String {
    let mut body = String::from(r#"<html><body><div class="col-md-8">"#);
    for (text, author, tags) in quotes {
        body.push_str(&format!(
            r#"<div class="quote"><span class="text">{}</span>
               <span>by <small class="author">{}</small></span>
               <div class="tags">"#,
            text, author
        ));
        for tag in tags.split_whitespace() {
            body.push_str(&format!(r#"<a class="tag" href="/tag/{0}/">{0}</a>"#, tag));
        }
        body.push_str("</div></div>");
    }
    body.push_str(r#"<nav><ul class="pager">"#);
    if let Some(href) = next {
        body.push_str(&format!(r#"<li class="next"><a href="{}">Next</a></li>"#, href));
    }
    body.push_str("</ul></nav></div></body></html>");
    body
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html")
}

#[tokio::test]
async fn test_full_crawl_writes_dataset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(listing_page(
            &[
                ("“A1”", "Ann", "life love"),
                ("“A2, with comma”", "Bob", ""),
            ],
            Some("/page/2/"),
        )))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(html(listing_page(&[], Some("/page/3/"))))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/3/"))
        .respond_with(html(listing_page(&[("“C1”", "Cy", "humor")], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dataset = dir.path().join("quotes.csv");
    let config = create_test_config(format!("{}/", mock_server.uri()), &dataset);

    let report = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.records_written, 3);
    assert_eq!(report.pages_visited, 3);
    assert_eq!(report.destination, dataset);

    let content = std::fs::read_to_string(&dataset).expect("Dataset missing");
    assert_eq!(
        content,
        "text,author,tags\n\
         “A1”,Ann,\"life,love\"\n\
         \"“A2, with comma”\",Bob,\n\
         “C1”,Cy,humor\n"
    );
}

#[tokio::test]
async fn test_permanent_failure_keeps_previous_dataset() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(listing_page(
            &[("“A1”", "Ann", "")],
            Some("/page/2/"),
        )))
        .mount(&mock_server)
        .await;

    // A 404 is permanent and must not be retried
    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dataset = dir.path().join("quotes.csv");
    std::fs::write(&dataset, "text,author,tags\nold,row,\n").expect("Failed to seed file");
    let config = create_test_config(format!("{}/", mock_server.uri()), &dataset);

    let error = crawl(&config, CancellationToken::new())
        .await
        .expect_err("Crawl should fail");

    match &error {
        CrawlError::Fetch(e) => {
            assert!(e.permanent);
            assert_eq!(e.attempts, 1);
        }
        other => panic!("Expected fetch error, got {other:?}"),
    }
    assert!(error
        .url()
        .is_some_and(|url| url.ends_with("/page/2/")));
    assert_eq!(
        std::fs::read_to_string(&dataset).expect("Dataset missing"),
        "text,author,tags\nold,row,\n"
    );
}

#[tokio::test]
async fn test_failed_crawl_writes_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(listing_page(
            &[("“A1”", "Ann", "")],
            Some("/page/2/"),
        )))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/page/2/"))
        .respond_with(ResponseTemplate::new(410))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dataset = dir.path().join("quotes.csv");
    let config = create_test_config(format!("{}/", mock_server.uri()), &dataset);

    assert!(crawl(&config, CancellationToken::new()).await.is_err());
    assert!(!dataset.exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_transient_failure_is_retried() {
    let mock_server = MockServer::start().await;

    // Two 503s, then the real page
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .expect(2)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(listing_page(&[("“Only”", "Ann", "one")], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dataset = dir.path().join("quotes.csv");
    let config = create_test_config(format!("{}/", mock_server.uri()), &dataset);

    let report = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.records_written, 1);
    assert_eq!(
        std::fs::read_to_string(&dataset).expect("Dataset missing"),
        "text,author,tags\n“Only”,Ann,one\n"
    );
}

#[tokio::test]
async fn test_retries_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dataset = dir.path().join("quotes.csv");
    let config = create_test_config(format!("{}/", mock_server.uri()), &dataset);

    match crawl(&config, CancellationToken::new()).await {
        Err(CrawlError::Fetch(e)) => {
            assert!(!e.permanent);
            assert_eq!(e.attempts, 3);
        }
        other => panic!("Expected fetch error, got {other:?}"),
    }
    assert!(!dataset.exists());
}

#[tokio::test]
async fn test_unrecognized_page_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            "<html><body><h1>Service moved</h1></body></html>".to_string(),
        ))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dataset = dir.path().join("quotes.csv");
    let config = create_test_config(format!("{}/", mock_server.uri()), &dataset);

    let error = crawl(&config, CancellationToken::new())
        .await
        .expect_err("Crawl should fail");

    assert!(matches!(error, CrawlError::Extract { .. }));
    assert!(!dataset.exists());
}

#[tokio::test]
async fn test_page_limit_exceeded() {
    let mock_server = MockServer::start().await;

    // The page links to itself forever
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(listing_page(&[("“Loop”", "Ann", "")], Some("/"))))
        .expect(3)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dataset = dir.path().join("quotes.csv");
    let mut config = create_test_config(format!("{}/", mock_server.uri()), &dataset);
    config.crawler.max_pages = Some(3);

    let error = crawl(&config, CancellationToken::new())
        .await
        .expect_err("Crawl should fail");

    assert!(matches!(error, CrawlError::LimitExceeded { limit: 3, .. }));
    assert!(!dataset.exists());
}

#[tokio::test]
async fn test_cancelled_crawl_writes_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html(listing_page(&[("“A1”", "Ann", "")], None)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dataset = dir.path().join("quotes.csv");
    let config = create_test_config(format!("{}/", mock_server.uri()), &dataset);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let error = crawl(&config, cancel).await.expect_err("Crawl should fail");

    assert!(matches!(error, CrawlError::Cancelled { .. }));
    assert!(!dataset.exists());
}

#[tokio::test]
async fn test_retry_waits_for_politeness_interval() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(listing_page(&[("“Late”", "Ann", "")], None)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dataset = dir.path().join("quotes.csv");
    let mut config = create_test_config(format!("{}/", mock_server.uri()), &dataset);
    config.crawler.politeness_interval = 300;
    config.retry.base_delay = 10;

    let started = Instant::now();
    let report = crawl(&config, CancellationToken::new())
        .await
        .expect("Crawl failed");

    assert_eq!(report.records_written, 1);
    let elapsed = started.elapsed();
    assert!(
        elapsed >= Duration::from_millis(300),
        "retry sent after {:?}",
        elapsed
    );
}

#[tokio::test]
async fn test_request_timeout_is_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            html(listing_page(&[("“Slow”", "Ann", "")], None)).set_delay(Duration::from_secs(3)),
        )
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let dataset = dir.path().join("quotes.csv");
    let mut config = create_test_config(format!("{}/", mock_server.uri()), &dataset);
    config.crawler.request_timeout = 1;
    config.retry.max_attempts = 2;

    match crawl(&config, CancellationToken::new()).await {
        Err(CrawlError::Fetch(e)) => {
            assert_eq!(e.cause, FetchCause::Timeout);
            assert_eq!(e.attempts, 2);
            assert!(!e.permanent);
        }
        other => panic!("Expected timeout fetch error, got {other:?}"),
    }
    assert!(!dataset.exists());
}
