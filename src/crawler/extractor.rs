//! HTML extractor for quote records and pagination
//!
//! This module handles parsing a fetched page to extract:
//! - One record per quote container (text, author, tags)
//! - The "next page" link, if any
//!
//! Extraction is tolerant of partial markup inside a container, but strict
//! about the page as a whole: a document that does not look like a quote
//! listing at all is rejected rather than silently yielding zero records.

use crate::config::{validate_selector, ExtractorConfig};
use crate::crawler::fetcher::RawDocument;
use crate::record::Record;
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// Errors raised when a document cannot be interpreted
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    #[error("document is not a recognizable quote page (no match for '{marker}')")]
    UnrecognizedPage { marker: String },

    #[error("next link '{href}' does not resolve to an HTTP(S) URL")]
    InvalidNextLink { href: String },
}

/// Records and pagination extracted from one page
#[derive(Debug, Clone, Default)]
pub struct ExtractedPage {
    /// Quotes in document order
    pub records: Vec<Record>,

    /// Absolute URL of the next page, or None on the last page
    pub next: Option<Url>,
}

/// Compiled selectors for one site layout
#[derive(Debug, Clone)]
pub struct Extractor {
    quote: Selector,
    text: Selector,
    author: Selector,
    tag: Selector,
    next: Selector,
    page_marker: Selector,
    page_marker_source: String,
}

impl Extractor {
    /// Compiles the configured selectors
    ///
    /// # Example
    ///
    /// ```
    /// use quote_crawler::config::ExtractorConfig;
    /// use quote_crawler::crawler::{Extractor, RawDocument};
    /// use url::Url;
    ///
    /// let extractor = Extractor::new(&ExtractorConfig::default()).unwrap();
    /// let document = RawDocument {
    ///     url: Url::parse("http://quotes.toscrape.com/").unwrap(),
    ///     status: 200,
    ///     body: r#"<div class="quote"><span class="text">Hi</span>
    ///              <small class="author">Me</small></div>"#.to_string(),
    ///     requested_at: tokio::time::Instant::now(),
    /// };
    /// let page = extractor.extract(&document).unwrap();
    /// assert_eq!(page.records.len(), 1);
    /// assert!(page.next.is_none());
    /// ```
    pub fn new(config: &ExtractorConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            quote: validate_selector(&config.quote)?,
            text: validate_selector(&config.text)?,
            author: validate_selector(&config.author)?,
            tag: validate_selector(&config.tag)?,
            next: validate_selector(&config.next)?,
            page_marker: validate_selector(&config.page_marker)?,
            page_marker_source: config.page_marker.clone(),
        })
    }

    /// Extracts every quote and the next-page link from a document
    ///
    /// # Rules
    ///
    /// - A container missing text or author still yields a record, with `""`
    /// - Tags are trimmed, empty labels dropped, order and duplicates kept
    /// - A missing next control means this is the last page
    /// - A document matching nothing of the page marker is an error
    pub fn extract(&self, document: &RawDocument) -> Result<ExtractedPage, ExtractError> {
        let html = Html::parse_document(&document.body);

        if html.select(&self.page_marker).next().is_none() {
            return Err(ExtractError::UnrecognizedPage {
                marker: self.page_marker_source.clone(),
            });
        }

        let records = html
            .select(&self.quote)
            .map(|container| self.extract_record(container))
            .collect();

        let next = self.extract_next(&html, &document.url)?;

        Ok(ExtractedPage { records, next })
    }

    fn extract_record(&self, container: ElementRef<'_>) -> Record {
        let text = first_text(container, &self.text).unwrap_or_default();
        let author = first_text(container, &self.author).unwrap_or_default();

        let tags = container
            .select(&self.tag)
            .map(collect_text)
            .filter(|label| !label.is_empty())
            .collect();

        Record { text, author, tags }
    }

    fn extract_next(&self, html: &Html, base_url: &Url) -> Result<Option<Url>, ExtractError> {
        let Some(href) = html
            .select(&self.next)
            .next()
            .and_then(|anchor| anchor.value().attr("href"))
        else {
            return Ok(None);
        };

        resolve_link(href, base_url)
            .map(Some)
            .ok_or_else(|| ExtractError::InvalidNextLink {
                href: href.to_string(),
            })
    }
}

/// Trimmed text of the first descendant matching `selector`
fn first_text(container: ElementRef<'_>, selector: &Selector) -> Option<String> {
    container.select(selector).next().map(collect_text)
}

fn collect_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Resolves a link href to an absolute HTTP(S) URL
///
/// Returns None for empty hrefs, fragment-only links, special schemes and
/// anything that does not resolve against the base URL.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let absolute_url = base_url.join(href).ok()?;
    if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
        Some(absolute_url)
    } else {
        None
    }
}
