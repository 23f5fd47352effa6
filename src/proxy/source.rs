//! Proxy listing source
//!
//! Fetches the public free proxy listing page and extracts the endpoints
//! advertised as HTTPS capable, in the order the page lists them.

use crate::error::{Error, Result};
use crate::proxy::models::ProxyEndpoint;
use once_cell::sync::Lazy;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Default listing page
pub const DEFAULT_LIST_URL: &str = "https://free-proxy-list.net/";

/// Default timeout for the listing request in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default user agent for HTTP requests
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Column positions in the listing table
const ADDRESS_COLUMN: usize = 0;
const PORT_COLUMN: usize = 1;
const HTTPS_COLUMN: usize = 6;

static TABLE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("Invalid table selector"));

/// Configuration for the proxy listing source
#[derive(Debug, Clone)]
pub struct SourceConfig {
    /// Listing page URL
    pub url: String,
    /// Timeout for the listing request
    pub timeout: Duration,
    /// User agent for the listing request
    pub user_agent: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_LIST_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl SourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(mut self, url: String) -> Self {
        self.url = url;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }
}

/// Fetches candidate endpoints from the listing page
pub struct ProxySource {
    config: SourceConfig,
    client: Client,
}

impl ProxySource {
    /// Create a new source with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(SourceConfig::default())
    }

    /// Create a new source with custom configuration
    pub fn with_config(config: SourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { config, client })
    }

    /// Fetch the listing and return the HTTPS capable endpoints in page order.
    ///
    /// An empty list is a valid result. Fails with [`Error::SourceUnavailable`]
    /// when the page cannot be fetched or contains no table.
    #[instrument(skip(self), fields(url = %self.config.url))]
    pub async fn fetch_https_proxies(&self) -> Result<Vec<ProxyEndpoint>> {
        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::SourceUnavailable(e.to_string()))?;
        let body = response
            .text()
            .await
            .map_err(|e| Error::SourceUnavailable(e.to_string()))?;

        let proxies = parse_listing(&body)?;
        info!("Found {} HTTPS proxies", proxies.len());
        Ok(proxies)
    }
}

/// Parse the first table of a listing page into endpoints.
///
/// Only the table's own body rows are read; rows of nested tables are not.
/// Rows with fewer than seven cells, an empty address or a bad port are
/// skipped. Only rows whose HTTPS column is exactly `yes` are kept.
pub fn parse_listing(html: &str) -> Result<Vec<ProxyEndpoint>> {
    let document = Html::parse_document(html);
    let table = document
        .select(&TABLE_SELECTOR)
        .next()
        .ok_or_else(|| Error::SourceUnavailable("no table in listing page".to_string()))?;

    Ok(child_elements(table, "tbody")
        .flat_map(|body| child_elements(body, "tr"))
        .filter_map(|row| {
            let cells = row_cells(row);
            let endpoint = parse_row(&cells);
            if endpoint.is_none() {
                debug!("Skipping listing row: {:?}", cells);
            }
            endpoint
        })
        .collect())
}

/// Direct element children of `parent` with the given tag name
fn child_elements<'a>(
    parent: ElementRef<'a>,
    name: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    parent
        .children()
        .filter_map(ElementRef::wrap)
        .filter(move |el| el.value().name() == name)
}

fn row_cells(row: ElementRef<'_>) -> Vec<String> {
    child_elements(row, "td")
        .map(|cell| cell.text().collect::<String>().trim().to_string())
        .collect()
}

fn parse_row(cells: &[String]) -> Option<ProxyEndpoint> {
    if cells.get(HTTPS_COLUMN)? != "yes" {
        return None;
    }
    ProxyEndpoint::from_parts(cells.get(ADDRESS_COLUMN)?, cells.get(PORT_COLUMN)?)
}
