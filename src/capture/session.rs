//! Browser session options and the scraper interface

use crate::error::Result;
use crate::proxy::models::{ProxyEndpoint, ProxyType};
use async_trait::async_trait;
use std::fmt;

/// Login credentials for the target site
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: String, password: String) -> Self {
        Self { username, password }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// What a scraper needs to open its browser session
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    /// Outbound proxy; direct connection when `None`
    pub proxy: Option<ProxyEndpoint>,
    /// Scheme the proxy was checked with
    pub proxy_type: ProxyType,
    pub credentials: Option<Credentials>,
}

impl SessionOptions {
    pub fn new(proxy: Option<ProxyEndpoint>, credentials: Option<Credentials>) -> Self {
        Self {
            proxy,
            proxy_type: ProxyType::default(),
            credentials,
        }
    }

    pub fn with_proxy_type(mut self, proxy_type: ProxyType) -> Self {
        self.proxy_type = proxy_type;
        self
    }

    /// Browser flag routing the session through the selected proxy
    pub fn proxy_server_arg(&self) -> Option<String> {
        self.proxy
            .as_ref()
            .map(|p| format!("--proxy-server={}", p.url(self.proxy_type)))
    }
}

/// Reads the trending topics list in a browser session.
///
/// Returns the raw text of each trend element in page order.
#[async_trait]
pub trait TrendScraper: Send + Sync {
    async fn scrape(&self, session: &SessionOptions) -> Result<Vec<String>>;
}
