//! Apparent public address lookup

use crate::error::{Error, Result};
use crate::proxy::models::{ProxyEndpoint, ProxyType};
use async_trait::async_trait;
use reqwest::{Client, Proxy as ReqwestProxy};
use std::time::Duration;
use tracing::warn;

/// Default address echo service, replies with the caller's IP as plain text
pub const DEFAULT_IP_ECHO_URL: &str = "https://api.ipify.org";

/// Default timeout for the lookup in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Reports the address the target site sees
#[async_trait]
pub trait IpEcho: Send + Sync {
    async fn current_ip(&self, proxy: Option<&ProxyEndpoint>) -> Result<String>;
}

/// Looks up the apparent address over HTTP
#[derive(Debug, Clone)]
pub struct HttpIpEcho {
    url: String,
    proxy_type: ProxyType,
    timeout: Duration,
}

impl HttpIpEcho {
    pub fn new(url: String, proxy_type: ProxyType) -> Self {
        Self {
            url,
            proxy_type,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn fetch(&self, proxy: Option<&ProxyEndpoint>) -> Result<String> {
        let builder = Client::builder().timeout(self.timeout);
        let builder = match proxy {
            Some(proxy) => builder.proxy(ReqwestProxy::all(proxy.url(self.proxy_type))?),
            None => builder.no_proxy(),
        };

        let body = builder
            .build()?
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let ip = body.trim();
        if ip.is_empty() {
            return Err(Error::Capture("empty reply from address echo".to_string()));
        }
        Ok(ip.to_string())
    }
}

impl Default for HttpIpEcho {
    fn default() -> Self {
        Self::new(DEFAULT_IP_ECHO_URL.to_string(), ProxyType::Https)
    }
}

#[async_trait]
impl IpEcho for HttpIpEcho {
    /// Ask through the proxy first; fall back to a direct lookup if it fails.
    async fn current_ip(&self, proxy: Option<&ProxyEndpoint>) -> Result<String> {
        if let Some(endpoint) = proxy {
            match self.fetch(Some(endpoint)).await {
                Ok(ip) => return Ok(ip),
                Err(e) => warn!("Address lookup through {} failed: {}", endpoint, e),
            }
        }
        self.fetch(None).await
    }
}
