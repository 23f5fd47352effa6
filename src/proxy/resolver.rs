//! Proxy resolution: fetch candidates, then probe them until one works

use crate::error::Result;
use crate::proxy::checker::ProxyChecker;
use crate::proxy::models::ProxyEndpoint;
use crate::proxy::source::ProxySource;
use crate::Config;
use tracing::{info, warn};

/// Fetches candidates from the listing source and selects a working one
pub struct ProxyResolver {
    source: ProxySource,
    checker: ProxyChecker,
}

impl ProxyResolver {
    pub fn new(source: ProxySource, checker: ProxyChecker) -> Self {
        Self { source, checker }
    }

    /// Build a resolver from application configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            ProxySource::with_config(config.source.clone())?,
            ProxyChecker::with_config(config.probe.clone())?,
        ))
    }

    pub fn checker(&self) -> &ProxyChecker {
        &self.checker
    }

    /// Resolve a working proxy.
    ///
    /// Never fails: an unavailable source counts as no candidates, and `None`
    /// means the caller should connect directly.
    pub async fn resolve(&self) -> Option<ProxyEndpoint> {
        let candidates = match self.source.fetch_https_proxies().await {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!("Proceeding without candidates: {}", e);
                Vec::new()
            }
        };

        let selected = self.checker.select_working_proxy(candidates).await;
        if selected.is_none() {
            info!("No working proxy found, connecting directly");
        }
        selected
    }
}
