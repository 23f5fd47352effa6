//! Proxy checker: probes candidates in order and keeps the first that works

use crate::error::{Error, ProbeFailure, Result};
use crate::proxy::models::{ProbeResult, ProbeStatus, ProxyEndpoint, ProxyType};
use async_trait::async_trait;
use reqwest::{Client, Proxy as ReqwestProxy};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Default timeout for a single probe in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default echo endpoint, reports the caller's apparent address
pub const DEFAULT_ECHO_URL: &str = "https://httpbin.org/ip";

/// Configuration for proxy probing
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Timeout for each probe
    pub timeout: Duration,
    /// URL requested through each candidate
    pub echo_url: String,
    /// Scheme used to reach the candidate
    pub proxy_type: ProxyType,
    /// Optional budget for the whole selection; unbounded when `None`
    pub deadline: Option<Duration>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            echo_url: DEFAULT_ECHO_URL.to_string(),
            proxy_type: ProxyType::Https,
            deadline: None,
        }
    }
}

impl ProbeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_echo_url(mut self, url: String) -> Self {
        self.echo_url = url;
        self
    }

    pub fn with_proxy_type(mut self, proxy_type: ProxyType) -> Self {
        self.proxy_type = proxy_type;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// A single request issued through one candidate
#[async_trait]
pub trait Probe: Send + Sync {
    async fn probe(
        &self,
        endpoint: &ProxyEndpoint,
        timeout: Duration,
    ) -> std::result::Result<(), ProbeFailure>;
}

/// Probes a candidate by requesting the echo URL through it
#[derive(Debug, Clone)]
pub struct HttpProbe {
    echo_url: String,
    proxy_type: ProxyType,
}

impl HttpProbe {
    pub fn new(echo_url: String, proxy_type: ProxyType) -> Self {
        Self {
            echo_url,
            proxy_type,
        }
    }

    /// Create a reqwest client routed through the candidate
    fn create_client(
        &self,
        endpoint: &ProxyEndpoint,
        timeout: Duration,
    ) -> std::result::Result<Client, ProbeFailure> {
        let proxy = ReqwestProxy::all(endpoint.url(self.proxy_type))
            .map_err(|e| ProbeFailure::Client(e.to_string()))?;

        Client::builder()
            .proxy(proxy)
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeFailure::Client(e.to_string()))
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn probe(
        &self,
        endpoint: &ProxyEndpoint,
        timeout: Duration,
    ) -> std::result::Result<(), ProbeFailure> {
        let client = self.create_client(endpoint, timeout)?;
        let response = client.get(&self.echo_url).send().await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProbeFailure::Status(response.status().as_u16()))
        }
    }
}

/// Selects the first working proxy from a candidate list
pub struct ProxyChecker {
    config: ProbeConfig,
    probe: Box<dyn Probe>,
}

impl ProxyChecker {
    /// Create a checker with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(ProbeConfig::default())
    }

    /// Create a checker probing over HTTP with custom configuration
    pub fn with_config(config: ProbeConfig) -> Result<Self> {
        reqwest::Url::parse(&config.echo_url)
            .map_err(|e| Error::InvalidConfig(format!("echo url {}: {}", config.echo_url, e)))?;

        let probe = HttpProbe::new(config.echo_url.clone(), config.proxy_type);
        Ok(Self::with_probe(config, probe))
    }

    /// Create a checker with a custom probe
    pub fn with_probe(config: ProbeConfig, probe: impl Probe + 'static) -> Self {
        Self {
            config,
            probe: Box::new(probe),
        }
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Probe a single candidate, bounded by `timeout`
    pub async fn check_endpoint(&self, endpoint: &ProxyEndpoint, timeout: Duration) -> ProbeResult {
        let start = Instant::now();

        let outcome = match tokio::time::timeout(timeout, self.probe.probe(endpoint, timeout)).await
        {
            Ok(outcome) => outcome,
            Err(_) => Err(ProbeFailure::Timeout),
        };

        match outcome {
            Ok(()) => ProbeResult::working(endpoint.clone(), start.elapsed().as_millis() as u64),
            Err(failure) => ProbeResult::failed(endpoint.clone(), failure),
        }
    }

    /// Probe candidates strictly in order and return the first that works.
    ///
    /// A failed candidate is skipped and never retried. Returns `None` when the
    /// list is exhausted, or when the configured deadline runs out.
    #[instrument(skip_all, fields(candidates = candidates.len()))]
    pub async fn select_working_proxy(
        &self,
        candidates: Vec<ProxyEndpoint>,
    ) -> Option<ProxyEndpoint> {
        let started = Instant::now();
        let total = candidates.len();

        for (attempt, endpoint) in candidates.into_iter().enumerate() {
            let Some(timeout) = self.attempt_timeout(started) else {
                warn!(
                    "Proxy selection deadline reached after {} of {} candidates",
                    attempt, total
                );
                return None;
            };

            let result = self.check_endpoint(&endpoint, timeout).await;
            match result.status {
                ProbeStatus::Working => {
                    info!(
                        "Selected proxy {} ({}ms, attempt {}/{})",
                        result.endpoint,
                        result.response_time_ms.unwrap_or_default(),
                        attempt + 1,
                        total
                    );
                    return Some(result.endpoint);
                }
                ProbeStatus::Failed(failure) => {
                    debug!("Proxy {} failed: {}", result.endpoint, failure);
                }
            }
        }

        info!("No working proxy among {} candidates", total);
        None
    }

    /// Timeout for the next probe, or `None` once the deadline is spent
    fn attempt_timeout(&self, started: Instant) -> Option<Duration> {
        match self.config.deadline {
            None => Some(self.config.timeout),
            Some(deadline) => {
                let remaining = deadline.checked_sub(started.elapsed())?;
                if remaining.is_zero() {
                    None
                } else {
                    Some(remaining.min(self.config.timeout))
                }
            }
        }
    }
}
