//! Trend Scout - trending topics capture with free proxy rotation
//!
//! Before each capture a working HTTPS proxy is picked from a public
//! listing; when none works the capture connects directly.

pub mod capture;
pub mod error;
pub mod proxy;

#[cfg(test)]
mod test_utils;

pub use capture::*;
pub use error::{Error, ProbeFailure, Result};
pub use proxy::*;

use std::collections::HashMap;
use std::env;
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Proxy listing source
    pub source: SourceConfig,
    /// Candidate probing
    pub probe: ProbeConfig,
    /// Address echo service used when recording a capture
    pub ip_echo_url: Option<String>,
    /// Login for the target site
    pub credentials: Option<Credentials>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The binary loads a `.env` file into the environment first.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from a `.env` style file.
    ///
    /// Variables already set in the process environment take precedence.
    pub fn from_env_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let vars = dotenvy::from_path_iter(path)
            .and_then(|iter| iter.collect::<std::result::Result<HashMap<_, _>, _>>())
            .map_err(|e| Error::InvalidConfig(format!("env file {}: {}", path.display(), e)))?;

        Self::from_lookup(|key| env::var(key).ok().or_else(|| vars.get(key).cloned()))
    }

    /// Load configuration from any key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut source = SourceConfig::default();
        if let Some(url) = lookup("PROXY_LIST_URL") {
            source = source.with_url(url);
        }

        let mut probe = ProbeConfig::default();
        if let Some(url) = lookup("PROXY_ECHO_URL") {
            probe = probe.with_echo_url(url);
        }
        if let Some(secs) = lookup("PROXY_PROBE_TIMEOUT_SECS") {
            probe = probe.with_timeout(parse_secs("PROXY_PROBE_TIMEOUT_SECS", &secs)?);
        }
        if let Some(secs) = lookup("PROXY_RESOLVE_DEADLINE_SECS") {
            probe = probe.with_deadline(parse_secs("PROXY_RESOLVE_DEADLINE_SECS", &secs)?);
        }
        if let Some(scheme) = lookup("PROXY_SCHEME") {
            probe = probe.with_proxy_type(scheme.parse()?);
        }

        let credentials = match (lookup("TWITTER_USERNAME"), lookup("TWITTER_PASSWORD")) {
            (Some(username), Some(password)) => Some(Credentials::new(username, password)),
            _ => None,
        };

        Ok(Self {
            source,
            probe,
            ip_echo_url: lookup("IP_ECHO_URL"),
            credentials,
        })
    }

    /// Address echo built from this configuration
    pub fn ip_echo(&self) -> HttpIpEcho {
        let url = self
            .ip_echo_url
            .clone()
            .unwrap_or_else(|| capture::echo::DEFAULT_IP_ECHO_URL.to_string());
        HttpIpEcho::new(url, self.probe.proxy_type)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|_| Error::InvalidConfig(format!("{} must be a whole number of seconds", key)))
}
