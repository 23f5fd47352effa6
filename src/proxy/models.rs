//! Proxy data models

use crate::error::{Error, ProbeFailure};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;

/// Scheme used to reach a candidate when routing traffic through it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ProxyType {
    Http,
    #[default]
    Https,
    Socks4,
    Socks5,
}

impl fmt::Display for ProxyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProxyType::Http => write!(f, "http"),
            ProxyType::Https => write!(f, "https"),
            ProxyType::Socks4 => write!(f, "socks4"),
            ProxyType::Socks5 => write!(f, "socks5"),
        }
    }
}

impl FromStr for ProxyType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(ProxyType::Http),
            "https" => Ok(ProxyType::Https),
            "socks4" => Ok(ProxyType::Socks4),
            "socks5" => Ok(ProxyType::Socks5),
            _ => Err(Error::InvalidConfig(format!(
                "Invalid proxy type: {}. Use: http, https, socks4, socks5",
                s
            ))),
        }
    }
}

/// A single proxy endpoint, rendered as `ip:port`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyEndpoint {
    pub host: String,
    pub port: u16,
}

impl ProxyEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Build an endpoint from raw address and port text.
    ///
    /// Returns `None` for an empty address, a port that is not a non-zero
    /// `u16`, or an address containing `:` that is not an IPv6 literal.
    /// IPv6 literals may be given with or without brackets.
    pub fn from_parts(host: &str, port: &str) -> Option<Self> {
        let host = host.trim();
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host);
        if host.is_empty() || (host.contains(':') && host.parse::<Ipv6Addr>().is_err()) {
            return None;
        }
        let port: u16 = port.trim().parse().ok()?;
        if port == 0 {
            return None;
        }
        Some(Self::new(host, port))
    }

    /// Proxy URL for the given scheme, e.g. `https://1.2.3.4:8080`
    pub fn url(&self, proxy_type: ProxyType) -> String {
        format!("{}://{}", proxy_type, self)
    }
}

impl fmt::Display for ProxyEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for ProxyEndpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .rsplit_once(':')
            .and_then(|(host, port)| Self::from_parts(host, port))
            .ok_or_else(|| Error::InvalidEndpoint(s.to_string()))
    }
}

/// Result of probing one candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeStatus {
    Working,
    Failed(ProbeFailure),
}

/// Detailed result of a single probe
#[derive(Debug, Clone)]
pub struct ProbeResult {
    pub endpoint: ProxyEndpoint,
    pub status: ProbeStatus,
    pub response_time_ms: Option<u64>,
}

impl ProbeResult {
    pub fn working(endpoint: ProxyEndpoint, response_time_ms: u64) -> Self {
        Self {
            endpoint,
            status: ProbeStatus::Working,
            response_time_ms: Some(response_time_ms),
        }
    }

    pub fn failed(endpoint: ProxyEndpoint, failure: ProbeFailure) -> Self {
        Self {
            endpoint,
            status: ProbeStatus::Failed(failure),
            response_time_ms: None,
        }
    }

    pub fn is_working(&self) -> bool {
        matches!(self.status, ProbeStatus::Working)
    }
}
