//! Proxy module for discovering and validating free proxies
//!
//! This module provides functionality for:
//! - Fetching HTTPS capable proxies from a public listing page
//! - Probing candidates in listing order until one forwards traffic
//! - Resolving a proxy for a capture without ever failing it

pub mod checker;
pub mod models;
pub mod resolver;
pub mod source;

pub use checker::{HttpProbe, Probe, ProbeConfig, ProxyChecker};
pub use models::{ProbeResult, ProbeStatus, ProxyEndpoint, ProxyType};
pub use resolver::ProxyResolver;
pub use source::{parse_listing, ProxySource, SourceConfig};
