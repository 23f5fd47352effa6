//! Capture routine: resolve a proxy, scrape, record

use crate::capture::echo::IpEcho;
use crate::capture::record::{trend_name, TrendRecord};
use crate::capture::session::{Credentials, SessionOptions, TrendScraper};
use crate::capture::store::TrendStore;
use crate::error::Result;
use crate::proxy::ProxyResolver;
use std::sync::Arc;
use tracing::{info, instrument};

/// Runs one capture of the trending topics list
pub struct CaptureRunner {
    resolver: ProxyResolver,
    scraper: Box<dyn TrendScraper>,
    echo: Box<dyn IpEcho>,
    store: Arc<dyn TrendStore>,
    credentials: Option<Credentials>,
}

impl CaptureRunner {
    pub fn new(
        resolver: ProxyResolver,
        scraper: impl TrendScraper + 'static,
        echo: impl IpEcho + 'static,
        store: Arc<dyn TrendStore>,
    ) -> Self {
        Self {
            resolver,
            scraper: Box::new(scraper),
            echo: Box::new(echo),
            store,
            credentials: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<Credentials>) -> Self {
        self.credentials = credentials;
        self
    }

    /// Capture the current trends and store the record.
    ///
    /// Proxy resolution never aborts a capture; scrape, lookup and store
    /// failures do.
    #[instrument(skip(self))]
    pub async fn run(&self) -> Result<TrendRecord> {
        let proxy = self.resolver.resolve().await;
        let session = SessionOptions::new(proxy, self.credentials.clone())
            .with_proxy_type(self.resolver.checker().config().proxy_type);

        let trends: Vec<String> = self
            .scraper
            .scrape(&session)
            .await?
            .iter()
            .map(|text| trend_name(text))
            .collect();
        let ip_address = self.echo.current_ip(session.proxy.as_ref()).await?;

        let record = TrendRecord::new(trends, ip_address)?;
        self.store.insert(&record).await?;

        info!(
            "Captured trends {:?} via {}",
            record.trends,
            session
                .proxy
                .as_ref()
                .map_or_else(|| "direct connection".to_string(), ToString::to_string)
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::store::MemoryStore;
    use crate::error::Error;
    use crate::proxy::checker::tests::{Behavior, ScriptedProbe};
    use crate::proxy::{
        ProbeConfig, ProxyChecker, ProxyEndpoint, ProxySource, ProxyType, SourceConfig,
    };
    use crate::test_utils::{listing_html, spawn_http_server};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Scraper returning canned trend texts and remembering its sessions
    #[derive(Clone, Default)]
    struct CannedScraper {
        texts: Vec<String>,
        sessions: Arc<Mutex<Vec<SessionOptions>>>,
    }

    #[async_trait]
    impl TrendScraper for CannedScraper {
        async fn scrape(&self, session: &SessionOptions) -> Result<Vec<String>> {
            self.sessions.lock().unwrap().push(session.clone());
            if self.texts.is_empty() {
                return Err(Error::Capture("trends section not found".to_string()));
            }
            Ok(self.texts.clone())
        }
    }

    /// Echo that reports a proxy's host, or a fixed direct address
    struct FixedEcho;

    #[async_trait]
    impl IpEcho for FixedEcho {
        async fn current_ip(&self, proxy: Option<&ProxyEndpoint>) -> Result<String> {
            Ok(proxy.map_or_else(|| "192.0.2.1".to_string(), |p| p.host.clone()))
        }
    }

    fn scraper(count: usize) -> CannedScraper {
        CannedScraper {
            texts: (1..=count)
                .map(|i| format!("Topic {}\n{}K posts", i, i * 10))
                .collect(),
            ..Default::default()
        }
    }

    fn resolver(list_url: String, probe: ScriptedProbe) -> ProxyResolver {
        resolver_with(list_url, probe, ProxyType::Https)
    }

    fn resolver_with(list_url: String, probe: ScriptedProbe, proxy_type: ProxyType) -> ProxyResolver {
        let source = ProxySource::with_config(
            SourceConfig::new()
                .with_url(list_url)
                .with_timeout(Duration::from_secs(2)),
        )
        .unwrap();
        let config = ProbeConfig::new()
            .with_timeout(Duration::from_millis(100))
            .with_proxy_type(proxy_type);
        ProxyResolver::new(source, ProxyChecker::with_probe(config, probe))
    }

    fn single_row_listing(ip: &str, port: &str) -> String {
        listing_html(&[vec![
            ip.to_string(),
            port.to_string(),
            "FR".to_string(),
            "France".to_string(),
            "anonymous".to_string(),
            "no".to_string(),
            "yes".to_string(),
        ]])
    }

    #[tokio::test]
    async fn test_capture_without_proxy() {
        let store = Arc::new(MemoryStore::new());
        let scraper = scraper(6);
        let runner = CaptureRunner::new(
            resolver("http://127.0.0.1:1/".to_string(), ScriptedProbe::new()),
            scraper.clone(),
            FixedEcho,
            store.clone(),
        );

        let record = runner.run().await.unwrap();

        assert_eq!(
            record.trends,
            vec!["Topic 1", "Topic 2", "Topic 3", "Topic 4", "Topic 5"]
        );
        assert_eq!(record.ip_address, "192.0.2.1");
        assert!(scraper.sessions.lock().unwrap()[0].proxy.is_none());
        assert_eq!(store.latest().await.unwrap(), Some(record));
    }

    #[tokio::test]
    async fn test_capture_through_selected_proxy() {
        let html = single_row_listing("10.1.1.1", "3128");
        let addr = spawn_http_server("200 OK", html).await;
        let probe = ScriptedProbe::new().on("10.1.1.1:3128", Behavior::Succeed);
        let scraper = scraper(5);
        let credentials = Credentials::new("scout".to_string(), "secret".to_string());
        let runner = CaptureRunner::new(
            resolver(format!("http://{}/", addr), probe),
            scraper.clone(),
            FixedEcho,
            Arc::new(MemoryStore::new()),
        )
        .with_credentials(Some(credentials.clone()));

        let record = runner.run().await.unwrap();

        assert_eq!(record.ip_address, "10.1.1.1");
        let sessions = scraper.sessions.lock().unwrap();
        assert_eq!(sessions[0].proxy, Some(ProxyEndpoint::new("10.1.1.1", 3128)));
        assert_eq!(sessions[0].credentials, Some(credentials));
        assert_eq!(
            sessions[0].proxy_server_arg().as_deref(),
            Some("--proxy-server=https://10.1.1.1:3128")
        );
    }

    #[tokio::test]
    async fn test_session_carries_configured_scheme() {
        let addr = spawn_http_server("200 OK", single_row_listing("10.2.2.2", "8080")).await;
        let probe = ScriptedProbe::new().on("10.2.2.2:8080", Behavior::Succeed);
        let scraper = scraper(5);
        let runner = CaptureRunner::new(
            resolver_with(format!("http://{}/", addr), probe, ProxyType::Http),
            scraper.clone(),
            FixedEcho,
            Arc::new(MemoryStore::new()),
        );

        runner.run().await.unwrap();

        let sessions = scraper.sessions.lock().unwrap();
        assert_eq!(sessions[0].proxy_type, ProxyType::Http);
        assert_eq!(
            sessions[0].proxy_server_arg().as_deref(),
            Some("--proxy-server=http://10.2.2.2:8080")
        );
    }

    #[tokio::test]
    async fn test_scrape_failure_stores_nothing() {
        let store = Arc::new(MemoryStore::new());
        let runner = CaptureRunner::new(
            resolver("http://127.0.0.1:1/".to_string(), ScriptedProbe::new()),
            scraper(0),
            FixedEcho,
            store.clone(),
        );

        assert!(matches!(runner.run().await, Err(Error::Capture(_))));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_too_few_trends_is_error() {
        let store = Arc::new(MemoryStore::new());
        let runner = CaptureRunner::new(
            resolver("http://127.0.0.1:1/".to_string(), ScriptedProbe::new()),
            scraper(3),
            FixedEcho,
            store.clone(),
        );

        assert!(runner.run().await.is_err());
        assert!(store.is_empty());
    }
}
