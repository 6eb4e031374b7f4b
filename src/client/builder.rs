use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::catalog::{self, Catalog, CatalogLoader};
use crate::client::core::ScrapeOpsClient;
use crate::dispatch::{BaseUrls, Dispatcher};
use crate::transport::{ApiCredential, HttpTransport, Transport, TransportConfig};
use crate::Result;

/// Builder for [`ScrapeOpsClient`].
///
/// Unset values come from the environment (`SCRAPEOPS_API_KEY`,
/// `SCRAPEOPS_PROXY_BASE_URL`, `SCRAPEOPS_PARSER_BASE_URL`, `SCRAPEOPS_HTTP_*`).
pub struct ScrapeOpsClientBuilder {
    api_key: Option<String>,
    catalog: Option<Arc<Catalog>>,
    catalog_path: Option<PathBuf>,
    proxy_base_url: Option<String>,
    parser_base_url: Option<String>,
    /// Override every base URL at once (primarily for testing with mock servers)
    base_url_override: Option<String>,
    transport_config: TransportConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl ScrapeOpsClientBuilder {
    pub fn new() -> Self {
        Self {
            api_key: None,
            catalog: None,
            catalog_path: None,
            proxy_base_url: None,
            parser_base_url: None,
            base_url_override: None,
            transport_config: TransportConfig::default(),
            transport: None,
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Use an already loaded catalog instead of the embedded one.
    pub fn catalog(mut self, catalog: Arc<Catalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Load the catalog from a file at build time.
    pub fn catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    /// Proxy API base (also the Data API base).
    pub fn proxy_base_url(mut self, url: impl Into<String>) -> Self {
        self.proxy_base_url = Some(url.into());
        self
    }

    pub fn parser_base_url(mut self, url: impl Into<String>) -> Self {
        self.parser_base_url = Some(url.into());
        self
    }

    /// Send every family to one server. See [`BaseUrls::single_host`].
    pub fn base_url_override(mut self, base: impl Into<String>) -> Self {
        self.base_url_override = Some(base.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.transport_config.timeout = Some(timeout);
        self
    }

    /// Route outbound traffic through an HTTP(S) proxy.
    pub fn http_proxy(mut self, url: impl Into<String>) -> Self {
        self.transport_config.proxy_url = Some(url.into());
        self
    }

    /// Replace the HTTP transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    fn base_urls(&self) -> BaseUrls {
        if let Some(base) = &self.base_url_override {
            return BaseUrls::single_host(base);
        }
        let mut urls = BaseUrls::default();
        if let Some(proxy) = self
            .proxy_base_url
            .clone()
            .or_else(|| env::var("SCRAPEOPS_PROXY_BASE_URL").ok())
        {
            urls.proxy = proxy.clone();
            urls.data = proxy;
        }
        if let Some(parser) = self
            .parser_base_url
            .clone()
            .or_else(|| env::var("SCRAPEOPS_PARSER_BASE_URL").ok())
        {
            urls.parser = parser;
        }
        urls
    }

    pub async fn build(self) -> Result<ScrapeOpsClient> {
        let catalog = match (&self.catalog, &self.catalog_path) {
            (Some(catalog), _) => catalog.clone(),
            (None, Some(path)) => Arc::new(CatalogLoader::new().load_from_file(path).await?),
            (None, None) => catalog::builtin()?,
        };
        self.finish(catalog)
    }

    fn finish(self, catalog: Arc<Catalog>) -> Result<ScrapeOpsClient> {
        let credential = match &self.api_key {
            Some(key) => ApiCredential::new(key.clone())?,
            None => ApiCredential::from_env()?,
        };
        let base_urls = self.base_urls();
        let transport = match self.transport {
            Some(t) => t,
            None => Arc::new(HttpTransport::new(&self.transport_config)?),
        };
        Ok(ScrapeOpsClient {
            dispatcher: Dispatcher::new(catalog, base_urls),
            transport,
            credential,
        })
    }
}

impl Default for ScrapeOpsClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_key_fails_before_network() {
        let err = ScrapeOpsClientBuilder::new()
            .api_key("")
            .build()
            .await
            .err()
            .unwrap();
        assert_eq!(
            err.to_string(),
            "A valid API key is required. Please check your ScrapeOps API credentials."
        );
    }

    #[test]
    fn test_override_routes_all_families() {
        let urls = ScrapeOpsClientBuilder::new()
            .base_url_override("http://127.0.0.1:9")
            .base_urls();
        assert_eq!(urls.proxy, "http://127.0.0.1:9/v1");
        assert_eq!(urls.data, "http://127.0.0.1:9/v1");
        assert_eq!(urls.parser, "http://127.0.0.1:9");
    }

    #[test]
    fn test_explicit_proxy_base_sets_data_base() {
        let urls = ScrapeOpsClientBuilder::new()
            .proxy_base_url("http://localhost:1/v1")
            .parser_base_url("http://localhost:2")
            .base_urls();
        assert_eq!(urls.data, "http://localhost:1/v1");
        assert_eq!(urls.parser, "http://localhost:2");
    }
}
