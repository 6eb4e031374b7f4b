use async_trait::async_trait;
use reqwest::Proxy;
use std::env;
use std::time::Duration;

use super::{ApiCredential, Transport, TransportResponse};
use crate::dispatch::{EndpointTarget, HttpMethod};

/// Query parameter carrying the credential.
pub const API_KEY_PARAM: &str = "api_key";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// HTTP client settings. Unset values fall back to `SCRAPEOPS_*` environment variables.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub timeout: Option<Duration>,
    pub proxy_url: Option<String>,
}

impl TransportConfig {
    fn resolved_timeout(&self) -> Duration {
        self.timeout.unwrap_or_else(|| {
            Duration::from_secs(
                env::var("SCRAPEOPS_HTTP_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            )
        })
    }

    fn resolved_proxy(&self) -> Option<String> {
        self.proxy_url
            .clone()
            .or_else(|| env::var("SCRAPEOPS_HTTP_PROXY").ok())
            .filter(|s| !s.trim().is_empty())
    }
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &TransportConfig) -> Result<Self, super::TransportError> {
        let mut builder = reqwest::Client::builder()
            .timeout(config.resolved_timeout())
            .pool_max_idle_per_host(
                env::var("SCRAPEOPS_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(16),
            )
            .pool_idle_timeout(Some(Duration::from_secs(90)));

        if let Some(proxy_url) = config.resolved_proxy() {
            let proxy = Proxy::all(&proxy_url)
                .map_err(|e| super::TransportError::Other(format!("invalid proxy {}: {}", proxy_url, e)))?;
            builder = builder.proxy(proxy);
        }

        let client = builder
            .build()
            .map_err(|e| super::TransportError::Other(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        target: &EndpointTarget,
        credential: &ApiCredential,
    ) -> Result<TransportResponse, super::TransportError> {
        let mut url = target
            .url()
            .map_err(|e| super::TransportError::InvalidUrl(format!("{}: {}", target.endpoint(), e)))?;
        url.query_pairs_mut()
            .append_pair(API_KEY_PARAM, credential.expose());

        let mut request = match target.method {
            HttpMethod::Get => self.client.get(url),
            HttpMethod::Post => self.client.post(url),
        };
        if let Some(body) = &target.body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        Ok(TransportResponse {
            status,
            content_type,
            body,
        })
    }
}
