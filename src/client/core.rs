use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::builder::ScrapeOpsClientBuilder;
use super::{error_mapping, response};
use crate::dispatch::{Dispatcher, PreparedRequest, RequestSpec, ResponseFormat};
use crate::transport::{ApiCredential, Transport};
use crate::Result;

/// Executes [`RequestSpec`]s against ScrapeOps.
///
/// Resolution is pure and happens first, so local errors never reach the network.
pub struct ScrapeOpsClient {
    pub(crate) dispatcher: Dispatcher,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) credential: ApiCredential,
}

impl ScrapeOpsClient {
    /// Client with the given key, the embedded catalog and production URLs.
    pub async fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build().await
    }

    pub fn builder() -> ScrapeOpsClientBuilder {
        ScrapeOpsClientBuilder::new()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Resolve and send one request, returning the decoded response.
    pub async fn execute(&self, spec: &RequestSpec) -> Result<Value> {
        let prepared = self.dispatcher.prepare(spec)?;
        self.send(spec.api_family().as_str(), &prepared).await
    }

    /// Check the credential with a proxied fetch of a known echo endpoint.
    pub async fn test_credentials(&self) -> Result<()> {
        let prepared = PreparedRequest {
            target: self.dispatcher.credential_test(),
            response_format: ResponseFormat::Raw,
            error_label: "Proxy".to_string(),
        };
        self.send("credentialTest", &prepared).await.map(|_| ())
    }

    async fn send(&self, api_family: &str, prepared: &PreparedRequest) -> Result<Value> {
        let client_request_id = Uuid::new_v4().to_string();
        let target = &prepared.target;
        let start = Instant::now();

        let query_keys: Vec<&str> = target.query.keys().map(String::as_str).collect();
        debug!(
            client_request_id = client_request_id.as_str(),
            query_keys = ?query_keys,
            has_body = target.body.is_some(),
            "scrapeops request resolved"
        );

        let resp = match self.transport.send(target, &self.credential).await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(
                    api_family,
                    endpoint = target.path.as_str(),
                    client_request_id = client_request_id.as_str(),
                    duration_ms = start.elapsed().as_millis(),
                    error = %e,
                    "scrapeops request did not complete"
                );
                return Err(error_mapping::transport_failure(
                    &prepared.error_label,
                    &e,
                    &client_request_id,
                ));
            }
        };

        if !resp.is_success() {
            warn!(
                api_family,
                http_status = resp.status,
                endpoint = target.path.as_str(),
                client_request_id = client_request_id.as_str(),
                duration_ms = start.elapsed().as_millis(),
                "scrapeops request failed"
            );
            return Err(error_mapping::provider_error(
                &prepared.error_label,
                &resp,
                &client_request_id,
            ));
        }

        info!(
            api_family,
            http_status = resp.status,
            method = target.method.as_str(),
            endpoint = target.path.as_str(),
            content_type = resp.content_type.as_deref().unwrap_or(""),
            client_request_id = client_request_id.as_str(),
            duration_ms = start.elapsed().as_millis(),
            "scrapeops request finished"
        );
        Ok(response::decode(prepared.response_format, resp.body))
    }
}
