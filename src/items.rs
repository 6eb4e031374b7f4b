//! Per-item execution.
//!
//! Runs one call per input item, in order. Every output records the index of the
//! item it came from. With `continue_on_fail` a failing item yields an error record
//! instead of aborting the run.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::client::ScrapeOpsClient;
use crate::dispatch::{Fields, RequestSpec};
use crate::Result;

pub const FAILURE_SUGGESTION: &str =
    "Check your ScrapeOps credentials and parameters. If the error persists, contact ScrapeOps support.";

/// One input item: its host parameters and its own JSON (the Proxy POST body).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    #[serde(default)]
    pub parameters: Fields,
    #[serde(default)]
    pub json: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairedItem {
    pub item: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemOutput {
    pub json: Value,
    #[serde(rename = "pairedItem")]
    pub paired_item: PairedItem,
}

impl ItemOutput {
    pub fn is_error(&self) -> bool {
        self.json.get("error").is_some() && self.json.get("suggestion").is_some()
    }
}

pub struct ItemExecutor<'a> {
    client: &'a ScrapeOpsClient,
    continue_on_fail: bool,
}

impl<'a> ItemExecutor<'a> {
    pub fn new(client: &'a ScrapeOpsClient) -> Self {
        Self {
            client,
            continue_on_fail: false,
        }
    }

    pub fn continue_on_fail(mut self, enable: bool) -> Self {
        self.continue_on_fail = enable;
        self
    }

    pub async fn run(&self, items: &[WorkItem]) -> Result<Vec<ItemOutput>> {
        let mut outputs = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            match self.run_one(item).await {
                Ok(json) => outputs.push(ItemOutput {
                    json,
                    paired_item: PairedItem { item: index },
                }),
                Err(e) if self.continue_on_fail => {
                    warn!(item_index = index, error = %e, "scrapeops item failed, continuing");
                    outputs.push(ItemOutput {
                        json: json!({
                            "error": e.to_string(),
                            "suggestion": FAILURE_SUGGESTION,
                        }),
                        paired_item: PairedItem { item: index },
                    });
                }
                Err(e) => return Err(e.with_item_index(index)),
            }
        }
        Ok(outputs)
    }

    async fn run_one(&self, item: &WorkItem) -> Result<Value> {
        let payload = match &item.json {
            Value::Null => None,
            other => Some(other.clone()),
        };
        let spec = RequestSpec::from_parameters(item.parameters.clone(), payload)?;
        self.client.execute(&spec).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::EndpointTarget;
    use crate::transport::{ApiCredential, Transport, TransportError, TransportResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct EchoTransport {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for EchoTransport {
        async fn send(
            &self,
            target: &EndpointTarget,
            _credential: &ApiCredential,
        ) -> std::result::Result<TransportResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(TransportResponse {
                status: 200,
                content_type: Some("text/html".into()),
                body: format!("fetched {}", target.query_str("url").unwrap_or_default()),
            })
        }
    }

    async fn client(transport: Arc<EchoTransport>) -> ScrapeOpsClient {
        ScrapeOpsClient::builder()
            .api_key("test-key")
            .transport(transport)
            .build()
            .await
            .unwrap()
    }

    fn item(params: Value) -> WorkItem {
        WorkItem {
            parameters: serde_json::from_value(params).unwrap(),
            json: Value::Null,
        }
    }

    #[tokio::test]
    async fn test_outputs_are_paired() {
        let transport = Arc::new(EchoTransport::default());
        let client = client(transport.clone()).await;
        let items = vec![
            item(json!({"apiType": "proxyApi", "url": "https://a.example"})),
            item(json!({"apiType": "proxyApi", "url": "https://b.example"})),
        ];
        let out = ItemExecutor::new(&client).run(&items).await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].paired_item.item, 1);
        assert_eq!(out[1].json, json!("fetched https://b.example"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_continue_on_fail_records_error() {
        let transport = Arc::new(EchoTransport::default());
        let client = client(transport.clone()).await;
        let items = vec![
            item(json!({"apiType": "dataApi", "dataDomain": "etsy"})),
            item(json!({"apiType": "proxyApi", "url": "https://ok.example"})),
        ];
        let out = ItemExecutor::new(&client)
            .continue_on_fail(true)
            .run(&items)
            .await
            .unwrap();
        assert!(out[0].is_error());
        assert_eq!(out[0].json["suggestion"], json!(FAILURE_SUGGESTION));
        assert!(out[0].json["error"]
            .as_str()
            .unwrap()
            .starts_with("Unsupported data domain: etsy"));
        assert!(!out[1].is_error());
        // The failing item never reached the transport.
        assert_eq!(transport.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_abort_attaches_item_index() {
        let transport = Arc::new(EchoTransport::default());
        let client = client(transport).await;
        let items = vec![
            item(json!({"apiType": "proxyApi", "url": "https://ok.example"})),
            item(json!({"apiType": "scraperApi"})),
        ];
        let err = ItemExecutor::new(&client).run(&items).await.unwrap_err();
        assert_eq!(err.context().and_then(|c| c.item_index), Some(1));
    }
}
