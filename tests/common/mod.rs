//! Mock HTTP server setup for integration tests

#![allow(dead_code)]

use mockito::{Matcher, Mock, Server, ServerGuard};
use scrapeops_rust::ScrapeOpsClient;

pub const TEST_KEY: &str = "test-key";

/// Test fixture that manages a mock server
pub struct MockServerFixture {
    pub server: ServerGuard,
    pub base_url: String,
}

impl MockServerFixture {
    pub async fn new() -> Self {
        let server = Server::new_async().await;
        let base_url = server.url();
        Self { server, base_url }
    }

    /// Client pointed at the mock server for every API family.
    pub async fn client(&self) -> ScrapeOpsClient {
        ScrapeOpsClient::builder()
            .api_key(TEST_KEY)
            .base_url_override(&self.base_url)
            .build()
            .await
            .expect("client should build")
    }

    /// Query matcher requiring the credential plus the given pairs.
    pub fn query_with_key(pairs: &[(&str, &str)]) -> Matcher {
        let mut all = vec![Matcher::UrlEncoded("api_key".into(), TEST_KEY.into())];
        all.extend(
            pairs
                .iter()
                .map(|(k, v)| Matcher::UrlEncoded(k.to_string(), v.to_string())),
        );
        Matcher::AllOf(all)
    }

    /// Create a mock answering `method path` with `status` and `body`.
    pub async fn mock_response(
        &mut self,
        method: &str,
        path: &str,
        query: Matcher,
        status: usize,
        content_type: &str,
        body: &str,
    ) -> Mock {
        self.server
            .mock(method, path)
            .match_query(query)
            .with_status(status)
            .with_header("content-type", content_type)
            .with_body(body)
            .create_async()
            .await
    }

    /// Create a mock for a JSON response
    pub async fn mock_json(&mut self, method: &str, path: &str, status: usize, body: &str) -> Mock {
        self.mock_response(method, path, Matcher::Any, status, "application/json", body)
            .await
    }

    /// Catch-all mock for `method` that must never be hit.
    pub async fn mock_unreachable(&mut self, method: &str) -> Mock {
        self.server
            .mock(method, Matcher::Any)
            .expect(0)
            .create_async()
            .await
    }
}
