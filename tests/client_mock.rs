//! Integration tests for ScrapeOpsClient against a mockito server.

mod common;

use common::{MockServerFixture, TEST_KEY};
use mockito::Matcher;
use scrapeops_rust::client::BLOCKED_HINT;
use scrapeops_rust::{Error, RequestSpec, ScrapeOpsClient};
use serde_json::json;

#[tokio::test]
async fn test_proxy_passthrough() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_response(
            "GET",
            "/v1/",
            MockServerFixture::query_with_key(&[
                ("url", "https://example.com/page"),
                ("premium", "level_1"),
                ("render_js", "true"),
            ]),
            200,
            "text/html",
            "<html><body>ok</body></html>",
        )
        .await;
    let client = fixture.client().await;

    let spec = RequestSpec::proxy("https://example.com/page")
        .field("advancedOptions", json!({"render_js": true}))
        .build();
    let out = client.execute(&spec).await.unwrap();

    assert_eq!(out, json!("<html><body>ok</body></html>"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_proxy_json_return_type_is_parsed() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_response(
            "GET",
            "/v1/",
            MockServerFixture::query_with_key(&[("json_response", "true")]),
            200,
            "application/json",
            r#"{"body": "<html/>", "status_code": 200}"#,
        )
        .await;
    let client = fixture.client().await;

    let spec = RequestSpec::proxy("https://example.com")
        .field("returnType", "json")
        .build();
    let out = client.execute(&spec).await.unwrap();

    assert_eq!(out["status_code"], json!(200));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_proxy_post_forwards_payload() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/v1/")
        .match_query(MockServerFixture::query_with_key(&[("url", "https://example.com/form")]))
        .match_body(Matcher::Json(json!({"q": "rust"})))
        .with_status(200)
        .with_body("posted")
        .create_async()
        .await;
    let client = fixture.client().await;

    let spec = RequestSpec::proxy("https://example.com/form")
        .field("method", "POST")
        .payload(json!({"q": "rust"}))
        .build();
    assert_eq!(client.execute(&spec).await.unwrap(), json!("posted"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_proxy_blocked_error_gets_hint() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json(
            "GET",
            "/v1/",
            500,
            r#"{"status": "Failed to get successful response from website"}"#,
        )
        .await;
    let client = fixture.client().await;

    let err = client
        .execute(&RequestSpec::proxy("https://blocked.example").build())
        .await
        .unwrap_err();

    let text = err.to_string();
    assert!(text.starts_with(
        "ScrapeOps Proxy API request failed: Failed to get successful response from website"
    ));
    assert!(text.ends_with(BLOCKED_HINT));
    assert!(matches!(err, Error::Provider { status: Some(500), .. }));
}

#[tokio::test]
async fn test_parser_posts_url_and_html() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .server
        .mock("POST", "/v2/amazon")
        .match_query(MockServerFixture::query_with_key(&[]))
        .match_body(Matcher::Json(json!({
            "url": "https://www.amazon.com/dp/B000123",
            "html": "<html>product</html>",
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"data": {"title": "Widget"}}"#)
        .create_async()
        .await;
    let client = fixture.client().await;

    let spec = RequestSpec::parser(
        "amazon",
        "https://www.amazon.com/dp/B000123",
        "<html>product</html>",
    )
    .build();
    let out = client.execute(&spec).await.unwrap();

    assert_eq!(out["data"]["title"], json!("Widget"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_parser_error_uses_message() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("POST", "/v2/ebay", 400, r#"{"message": "HTML is empty"}"#)
        .await;
    let client = fixture.client().await;

    let err = client
        .execute(&RequestSpec::parser("ebay", "https://www.ebay.com/itm/1", "<p/>").build())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "ScrapeOps Parser API request failed: HTML is empty"
    );
}

#[tokio::test]
async fn test_lenient_json_falls_back_to_text() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_response(
            "GET",
            "/v1/structured-data/amazon/search",
            MockServerFixture::query_with_key(&[("query", "desk")]),
            200,
            "text/plain",
            "not json",
        )
        .await;
    let client = fixture.client().await;

    let spec = RequestSpec::data("amazon", "search")
        .input_mode("query")
        .field("amazonSearchQuery", "desk")
        .build();
    assert_eq!(client.execute(&spec).await.unwrap(), json!("not json"));
}

#[tokio::test]
async fn test_credential_test_request() {
    let mut fixture = MockServerFixture::new().await;
    let mock = fixture
        .mock_response(
            "GET",
            "/v1/",
            MockServerFixture::query_with_key(&[("url", "https://httpbin.org/ip")]),
            200,
            "application/json",
            r#"{"origin": "1.2.3.4"}"#,
        )
        .await;
    let client = fixture.client().await;

    client.test_credentials().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn test_credential_test_rejected_key() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_json("GET", "/v1/", 403, r#"{"message": "Invalid API key"}"#)
        .await;
    let client = fixture.client().await;

    let err = client.test_credentials().await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "ScrapeOps Proxy API request failed: Invalid API key"
    );
}

#[tokio::test]
async fn test_local_errors_issue_no_request() {
    let mut fixture = MockServerFixture::new().await;
    let get = fixture.mock_unreachable("GET").await;
    let post = fixture.mock_unreachable("POST").await;
    let client = fixture.client().await;

    let bad_headers = RequestSpec::proxy("https://example.com")
        .field("advancedOptions", json!({"customHeaders": "{bad"}))
        .build();
    let err = client.execute(&bad_headers).await.unwrap_err();
    assert!(matches!(err, Error::InputParse { ref field, .. } if field == "Custom Headers"));

    let bad_domain = RequestSpec::data("etsy", "product").build();
    assert!(client.execute(&bad_domain).await.unwrap_err().is_local());

    let bad_parser = RequestSpec::parser("etsy", "https://etsy.com", "<p/>").build();
    assert!(client.execute(&bad_parser).await.unwrap_err().is_local());

    get.assert_async().await;
    post.assert_async().await;
}

#[tokio::test]
async fn test_transport_failure_is_labeled() {
    // Nothing listens on the discard port.
    let client = ScrapeOpsClient::builder()
        .api_key(TEST_KEY)
        .base_url_override("http://127.0.0.1:9")
        .timeout(std::time::Duration::from_secs(2))
        .build()
        .await
        .unwrap();

    let spec = RequestSpec::data("walmart", "product")
        .input_mode("productId")
        .field("walmartProductId", "123")
        .build();
    let err = client.execute(&spec).await.unwrap_err();
    assert!(err
        .to_string()
        .starts_with("ScrapeOps Walmart API request failed:"));
    assert!(matches!(err, Error::Provider { status: None, .. }));
}

#[tokio::test]
async fn test_html_error_page_reports_status_only() {
    let mut fixture = MockServerFixture::new().await;
    let _mock = fixture
        .mock_response(
            "GET",
            "/v1/",
            Matcher::Any,
            503,
            "text/html",
            "Service temporarily unavailable",
        )
        .await;
    let client = fixture.client().await;

    let err = client
        .execute(&RequestSpec::proxy("https://example.com").build())
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "ScrapeOps Proxy API request failed: HTTP 503 Service Unavailable"
    );
}
