//! Provider error mapping
//!
//! Turns a non-success provider response into a [`crate::Error::Provider`] whose
//! message is what the provider said, plus a hint when the target site blocked us.

use serde_json::Value;

use crate::error::{Error, ErrorContext};
use crate::transport::{TransportError, TransportResponse};

/// Provider text meaning the target site refused the proxied request.
pub const BLOCKED_MARKER: &str = "Failed to get successful response from website";

pub const BLOCKED_HINT: &str = " - This usually indicates the target website is blocking requests or is temporarily unavailable. Try using residential proxies, enabling JavaScript rendering, or adding a wait time.";

const MAX_TEXT_BODY: usize = 200;

/// First non-empty message the provider put in a JSON error body.
///
/// `status` is preferred over `message`, matching how the proxy reports target failures.
pub fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let obj = value.as_object()?;
    ["status", "message", "error", "detail"]
        .iter()
        .filter_map(|key| obj.get(*key))
        .find_map(|v| match v {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            Value::Object(inner) => inner
                .get("message")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string),
            _ => None,
        })
}

/// Append the blocked-site hint when the message carries the marker.
pub fn with_blocked_hint(message: String) -> String {
    if message.contains(BLOCKED_MARKER) {
        format!("{}{}", message, BLOCKED_HINT)
    } else {
        message
    }
}

fn generic_message(status: u16, content_type: Option<&str>, body: &str) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("Unknown Status");
    let text = body.trim();
    let is_markup = content_type.is_some_and(|ct| ct.contains("html"));
    if is_markup || text.is_empty() || text.starts_with('{') || text.starts_with('<') {
        format!("HTTP {} {}", status, reason)
    } else {
        let snippet: String = text.chars().take(MAX_TEXT_BODY).collect();
        format!("HTTP {} {}: {}", status, reason, snippet)
    }
}

/// Map a non-success response to a provider error labeled `api`.
pub fn provider_error(api: &str, resp: &TransportResponse, request_id: &str) -> Error {
    let message = match extract_message(&resp.body) {
        Some(m) => with_blocked_hint(m),
        None => with_blocked_hint(generic_message(
            resp.status,
            resp.content_type.as_deref(),
            &resp.body,
        )),
    };
    Error::Provider {
        api: api.to_string(),
        status: Some(resp.status),
        message,
        context: ErrorContext::new()
            .with_details(format!(
                "http_status={}, client_request_id={}",
                resp.status, request_id
            ))
            .with_source("provider"),
    }
}

/// The request never produced a response (connect failure, timeout, body read).
pub fn transport_failure(api: &str, err: &TransportError, request_id: &str) -> Error {
    Error::Provider {
        api: api.to_string(),
        status: None,
        message: err.to_string(),
        context: ErrorContext::new()
            .with_details(format!("client_request_id={}", request_id))
            .with_source("transport"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, content_type: &str, body: &str) -> TransportResponse {
        TransportResponse {
            status,
            content_type: Some(content_type.to_string()),
            body: body.to_string(),
        }
    }

    #[test]
    fn test_status_preferred_over_message() {
        let body = r#"{"status": "Invalid URL", "message": "other"}"#;
        assert_eq!(extract_message(body).as_deref(), Some("Invalid URL"));
    }

    #[test]
    fn test_message_used_when_no_status() {
        let body = r#"{"message": "Domain not supported"}"#;
        let err = provider_error("Parser", &response(400, "application/json", body), "req-1");
        assert_eq!(
            err.to_string(),
            "ScrapeOps Parser API request failed: Domain not supported"
        );
    }

    #[test]
    fn test_blocked_hint_appended() {
        let body = r#"{"status": "Failed to get successful response from website after 3 tries"}"#;
        let err = provider_error("Proxy", &response(500, "application/json", body), "req-1");
        let text = err.to_string();
        assert!(text.starts_with("ScrapeOps Proxy API request failed: Failed to get successful"));
        assert!(text.ends_with(BLOCKED_HINT));
    }

    #[test]
    fn test_generic_message_without_body() {
        let err = provider_error("Amazon", &response(502, "text/plain", ""), "req-1");
        assert_eq!(
            err.to_string(),
            "ScrapeOps Amazon API request failed: HTTP 502 Bad Gateway"
        );
        assert!(matches!(err, Error::Provider { status: Some(502), .. }));
    }

    #[test]
    fn test_plain_text_body_included() {
        let err = provider_error("Ebay", &response(403, "text/plain", "Forbidden: bad key"), "req-1");
        assert!(err.to_string().ends_with("HTTP 403 Forbidden: Forbidden: bad key"));
    }

    #[test]
    fn test_html_error_page_not_quoted() {
        let page = "\n  Service temporarily unavailable, retry later.";
        let err = provider_error("Proxy", &response(503, "text/html; charset=utf-8", page), "req-1");
        assert_eq!(
            err.to_string(),
            "ScrapeOps Proxy API request failed: HTTP 503 Service Unavailable"
        );
    }

    #[test]
    fn test_transport_failure_keeps_label() {
        let err = transport_failure("Walmart", &TransportError::Other("connection reset".into()), "r");
        assert_eq!(
            err.to_string(),
            "ScrapeOps Walmart API request failed: Transport error: connection reset"
        );
        assert!(!err.is_local());
    }
}
