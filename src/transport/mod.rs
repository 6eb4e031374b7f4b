//! HTTP transport: sends one [`EndpointTarget`] and returns the raw response.
//!
//! The credential is attached here, as the `api_key` query parameter, and nowhere
//! else. Non-success statuses are returned as responses, not errors; mapping them
//! is the client's job.

mod credential;
pub mod http;

pub use credential::ApiCredential;
pub use http::{HttpTransport, TransportConfig, API_KEY_PARAM};

use async_trait::async_trait;

use crate::dispatch::EndpointTarget;

/// Raw provider response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues resolved requests. Implemented by [`HttpTransport`]; tests may substitute their own.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        target: &EndpointTarget,
        credential: &ApiCredential,
    ) -> Result<TransportResponse, TransportError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Other(String),
}
