//! 请求分发：将调用方的 RequestSpec 解析为确定的出站请求。
//!
//! # Request Dispatch
//!
//! Pure resolution of a [`RequestSpec`] into an [`EndpointTarget`]. No I/O happens
//! here; every local error (unsupported selector, missing field, malformed option)
//! is raised before the transport is ever involved.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`spec`] | `RequestSpec`, `ApiFamily` and the request builder |
//! | [`target`] | `EndpointTarget`, `QueryValue`, wire query flattening |
//! | [`proxy`] | Proxy API options and resolution |
//! | `parser` | Parser API resolution |
//! | `data` | Catalog-driven Data API resolution |
//!
//! ## Example
//!
//! ```rust
//! use scrapeops_rust::dispatch::{self, RequestSpec};
//!
//! let spec = RequestSpec::data("amazon", "product")
//!     .input_mode("asin")
//!     .field("amazonProductAsin", "B000123")
//!     .build();
//! let target = dispatch::resolve(&spec).unwrap();
//! assert_eq!(target.path, "/structured-data/amazon/product");
//! assert_eq!(target.query_str("asin"), Some("B000123"));
//! ```

mod data;
mod fields;
mod parser;
pub mod proxy;
pub mod spec;
pub mod target;

pub use proxy::{BypassProfile, DeviceType, FileType, PremiumTier, ProxyOptions, ReturnType};
pub use spec::{ApiFamily, Fields, RequestSpec, RequestSpecBuilder};
pub use target::{EndpointTarget, HttpMethod, Query, QueryValue};

use std::sync::Arc;

use crate::catalog::{self, Catalog};

pub const DEFAULT_PROXY_BASE_URL: &str = "https://proxy.scrapeops.io/v1";
pub const DEFAULT_PARSER_BASE_URL: &str = "https://parser.scrapeops.io";

/// Provider base URLs. The Data API lives under the proxy host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseUrls {
    pub proxy: String,
    pub parser: String,
    pub data: String,
}

impl Default for BaseUrls {
    fn default() -> Self {
        Self {
            proxy: DEFAULT_PROXY_BASE_URL.to_string(),
            parser: DEFAULT_PARSER_BASE_URL.to_string(),
            data: DEFAULT_PROXY_BASE_URL.to_string(),
        }
    }
}

impl BaseUrls {
    /// Point every family at one server (`{base}/v1` for proxy/data, `{base}` for parser).
    pub fn single_host(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            proxy: format!("{}/v1", base),
            parser: base.to_string(),
            data: format!("{}/v1", base),
        }
    }
}

/// How the client should decode a successful response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Body returned as-is, as a JSON string
    Raw,
    /// Body parsed as JSON, falling back to the raw string
    LenientJson,
}

/// A resolved target plus what the client needs to execute and report it.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub target: EndpointTarget,
    pub response_format: ResponseFormat,
    /// Label used in provider error messages ("Proxy", "Parser", "Amazon", ...)
    pub error_label: String,
}

/// Resolves specs against a catalog and a set of base URLs.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    catalog: Arc<Catalog>,
    base_urls: BaseUrls,
}

impl Dispatcher {
    pub fn new(catalog: Arc<Catalog>, base_urls: BaseUrls) -> Self {
        Self { catalog, base_urls }
    }

    /// Dispatcher over the embedded catalog and the production URLs.
    pub fn builtin() -> crate::Result<Self> {
        Ok(Self::new(catalog::builtin()?, BaseUrls::default()))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn base_urls(&self) -> &BaseUrls {
        &self.base_urls
    }

    /// Resolve `spec` into its outbound request. Deterministic and side-effect free.
    pub fn resolve(&self, spec: &RequestSpec) -> crate::Result<EndpointTarget> {
        match spec.api_family() {
            ApiFamily::Proxy => proxy::resolve(&self.base_urls.proxy, spec),
            ApiFamily::Parser => parser::resolve(&self.catalog, &self.base_urls.parser, spec),
            ApiFamily::Data => data::resolve(&self.catalog, &self.base_urls.data, spec),
        }
    }

    /// Resolve and attach the decoding and error-reporting details.
    pub fn prepare(&self, spec: &RequestSpec) -> crate::Result<PreparedRequest> {
        let target = self.resolve(spec)?;
        let (response_format, error_label) = match spec.api_family() {
            ApiFamily::Proxy => {
                let format = match proxy::return_type(spec)? {
                    ReturnType::Json => ResponseFormat::LenientJson,
                    ReturnType::Default => ResponseFormat::Raw,
                };
                (format, "Proxy".to_string())
            }
            ApiFamily::Parser => (ResponseFormat::LenientJson, "Parser".to_string()),
            ApiFamily::Data => {
                let domain = data::select_domain(&self.catalog, spec)?;
                (ResponseFormat::LenientJson, domain.error_label())
            }
        };
        Ok(PreparedRequest {
            target,
            response_format,
            error_label,
        })
    }

    /// Credential test call: a plain proxied fetch of a known echo endpoint.
    pub fn credential_test(&self) -> EndpointTarget {
        let mut query = Query::new();
        query.insert("url".into(), QueryValue::Str(CREDENTIAL_TEST_URL.into()));
        EndpointTarget {
            method: HttpMethod::Get,
            base_url: self.base_urls.proxy.clone(),
            path: "/".into(),
            query,
            body: None,
        }
    }
}

/// Target fetched by the credential test.
pub const CREDENTIAL_TEST_URL: &str = "https://httpbin.org/ip";

/// Resolve `spec` with the embedded catalog and production URLs.
pub fn resolve(spec: &RequestSpec) -> crate::Result<EndpointTarget> {
    Dispatcher::builtin()?.resolve(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_family_routing() {
        let dispatcher = Dispatcher::builtin().unwrap();
        let proxy = dispatcher
            .resolve(&RequestSpec::proxy("https://example.com").build())
            .unwrap();
        assert_eq!(proxy.endpoint(), "https://proxy.scrapeops.io/v1/");

        let parser = dispatcher
            .resolve(&RequestSpec::parser("amazon", "https://a.com", "<html/>").build())
            .unwrap();
        assert_eq!(parser.endpoint(), "https://parser.scrapeops.io/v2/amazon");

        let data = dispatcher
            .resolve(
                &RequestSpec::data("ebay", "feedback")
                    .input_mode("username")
                    .field("ebayFeedbackUsername", "seller1")
                    .build(),
            )
            .unwrap();
        assert_eq!(
            data.endpoint(),
            "https://proxy.scrapeops.io/v1/structured-data/ebay/feedback"
        );
    }

    #[test]
    fn test_from_parameters_end_to_end() {
        let mut fields = Fields::new();
        fields.insert("apiType".into(), json!("dataApi"));
        fields.insert("dataDomain".into(), json!("amazon"));
        fields.insert("amazonApiType".into(), json!("product"));
        fields.insert("amazonProductInputType".into(), json!("asin"));
        fields.insert("amazonProductAsin".into(), json!("B000123"));
        let spec = RequestSpec::from_parameters(fields, None).unwrap();
        let target = resolve(&spec).unwrap();
        assert_eq!(target.path, "/structured-data/amazon/product");
        assert_eq!(target.query.len(), 1);
        assert_eq!(target.query_str("asin"), Some("B000123"));
    }

    #[test]
    fn test_prepare_labels() {
        let dispatcher = Dispatcher::builtin().unwrap();
        let prepared = dispatcher
            .prepare(
                &RequestSpec::data("ebay", "search")
                    .input_mode("query")
                    .field("ebaySearchQuery", "lamp")
                    .build(),
            )
            .unwrap();
        assert_eq!(prepared.error_label, "Ebay");
        assert_eq!(prepared.response_format, ResponseFormat::LenientJson);

        let prepared = dispatcher
            .prepare(&RequestSpec::proxy("https://example.com").build())
            .unwrap();
        assert_eq!(prepared.error_label, "Proxy");
        assert_eq!(prepared.response_format, ResponseFormat::Raw);
    }

    #[test]
    fn test_single_host_urls() {
        let urls = BaseUrls::single_host("http://127.0.0.1:1234/");
        assert_eq!(urls.proxy, "http://127.0.0.1:1234/v1");
        assert_eq!(urls.parser, "http://127.0.0.1:1234");
    }

    #[test]
    fn test_credential_test_target() {
        let target = Dispatcher::builtin().unwrap().credential_test();
        assert_eq!(target.query_str("url"), Some(CREDENTIAL_TEST_URL));
        assert!(!target.query.contains_key("api_key"));
    }
}
