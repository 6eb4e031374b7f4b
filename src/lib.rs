//! # scrapeops-rust
//!
//! ScrapeOps 请求分发器：将调用方的请求描述解析为 Proxy、Parser 与 Data 三类接口的出站请求。
//!
//! Request dispatcher for the ScrapeOps web-scraping service. A caller describes what
//! it wants (an API family, a target site, an operation and an input mode) and the
//! dispatcher resolves it into exactly one outbound HTTP request.
//!
//! ## Overview
//!
//! - **Proxy API**: `GET|POST https://proxy.scrapeops.io/v1/` fetches any URL through
//!   the proxy, with rendering, geo, bypass and session options.
//! - **Parser API**: `POST https://parser.scrapeops.io/v2/{domain}` turns fetched HTML
//!   into structured data.
//! - **Data API**: `GET https://proxy.scrapeops.io/v1/structured-data/{domain}/{operation}`
//!   returns structured records for Amazon, eBay, Walmart, Indeed and Redfin.
//!
//! The Parser and Data mappings are a declarative [`catalog`] interpreted by one
//! generic resolver. Resolution is pure and deterministic; the credential is only
//! attached by the [`transport`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scrapeops_rust::{RequestSpec, ScrapeOpsClient};
//!
//! #[tokio::main]
//! async fn main() -> scrapeops_rust::Result<()> {
//!     let client = ScrapeOpsClient::new("your-api-key").await?;
//!
//!     let spec = RequestSpec::data("amazon", "product")
//!         .input_mode("asin")
//!         .field("amazonProductAsin", "B08N5WRWNW")
//!         .build();
//!     let product = client.execute(&spec).await?;
//!     println!("{}", product);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`catalog`] | Declarative endpoint table, loader and validator |
//! | [`dispatch`] | Request specs, endpoint targets and the resolvers |
//! | [`geo`] | Shared geo options and option-set forwarding |
//! | [`transport`] | HTTP transport and credential handling |
//! | [`client`] | Client, builder, provider error mapping |
//! | [`items`] | Per-item execution with continue-on-fail |

pub mod catalog;
pub mod client;
pub mod dispatch;
pub mod geo;
pub mod items;
pub mod transport;

// Re-export main types for convenience
pub use client::{ScrapeOpsClient, ScrapeOpsClientBuilder};
pub use dispatch::{
    resolve, ApiFamily, BaseUrls, Dispatcher, EndpointTarget, HttpMethod, QueryValue, RequestSpec,
};
pub use geo::GeoOptions;
pub use items::{ItemExecutor, ItemOutput, WorkItem};
pub use transport::ApiCredential;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
