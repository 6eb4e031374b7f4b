//! 端点目录：以声明式表格描述各领域、操作与输入模式到 ScrapeOps 接口的映射。
//!
//! # Endpoint Catalog
//!
//! The Parser and Data API mappings are data, not code. The catalog maps
//! `(domain, operation)` to one fixed endpoint path and each input mode to either a
//! single `url` parameter or a list of field renames (internal host field name to
//! provider wire key). One generic resolver in [`crate::dispatch`] interprets it.
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Catalog structures (domains, operations, modes, option sets) |
//! | [`loader`] | Loading from the embedded YAML, files or strings |
//! | [`validator`] | Structural validation run at load time |
//! | [`error`] | Catalog-specific error types |
//!
//! ## Example
//!
//! ```rust
//! use scrapeops_rust::catalog;
//!
//! let catalog = catalog::builtin().unwrap();
//! let product = catalog.domain("amazon").and_then(|d| d.operation("product")).unwrap();
//! assert_eq!(product.path, "/structured-data/amazon/product");
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod validator;

pub use config::*;
pub use error::CatalogError;
pub use loader::{builtin, CatalogLoader};
pub use validator::CatalogValidator;
