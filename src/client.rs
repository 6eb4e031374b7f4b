//! ScrapeOps client.
//!
//! Resolution lives in [`crate::dispatch`]; this module adds the network call,
//! provider error mapping and response decoding. Implementation details are split
//! into submodules under `src/client/`.

pub mod builder;
pub mod core;
pub mod error_mapping;
mod response;

pub use builder::ScrapeOpsClientBuilder;
pub use core::ScrapeOpsClient;
pub use error_mapping::{BLOCKED_HINT, BLOCKED_MARKER};
