use crate::catalog::CatalogError;
use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field name or catalog key that caused the error (e.g., "amazonProductAsin", "advancedOptions.bypass")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., legal values, upstream status)
    pub details: Option<String>,
    /// Source of the error (e.g., "proxy_resolver", "data_resolver")
    pub source: Option<String>,
    /// Index of the workflow item the call was made for
    pub item_index: Option<usize>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
            item_index: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_item_index(mut self, index: usize) -> Self {
        self.item_index = Some(index);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Unified error type for the dispatcher and client.
///
/// Local errors (`Validation`, `InputParse`, `Configuration`, `Catalog`) are always
/// raised before any network call. `Provider` and `Transport` come from the HTTP call.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Invalid JSON in {field}{}", format_context(.context))]
    InputParse {
        field: String,
        message: String,
        context: ErrorContext,
    },

    #[error("{message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("ScrapeOps {api} API request failed: {message}")]
    Provider {
        /// Label used in the message: "Proxy", "Parser" or the capitalized data domain
        api: String,
        status: Option<u16>,
        message: String,
        context: ErrorContext,
    },

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Network transport error: {0}")]
    Transport(#[from] crate::transport::TransportError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Helper function to format error context for display
fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(index) = ctx.item_index {
        parts.push(format!("item: {}", index));
    }
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

impl Error {
    /// Create a new validation error with structured context
    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    /// Create a new configuration error with structured context
    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    /// Malformed JSON in a user-supplied option. `field` is the display name ("Custom Headers").
    pub fn input_parse(field: impl Into<String>, err: &serde_json::Error) -> Self {
        let field = field.into();
        Error::InputParse {
            context: ErrorContext::new().with_field_path(field.clone()),
            field,
            message: err.to_string(),
        }
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Validation { context, .. }
            | Error::InputParse { context, .. }
            | Error::Configuration { context, .. }
            | Error::Provider { context, .. } => Some(context),
            _ => None,
        }
    }

    /// Attach the workflow item index to errors that carry a context.
    pub fn with_item_index(mut self, index: usize) -> Self {
        match &mut self {
            Error::Validation { context, .. }
            | Error::InputParse { context, .. }
            | Error::Configuration { context, .. }
            | Error::Provider { context, .. } => context.item_index = Some(index),
            _ => {}
        }
        self
    }

    /// True when the error was raised before any request left the process.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Error::Validation { .. }
                | Error::InputParse { .. }
                | Error::Configuration { .. }
                | Error::Catalog(_)
        )
    }
}
