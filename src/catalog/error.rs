//! Catalog error types

/// Catalog error types
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to load catalog from {path}: {reason}{}", .hint.as_ref().map(|h| format!("\n Hint: {}", h)).unwrap_or_default())]
    LoadError {
        path: String,
        reason: String,
        hint: Option<String>,
    },

    #[error("Catalog validation failed: {0}")]
    ValidationError(String),

    #[error("Input mode '{mode}' is invalid: {reason}")]
    InvalidMode { mode: String, reason: String },

    #[error("YAML syntax error: {0}")]
    YamlError(String),
}

impl CatalogError {
    /// Attach an actionable hint to the error
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        if let CatalogError::LoadError { hint: ref mut slot, .. } = self {
            *slot = Some(hint.into());
        }
        self
    }
}
