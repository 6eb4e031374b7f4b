//! Catalog loader with support for the embedded catalog, local files and strings

use super::config::Catalog;
use super::validator::CatalogValidator;
use super::CatalogError;
use once_cell::sync::Lazy;
use std::path::Path;
use std::sync::Arc;

const BUILTIN_CATALOG: &str = include_str!("scrapeops.yaml");

static BUILTIN: Lazy<Result<Arc<Catalog>, String>> = Lazy::new(|| {
    CatalogLoader::new()
        .load_from_str(BUILTIN_CATALOG, "<builtin>")
        .map(Arc::new)
        .map_err(|e| e.to_string())
});

/// Shared handle to the embedded catalog, parsed and validated on first use.
pub fn builtin() -> Result<Arc<Catalog>, CatalogError> {
    match &*BUILTIN {
        Ok(catalog) => Ok(catalog.clone()),
        Err(reason) => Err(CatalogError::LoadError {
            path: "<builtin>".into(),
            reason: reason.clone(),
            hint: None,
        }),
    }
}

/// Catalog loader. Every catalog it returns has passed [`CatalogValidator`].
pub struct CatalogLoader {
    validator: CatalogValidator,
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self {
            validator: CatalogValidator::new(),
        }
    }

    /// Parse a fresh copy of the embedded catalog.
    pub fn load_builtin(&self) -> Result<Catalog, CatalogError> {
        self.load_from_str(BUILTIN_CATALOG, "<builtin>")
    }

    /// Load a catalog from a YAML or JSON file.
    pub async fn load_from_file(&self, path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            CatalogError::LoadError {
                path: path.display().to_string(),
                reason: e.to_string(),
                hint: None,
            }
            .with_hint("Check SCRAPEOPS_CATALOG_PATH or the path passed to the loader")
        })?;
        self.load_from_str(&content, &path.display().to_string())
    }

    /// Parse and validate catalog text. JSON is accepted too, being a YAML subset.
    pub fn load_from_str(&self, content: &str, origin: &str) -> Result<Catalog, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(content)
            .map_err(|e| CatalogError::YamlError(format!("{}: {}", origin, e)))?;
        self.validator.validate(&catalog)?;
        tracing::debug!(
            origin,
            version = catalog.version.as_str(),
            domains = catalog.domains.len(),
            "scrapeops catalog loaded"
        );
        Ok(catalog)
    }
}

impl Default for CatalogLoader {
    fn default() -> Self {
        Self::new()
    }
}
