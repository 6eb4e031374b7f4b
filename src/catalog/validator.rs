//! Catalog validator
//!
//! Structural checks run once when a catalog is loaded, so the resolver can rely on
//! every input mode producing exactly one of {structured params, single `url`}.

use super::config::{Catalog, DomainDef, OperationDef};
use super::CatalogError;
use std::collections::HashSet;

/// Validates catalog structure and cross references.
#[derive(Debug, Default)]
pub struct CatalogValidator;

impl CatalogValidator {
    pub fn new() -> Self {
        Self
    }

    /// Validate the whole catalog, reporting every problem found.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let mut issues = Vec::new();

        if catalog.version.trim().is_empty() {
            issues.push("version must be non-empty".to_string());
        }

        for (name, options) in &catalog.option_sets {
            let mut keys = HashSet::new();
            for opt in options {
                if opt.name.trim().is_empty() || opt.key.trim().is_empty() {
                    issues.push(format!("option set '{}' has an option without name or key", name));
                }
                if !keys.insert(opt.key.as_str()) {
                    issues.push(format!("option set '{}' repeats wire key '{}'", name, opt.key));
                }
            }
        }

        if catalog.domains.is_empty() {
            issues.push("catalog declares no domains".to_string());
        }

        let mut domain_ids = HashSet::new();
        for domain in &catalog.domains {
            if !domain_ids.insert(domain.id.as_str()) {
                issues.push(format!("duplicate domain '{}'", domain.id));
            }
            self.validate_domain(catalog, domain, &mut issues);
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::ValidationError(issues.join("; ")))
        }
    }

    fn validate_domain(&self, catalog: &Catalog, domain: &DomainDef, issues: &mut Vec<String>) {
        let at = format!("domains.{}", domain.id);

        if domain.id.trim().is_empty() {
            issues.push("domain with empty id".to_string());
        }
        if domain.operation_selector.trim().is_empty() {
            issues.push(format!("{}: operation_selector must be non-empty", at));
        }
        if domain.options_field.trim().is_empty() {
            issues.push(format!("{}: options_field must be non-empty", at));
        }
        if let Some(path) = &domain.parser_path {
            if !path.starts_with('/') {
                issues.push(format!("{}: parser_path '{}' must start with '/'", at, path));
            }
        }

        let mut tlds = HashSet::new();
        for tld in &domain.tlds {
            if !tlds.insert(tld.as_str()) {
                issues.push(format!("{}: duplicate tld '{}'", at, tld));
            }
        }

        let mut op_ids = HashSet::new();
        for op in &domain.operations {
            if !op_ids.insert(op.id.as_str()) {
                issues.push(format!("{}: duplicate operation '{}'", at, op.id));
            }
            self.validate_operation(catalog, &at, op, issues);
        }
    }

    fn validate_operation(
        &self,
        catalog: &Catalog,
        domain_at: &str,
        op: &OperationDef,
        issues: &mut Vec<String>,
    ) {
        let at = format!("{}.operations.{}", domain_at, op.id);

        if !op.path.starts_with('/') {
            issues.push(format!("{}: path '{}' must start with '/'", at, op.path));
        }
        if op.input_selector.trim().is_empty() {
            issues.push(format!("{}: input_selector must be non-empty", at));
        }
        if op.modes.is_empty() {
            issues.push(format!("{}: no input modes", at));
        }
        if op.mode(&op.default_mode).is_none() {
            issues.push(format!(
                "{}: default_mode '{}' is not one of {:?}",
                at,
                op.default_mode,
                op.mode_ids()
            ));
        }
        for set in &op.option_sets {
            if catalog.option_set(set).is_none() {
                issues.push(format!("{}: unknown option set '{}'", at, set));
            }
        }

        let mut mode_ids = HashSet::new();
        for mode in &op.modes {
            if !mode_ids.insert(mode.id.as_str()) {
                issues.push(format!("{}: duplicate mode '{}'", at, mode.id));
            }
            if let Err(e) = mode.binding() {
                issues.push(format!("{}: {}", at, e));
                continue;
            }
            if !mode.params.is_empty() && mode.params.iter().all(|p| p.optional) {
                issues.push(format!(
                    "{}.{}: params need at least one required field",
                    at, mode.id
                ));
            }
            let mut keys = HashSet::new();
            for param in &mode.params {
                if param.field.trim().is_empty() || param.key.trim().is_empty() {
                    issues.push(format!("{}.{}: param without field or key", at, mode.id));
                }
                // A structured mode must never emit the URL-mode key.
                if param.key == "url" {
                    issues.push(format!("{}.{}: params may not use the 'url' key", at, mode.id));
                }
                if !keys.insert(param.key.as_str()) {
                    issues.push(format!("{}.{}: duplicate key '{}'", at, mode.id, param.key));
                }
            }
        }
    }
}
