//! Data API resolution
//!
//! One generic resolver over the catalog: pick the domain, operation and input mode,
//! then emit either the single `url` parameter or the renamed identifier fields,
//! followed by geo options and the operation's option sets.

use super::fields;
use super::spec::RequestSpec;
use super::target::{EndpointTarget, HttpMethod, Query, QueryValue};
use crate::catalog::{Catalog, DomainDef, ModeBinding, OperationDef};
use crate::error::{Error, ErrorContext};
use crate::geo::{self, GeoOptions};

pub(crate) const DOMAIN_FIELD: &str = "dataDomain";

const SOURCE: &str = "data_resolver";

/// Domain definition a Data spec selects.
pub(crate) fn select_domain<'c>(catalog: &'c Catalog, spec: &RequestSpec) -> crate::Result<&'c DomainDef> {
    let domain_id = match spec.domain() {
        Some(d) => d.to_string(),
        None => fields::required_text(spec.fields(), DOMAIN_FIELD, SOURCE)?,
    };
    catalog.domain(&domain_id).ok_or_else(|| {
        Error::validation_with_context(
            format!(
                "Unsupported data domain: {}. Please select a supported domain.",
                domain_id
            ),
            ErrorContext::new()
                .with_field_path(DOMAIN_FIELD)
                .with_details(format!("expected one of {}", catalog.domain_ids().join(", ")))
                .with_source(SOURCE),
        )
    })
}

fn select_operation<'c>(domain: &'c DomainDef, spec: &RequestSpec) -> crate::Result<&'c OperationDef> {
    let op_id = match spec.operation() {
        Some(op) => op.to_string(),
        None => fields::required_text(spec.fields(), &domain.operation_selector, SOURCE)?,
    };
    domain.operation(&op_id).ok_or_else(|| {
        Error::validation_with_context(
            format!(
                "Unsupported {} API type: {}. Please select one of: {}.",
                domain.label,
                op_id,
                domain.operation_ids().join(", ")
            ),
            ErrorContext::new()
                .with_field_path(domain.operation_selector.clone())
                .with_source(SOURCE),
        )
    })
}

pub(crate) fn resolve(
    catalog: &Catalog,
    base_url: &str,
    spec: &RequestSpec,
) -> crate::Result<EndpointTarget> {
    let domain = select_domain(catalog, spec)?;
    let operation = select_operation(domain, spec)?;

    let mode_id = match spec.input_mode() {
        Some(m) => m.to_string(),
        None => fields::text(spec.fields(), &operation.input_selector)
            .unwrap_or_else(|| operation.default_mode.clone()),
    };
    let mode = operation.mode(&mode_id).ok_or_else(|| {
        Error::validation_with_context(
            format!(
                "Unsupported input type for {} {}: {}",
                domain.label, operation.id, mode_id
            ),
            ErrorContext::new()
                .with_field_path(operation.input_selector.clone())
                .with_details(format!("expected one of {}", operation.mode_ids().join(", ")))
                .with_source(SOURCE),
        )
    })?;

    let mut query = Query::new();
    match mode.binding()? {
        ModeBinding::Url(field) => {
            let url = fields::required_text(spec.fields(), field, SOURCE)?;
            query.insert("url".into(), QueryValue::Str(url));
        }
        ModeBinding::Params(params) => {
            for param in params {
                let value = if param.optional {
                    fields::text(spec.fields(), &param.field)
                } else {
                    Some(fields::required_text(spec.fields(), &param.field, SOURCE)?)
                };
                if let Some(value) = value {
                    query.insert(param.key.clone(), QueryValue::Str(value));
                }
            }
        }
    }

    // Identifier parameters set above are never overridden by options.
    let options = fields::object(spec.fields(), &domain.options_field, SOURCE)?;
    GeoOptions::from_options(options).apply(domain, &domain.options_field, &mut query)?;
    for set_name in &operation.option_sets {
        if let Some(set) = catalog.option_set(set_name) {
            geo::apply_option_set(set, options, &domain.options_field, &mut query)?;
        }
    }

    Ok(EndpointTarget {
        method: HttpMethod::Get,
        base_url: base_url.to_string(),
        path: operation.path.clone(),
        query,
        body: None,
    })
}
