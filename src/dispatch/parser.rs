//! Parser API resolution: `POST {parser_base}{parser_path}` with `{url, html}`.

use serde_json::json;

use super::fields;
use super::spec::RequestSpec;
use super::target::{EndpointTarget, HttpMethod, Query};
use crate::catalog::Catalog;
use crate::error::{Error, ErrorContext};

pub(crate) const DOMAIN_FIELD: &str = "parserDomain";
pub(crate) const URL_FIELD: &str = "parserUrl";
pub(crate) const HTML_FIELD: &str = "parserHtml";

const SOURCE: &str = "parser_resolver";

pub(crate) fn resolve(
    catalog: &Catalog,
    base_url: &str,
    spec: &RequestSpec,
) -> crate::Result<EndpointTarget> {
    let domain_id = match spec.domain() {
        Some(d) => d.to_string(),
        None => fields::required_text(spec.fields(), DOMAIN_FIELD, SOURCE)?,
    };
    let path = catalog
        .domain(&domain_id)
        .and_then(|d| d.parser_path.as_deref())
        .ok_or_else(|| {
            let supported: Vec<&str> = catalog.parser_domains().map(|d| d.id.as_str()).collect();
            Error::validation_with_context(
                format!("Unsupported parser domain: {}", domain_id),
                ErrorContext::new()
                    .with_field_path(DOMAIN_FIELD)
                    .with_details(format!("expected one of {}", supported.join(", ")))
                    .with_source(SOURCE),
            )
        })?;

    let url = fields::required_text(spec.fields(), URL_FIELD, SOURCE)?;
    let html = fields::required_text(spec.fields(), HTML_FIELD, SOURCE)?;

    Ok(EndpointTarget {
        method: HttpMethod::Post,
        base_url: base_url.to_string(),
        path: path.to_string(),
        query: Query::new(),
        body: Some(json!({ "url": url, "html": html })),
    })
}
