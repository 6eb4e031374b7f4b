//! Geo targeting and option-set handling for the Data API.
//!
//! Every geo-aware domain takes the same `{country, tld}` shape; the legal `tld`
//! values come from the domain's catalog entry. Option sets (e.g. the job search
//! filters) are forwarded by kind: strings when non-empty, numbers when non-zero,
//! booleans only when `true`.

use serde_json::{Map, Value};

use crate::catalog::{DomainDef, OptionDef, OptionKind};
use crate::dispatch::{Query, QueryValue};
use crate::error::{Error, ErrorContext};

/// Country / top-level-domain overrides shared by the geo-aware domains.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeoOptions {
    pub country: Option<String>,
    pub tld: Option<String>,
}

impl GeoOptions {
    /// Read `country` and `tld` from a domain's options object.
    pub fn from_options(options: Option<&Map<String, Value>>) -> Self {
        let read = |key: &str| {
            options
                .and_then(|o| o.get(key))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Self {
            country: read("country"),
            tld: read("tld"),
        }
    }

    /// Add the options to `query`, checking `tld` against the domain's legal set.
    /// Domains without a legal set take no geo options at all.
    pub fn apply(&self, domain: &DomainDef, field: &str, query: &mut Query) -> crate::Result<()> {
        if domain.tlds.is_empty() {
            return Ok(());
        }
        if let Some(tld) = &self.tld {
            if !domain.accepts_tld(tld) {
                return Err(Error::validation_with_context(
                    format!("Unsupported {} TLD: {}", domain.label, tld),
                    ErrorContext::new()
                        .with_field_path(format!("{}.tld", field))
                        .with_details(format!("expected one of {}", domain.tlds.join(", ")))
                        .with_source("geo"),
                ));
            }
            query
                .entry("tld".to_string())
                .or_insert_with(|| QueryValue::Str(tld.clone()));
        }
        if let Some(country) = &self.country {
            query
                .entry("country".to_string())
                .or_insert_with(|| QueryValue::Str(country.clone()));
        }
        Ok(())
    }
}

/// Forward the options of one option set that carry a meaningful value.
pub fn apply_option_set(
    set: &[OptionDef],
    options: Option<&Map<String, Value>>,
    field: &str,
    query: &mut Query,
) -> crate::Result<()> {
    let Some(options) = options else {
        return Ok(());
    };
    for def in set {
        let Some(value) = options.get(&def.name) else {
            continue;
        };
        if let Some(v) = option_value(def, value, field)? {
            query.entry(def.key.clone()).or_insert(v);
        }
    }
    Ok(())
}

fn option_value(def: &OptionDef, value: &Value, field: &str) -> crate::Result<Option<QueryValue>> {
    let mismatch = || {
        Error::validation_with_context(
            format!("Option {} expects a {} value", def.name, kind_name(def.kind)),
            ErrorContext::new()
                .with_field_path(format!("{}.{}", field, def.name))
                .with_source("geo"),
        )
    };
    match (def.kind, value) {
        (_, Value::Null) => Ok(None),
        (OptionKind::String, Value::String(s)) => {
            Ok((!s.trim().is_empty()).then(|| QueryValue::Str(s.clone())))
        }
        (OptionKind::String, Value::Number(n)) => Ok(Some(QueryValue::Str(n.to_string()))),
        (OptionKind::Number, Value::Number(n)) => {
            Ok((n.as_f64() != Some(0.0)).then(|| QueryValue::Number(n.clone())))
        }
        (OptionKind::Number, Value::String(s)) if s.trim().is_empty() => Ok(None),
        (OptionKind::Number, Value::String(s)) => {
            let n: serde_json::Number = s.trim().parse().map_err(|_| mismatch())?;
            Ok((n.as_f64() != Some(0.0)).then_some(QueryValue::Number(n)))
        }
        (OptionKind::Boolean, Value::Bool(b)) => Ok(b.then_some(QueryValue::Bool(true))),
        _ => Err(mismatch()),
    }
}

fn kind_name(kind: OptionKind) -> &'static str {
    match kind {
        OptionKind::String => "string",
        OptionKind::Number => "number",
        OptionKind::Boolean => "boolean",
    }
}
