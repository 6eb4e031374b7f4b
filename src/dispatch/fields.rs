//! Typed reads from the flat host parameter map

use serde_json::{Map, Value};

use super::spec::Fields;
use crate::error::{Error, ErrorContext};

/// Text form of a scalar field. Empty strings and non-scalars read as `None`.
pub(crate) fn text(fields: &Fields, name: &str) -> Option<String> {
    fields.get(name).and_then(scalar_text)
}

pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Required scalar field; missing or empty values are a local error.
pub(crate) fn required_text(fields: &Fields, name: &str, source: &str) -> crate::Result<String> {
    text(fields, name).ok_or_else(|| {
        Error::validation_with_context(
            format!("Missing required field value: {}", name),
            ErrorContext::new()
                .with_field_path(name)
                .with_source(source),
        )
    })
}

/// Options object stored under `name`. Absent or null reads as an empty object.
pub(crate) fn object<'a>(
    fields: &'a Fields,
    name: &str,
    source: &str,
) -> crate::Result<Option<&'a Map<String, Value>>> {
    match fields.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(Error::validation_with_context(
            format!("{} must be an object", name),
            ErrorContext::new()
                .with_field_path(name)
                .with_source(source),
        )),
    }
}
