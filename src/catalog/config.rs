//! Catalog configuration structures
//!
//! This module contains the structures deserialized from the endpoint catalog.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::CatalogError;

/// Root of the endpoint catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub version: String,
    /// Named option groups an operation can opt into (e.g. "job_filters")
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub option_sets: BTreeMap<String, Vec<OptionDef>>,
    pub domains: Vec<DomainDef>,
}

/// A supported target site (Amazon, eBay, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainDef {
    pub id: String,
    pub label: String,
    /// Parser API path for this domain; `None` when the parser does not cover it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser_path: Option<String>,
    /// Host field holding the selected operation (e.g. "amazonApiType")
    pub operation_selector: String,
    /// Host field holding the advanced options object (e.g. "amazonApiOptions")
    pub options_field: String,
    /// Legal top-level-domain overrides. Empty means the domain takes no geo options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tlds: Vec<String>,
    #[serde(default)]
    pub operations: Vec<OperationDef>,
}

/// One structured-data endpoint of a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationDef {
    pub id: String,
    pub path: String,
    /// Host field holding the selected input mode (e.g. "amazonProductInputType")
    pub input_selector: String,
    pub default_mode: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub option_sets: Vec<String>,
    pub modes: Vec<InputModeDef>,
}

/// Input mode of an operation. Exactly one of `url_field` / `params` is set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputModeDef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_field: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<ParamRename>,
}

/// Rename of an internal field to its wire query key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamRename {
    pub field: String,
    pub key: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Advanced option exposed through an option set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionDef {
    /// Key inside the host's options object
    pub name: String,
    /// Wire query key
    pub key: String,
    pub kind: OptionKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    String,
    Number,
    Boolean,
}

/// Resolved binding of an input mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeBinding<'a> {
    /// Send the named field as the single `url` parameter
    Url(&'a str),
    /// Send the listed fields under their wire keys
    Params(&'a [ParamRename]),
}

impl Catalog {
    pub fn domain(&self, id: &str) -> Option<&DomainDef> {
        self.domains.iter().find(|d| d.id == id)
    }

    pub fn option_set(&self, name: &str) -> Option<&[OptionDef]> {
        self.option_sets.get(name).map(Vec::as_slice)
    }

    pub fn domain_ids(&self) -> Vec<&str> {
        self.domains.iter().map(|d| d.id.as_str()).collect()
    }

    /// Domains the Parser API accepts.
    pub fn parser_domains(&self) -> impl Iterator<Item = &DomainDef> {
        self.domains.iter().filter(|d| d.parser_path.is_some())
    }
}

impl DomainDef {
    pub fn operation(&self, id: &str) -> Option<&OperationDef> {
        self.operations.iter().find(|o| o.id == id)
    }

    pub fn operation_ids(&self) -> Vec<&str> {
        self.operations.iter().map(|o| o.id.as_str()).collect()
    }

    /// Domain id with its first letter upper-cased, used in provider error messages.
    pub fn error_label(&self) -> String {
        capitalize(&self.id)
    }

    pub fn accepts_tld(&self, tld: &str) -> bool {
        self.tlds.iter().any(|t| t == tld)
    }
}

impl OperationDef {
    pub fn mode(&self, id: &str) -> Option<&InputModeDef> {
        self.modes.iter().find(|m| m.id == id)
    }

    pub fn mode_ids(&self) -> Vec<&str> {
        self.modes.iter().map(|m| m.id.as_str()).collect()
    }
}

impl InputModeDef {
    pub fn binding(&self) -> Result<ModeBinding<'_>, CatalogError> {
        match (&self.url_field, self.params.is_empty()) {
            (Some(field), true) => Ok(ModeBinding::Url(field)),
            (None, false) => Ok(ModeBinding::Params(&self.params)),
            (Some(_), false) => Err(CatalogError::InvalidMode {
                mode: self.id.clone(),
                reason: "declares both url_field and params".into(),
            }),
            (None, true) => Err(CatalogError::InvalidMode {
                mode: self.id.clone(),
                reason: "declares neither url_field nor params".into(),
            }),
        }
    }
}

pub(crate) fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_bindings_compare() {
        let url = InputModeDef {
            id: "url".into(),
            url_field: Some("shopProductUrl".into()),
            params: Vec::new(),
        };
        assert_eq!(url.binding().unwrap(), ModeBinding::Url("shopProductUrl"));

        let rename = ParamRename {
            field: "shopProductId".into(),
            key: "product_id".into(),
            optional: false,
        };
        let by_id = InputModeDef {
            id: "productId".into(),
            url_field: None,
            params: vec![rename.clone()],
        };
        assert_eq!(by_id.binding().unwrap(), ModeBinding::Params(&[rename]));
        assert_ne!(by_id.binding().unwrap(), url.binding().unwrap());
    }

    #[test]
    fn test_error_label_capitalizes_id() {
        assert_eq!(capitalize("ebay"), "Ebay");
        assert_eq!(capitalize(""), "");
    }
}
