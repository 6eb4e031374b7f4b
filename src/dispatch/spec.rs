//! Caller-facing request description

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ErrorContext};

/// Flat host parameter map: internal field name -> value.
pub type Fields = BTreeMap<String, Value>;

/// Host field selecting the API family.
pub const API_TYPE_FIELD: &str = "apiType";

/// Which ScrapeOps product a request targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ApiFamily {
    #[serde(rename = "proxyApi")]
    Proxy,
    #[serde(rename = "parserApi")]
    Parser,
    #[serde(rename = "dataApi")]
    Data,
}

impl ApiFamily {
    /// Host-side identifier (`proxyApi`, `parserApi`, `dataApi`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiFamily::Proxy => "proxyApi",
            ApiFamily::Parser => "parserApi",
            ApiFamily::Data => "dataApi",
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApiFamily {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "proxyApi" => Ok(ApiFamily::Proxy),
            "parserApi" => Ok(ApiFamily::Parser),
            "dataApi" => Ok(ApiFamily::Data),
            other => Err(Error::validation_with_context(
                format!("Unsupported API type: {}. Please select a valid API type.", other),
                ErrorContext::new()
                    .with_field_path(API_TYPE_FIELD)
                    .with_details("expected one of proxyApi, parserApi, dataApi"),
            )),
        }
    }
}

/// Everything needed to resolve one outbound call.
///
/// Immutable once built. Unset selectors (`domain`, `operation`, `input_mode`) fall
/// back to the host selector fields named in the catalog, then to catalog defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSpec {
    api_family: ApiFamily,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_mode: Option<String>,
    #[serde(default)]
    fields: Fields,
    /// Upstream item JSON, sent as the body of Proxy POST calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl RequestSpec {
    pub fn builder(api_family: ApiFamily) -> RequestSpecBuilder {
        RequestSpecBuilder {
            spec: RequestSpec {
                api_family,
                domain: None,
                operation: None,
                input_mode: None,
                fields: Fields::new(),
                payload: None,
            },
        }
    }

    /// Proxy call for `url`.
    pub fn proxy(url: impl Into<String>) -> RequestSpecBuilder {
        Self::builder(ApiFamily::Proxy).field("url", Value::String(url.into()))
    }

    /// Parser call for already-fetched `html`.
    pub fn parser(
        domain: impl Into<String>,
        url: impl Into<String>,
        html: impl Into<String>,
    ) -> RequestSpecBuilder {
        Self::builder(ApiFamily::Parser)
            .domain(domain)
            .field("parserUrl", Value::String(url.into()))
            .field("parserHtml", Value::String(html.into()))
    }

    /// Structured-data call for `domain`/`operation`.
    pub fn data(domain: impl Into<String>, operation: impl Into<String>) -> RequestSpecBuilder {
        Self::builder(ApiFamily::Data)
            .domain(domain)
            .operation(operation)
    }

    /// Build from a flat host parameter map. `apiType` selects the family and
    /// defaults to `proxyApi`; all selectors stay in `fields`.
    pub fn from_parameters(fields: Fields, payload: Option<Value>) -> crate::Result<Self> {
        let api_family = match fields.get(API_TYPE_FIELD) {
            None | Some(Value::Null) => ApiFamily::Proxy,
            Some(Value::String(s)) => s.parse()?,
            Some(other) => {
                return Err(Error::validation_with_context(
                    format!("Unsupported API type: {}. Please select a valid API type.", other),
                    ErrorContext::new().with_field_path(API_TYPE_FIELD),
                ))
            }
        };
        Ok(RequestSpec {
            api_family,
            domain: None,
            operation: None,
            input_mode: None,
            fields,
            payload,
        })
    }

    pub fn api_family(&self) -> ApiFamily {
        self.api_family
    }

    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }

    pub fn operation(&self) -> Option<&str> {
        self.operation.as_deref()
    }

    pub fn input_mode(&self) -> Option<&str> {
        self.input_mode.as_deref()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }
}

/// Builder for [`RequestSpec`].
#[derive(Debug, Clone)]
pub struct RequestSpecBuilder {
    spec: RequestSpec,
}

impl RequestSpecBuilder {
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.spec.domain = Some(domain.into());
        self
    }

    pub fn operation(mut self, operation: impl Into<String>) -> Self {
        self.spec.operation = Some(operation.into());
        self
    }

    pub fn input_mode(mut self, mode: impl Into<String>) -> Self {
        self.spec.input_mode = Some(mode.into());
        self
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.spec.fields.insert(name.into(), value.into());
        self
    }

    pub fn fields(mut self, fields: Fields) -> Self {
        self.spec.fields.extend(fields);
        self
    }

    pub fn payload(mut self, payload: Value) -> Self {
        self.spec.payload = Some(payload);
        self
    }

    pub fn build(self) -> RequestSpec {
        self.spec
    }
}
