//! Resolved outbound request

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Query parameters keyed by wire name. Sorted so resolution output is stable.
pub type Query = BTreeMap<String, QueryValue>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Bool(bool),
    Number(serde_json::Number),
    Str(String),
    /// Structured value (custom headers/cookies), sent in bracket notation: `headers[X-Foo]=bar`
    Structured(Value),
}

impl QueryValue {
    /// Convert a JSON value, keeping scalars as scalars.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Bool(b) => QueryValue::Bool(b),
            Value::Number(n) => QueryValue::Number(n),
            Value::String(s) => QueryValue::Str(s),
            other => QueryValue::Structured(other),
        }
    }

    fn push_pairs(&self, key: &str, out: &mut Vec<(String, String)>) {
        match self {
            QueryValue::Bool(b) => out.push((key.to_string(), b.to_string())),
            QueryValue::Number(n) => out.push((key.to_string(), n.to_string())),
            QueryValue::Str(s) => out.push((key.to_string(), s.clone())),
            QueryValue::Structured(v) => push_structured(key, v, out),
        }
    }
}

fn push_structured(key: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push((key.to_string(), b.to_string())),
        Value::Number(n) => out.push((key.to_string(), n.to_string())),
        Value::String(s) => out.push((key.to_string(), s.clone())),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                push_structured(&format!("{}[{}]", key, i), item, out);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                push_structured(&format!("{}[{}]", key, k), v, out);
            }
        }
    }
}

impl From<bool> for QueryValue {
    fn from(b: bool) -> Self {
        QueryValue::Bool(b)
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Str(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Str(s)
    }
}

impl From<u64> for QueryValue {
    fn from(n: u64) -> Self {
        QueryValue::Number(n.into())
    }
}

/// Fully-formed outbound request derived from a [`super::RequestSpec`].
///
/// Never carries the credential; the transport attaches it when sending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointTarget {
    pub method: HttpMethod,
    pub base_url: String,
    pub path: String,
    #[serde(default)]
    pub query: Query,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl EndpointTarget {
    /// Wire-level query pairs, structured values flattened.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut out = Vec::with_capacity(self.query.len());
        for (key, value) in &self.query {
            value.push_pairs(key, &mut out);
        }
        out
    }

    /// `base_url` + `path`, without query.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.path)
    }

    /// Complete URL with the query string encoded.
    pub fn url(&self) -> Result<url::Url, url::ParseError> {
        let mut url = url::Url::parse(&self.endpoint())?;
        let pairs = self.query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Ok(url)
    }

    pub fn query_str(&self, key: &str) -> Option<&str> {
        match self.query.get(key) {
            Some(QueryValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn query_bool(&self, key: &str) -> Option<bool> {
        match self.query.get(key) {
            Some(QueryValue::Bool(b)) => Some(*b),
            _ => None,
        }
    }
}
