//! Proxy API resolution
//!
//! Builds the `GET|POST {proxy_base}/` call from the target `url`, the request method,
//! the return type and the advanced options collection.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use super::fields;
use super::spec::RequestSpec;
use super::target::{EndpointTarget, HttpMethod, Query, QueryValue};
use crate::error::{Error, ErrorContext};

pub(crate) const URL_FIELD: &str = "url";
pub(crate) const METHOD_FIELD: &str = "method";
pub(crate) const RETURN_TYPE_FIELD: &str = "returnType";
pub(crate) const OPTIONS_FIELD: &str = "advancedOptions";

const SOURCE: &str = "proxy_resolver";

/// Shape of the Proxy response the caller asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReturnType {
    /// Target server response, passed through untouched
    #[default]
    Default,
    /// Provider JSON envelope (`json_response=true`)
    Json,
}

/// Anti-bot bypass profiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BypassProfile {
    #[serde(rename = "cloudflare_level_1")]
    CloudflareLevel1,
    #[serde(rename = "cloudflare_level_2")]
    CloudflareLevel2,
    #[serde(rename = "cloudflare_level_3")]
    CloudflareLevel3,
    #[serde(rename = "datadome")]
    DataDome,
    #[serde(rename = "generic_level_1")]
    GenericLevel1,
    #[serde(rename = "generic_level_2")]
    GenericLevel2,
    #[serde(rename = "generic_level_3")]
    GenericLevel3,
    #[serde(rename = "generic_level_4")]
    GenericLevel4,
    #[serde(rename = "incapsula")]
    Incapsula,
    #[serde(rename = "perimeterx")]
    PerimeterX,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PremiumTier {
    #[default]
    #[serde(rename = "level_1")]
    Level1,
    #[serde(rename = "level_2")]
    Level2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Desktop,
    Mobile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Csv,
    Gif,
    Jpeg,
    Pdf,
    Png,
    Svg,
    Webp,
    Xlsx,
    Xml,
}

/// Advanced options collection of a Proxy call. Every entry is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyOptions {
    #[serde(deserialize_with = "empty_as_none")]
    pub bypass: Option<BypassProfile>,
    pub country: Option<String>,
    #[serde(rename = "customCookies")]
    pub custom_cookies: Option<Value>,
    #[serde(rename = "customHeaders")]
    pub custom_headers: Option<Value>,
    #[serde(deserialize_with = "empty_as_none")]
    pub device_type: Option<DeviceType>,
    #[serde(deserialize_with = "empty_as_none")]
    pub file_type: Option<FileType>,
    pub final_status_code: Option<bool>,
    pub follow_redirects: Option<bool>,
    pub initial_status_code: Option<bool>,
    pub js_scenario: Option<String>,
    pub keep_headers: Option<bool>,
    pub max_request_cost: Option<Number>,
    pub mobile_proxy: Option<bool>,
    pub optimize_request: Option<bool>,
    #[serde(deserialize_with = "empty_as_none")]
    pub premium_proxy: Option<PremiumTier>,
    pub render_js: Option<bool>,
    pub residential_proxy: Option<bool>,
    pub screenshot: Option<bool>,
    pub scroll: Option<Number>,
    pub session_number: Option<Number>,
    pub wait: Option<Number>,
    pub wait_for: Option<String>,
}

/// Selector options left blank in the host UI arrive as `""` and mean unset.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(value) => T::deserialize(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl ProxyOptions {
    /// Query parameters for these options. Booleans go out whenever supplied,
    /// numbers when non-zero, strings when non-empty.
    pub fn to_query(&self, query: &mut Query) -> crate::Result<()> {
        put_bool(query, "render_js", self.render_js);
        put_str(query, "country", self.country.as_deref());
        put_bool(query, "follow_redirects", self.follow_redirects);
        put_bool(query, "initial_status_code", self.initial_status_code);
        put_bool(query, "final_status_code", self.final_status_code);
        put_bool(query, "optimize_request", self.optimize_request);
        if self.optimize_request == Some(true) {
            put_number(query, "max_request_cost", self.max_request_cost.as_ref());
        }
        if let Some(bypass) = self.bypass {
            query.insert("bypass".into(), QueryValue::from_json(serde_json::to_value(bypass)?));
        }
        put_str(query, "wait_for", self.wait_for.as_deref());
        put_number(query, "scroll", self.scroll.as_ref());
        if let Some(file_type) = self.file_type {
            query.insert(
                "file_type".into(),
                QueryValue::from_json(serde_json::to_value(file_type)?),
            );
        }
        if let Some(screenshot) = self.screenshot {
            query.insert("screenshot".into(), QueryValue::Bool(screenshot));
            // Screenshots are only produced by rendered pages in the JSON envelope.
            if screenshot {
                query.insert("render_js".into(), QueryValue::Bool(true));
                query.insert("json_response".into(), QueryValue::Bool(true));
            }
        }
        put_str(query, "js_scenario", self.js_scenario.as_deref());
        put_number(query, "wait", self.wait.as_ref());
        query.insert(
            "premium".into(),
            QueryValue::from_json(serde_json::to_value(self.premium_proxy.unwrap_or_default())?),
        );
        put_bool(query, "residential", self.residential_proxy);
        put_bool(query, "mobile", self.mobile_proxy);
        put_bool(query, "keep_headers", self.keep_headers);
        if let Some(device_type) = self.device_type {
            query.insert(
                "device_type".into(),
                QueryValue::from_json(serde_json::to_value(device_type)?),
            );
        }
        put_number(query, "session_number", self.session_number.as_ref());

        if let Some(headers) = structured_option(self.custom_headers.as_ref(), "Custom Headers")? {
            query.insert("headers".into(), headers);
        }
        if let Some(cookies) = structured_option(self.custom_cookies.as_ref(), "Custom Cookies")? {
            query.insert("cookies".into(), cookies);
        }
        Ok(())
    }
}

fn put_bool(query: &mut Query, key: &str, value: Option<bool>) {
    if let Some(b) = value {
        query.insert(key.to_string(), QueryValue::Bool(b));
    }
}

fn put_str(query: &mut Query, key: &str, value: Option<&str>) {
    if let Some(s) = value.filter(|s| !s.is_empty()) {
        query.insert(key.to_string(), QueryValue::Str(s.to_string()));
    }
}

fn put_number(query: &mut Query, key: &str, value: Option<&Number>) {
    if let Some(n) = value.filter(|n| n.as_f64() != Some(0.0)) {
        query.insert(key.to_string(), QueryValue::Number(n.clone()));
    }
}

/// Custom headers/cookies arrive as JSON text (or an already-parsed object).
fn structured_option(value: Option<&Value>, display: &str) -> crate::Result<Option<QueryValue>> {
    let parsed = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(text)) if text.trim().is_empty() => return Ok(None),
        Some(Value::String(text)) => {
            serde_json::from_str::<Value>(text).map_err(|e| Error::input_parse(display, &e))?
        }
        Some(other) => other.clone(),
    };
    match parsed {
        Value::Null => Ok(None),
        Value::Object(ref map) if map.is_empty() => Ok(None),
        other => Ok(Some(QueryValue::from_json(other))),
    }
}

pub(crate) fn return_type(spec: &RequestSpec) -> crate::Result<ReturnType> {
    match fields::text(spec.fields(), RETURN_TYPE_FIELD).as_deref() {
        None | Some("default") => Ok(ReturnType::Default),
        Some("json") => Ok(ReturnType::Json),
        Some(other) => Err(Error::validation_with_context(
            format!("Unsupported return type: {}", other),
            ErrorContext::new()
                .with_field_path(RETURN_TYPE_FIELD)
                .with_details("expected default or json")
                .with_source(SOURCE),
        )),
    }
}

fn method(spec: &RequestSpec) -> crate::Result<HttpMethod> {
    match fields::text(spec.fields(), METHOD_FIELD) {
        None => Ok(HttpMethod::Get),
        Some(m) if m.eq_ignore_ascii_case("GET") => Ok(HttpMethod::Get),
        Some(m) if m.eq_ignore_ascii_case("POST") => Ok(HttpMethod::Post),
        Some(other) => Err(Error::validation_with_context(
            format!("Unsupported method: {}", other),
            ErrorContext::new()
                .with_field_path(METHOD_FIELD)
                .with_details("expected GET or POST")
                .with_source(SOURCE),
        )),
    }
}

fn options(spec: &RequestSpec) -> crate::Result<ProxyOptions> {
    match spec.field(OPTIONS_FIELD) {
        None | Some(Value::Null) => Ok(ProxyOptions::default()),
        Some(value) => serde_json::from_value(value.clone()).map_err(|e| {
            Error::validation_with_context(
                format!("Invalid proxy option: {}", e),
                ErrorContext::new()
                    .with_field_path(OPTIONS_FIELD)
                    .with_source(SOURCE),
            )
        }),
    }
}

pub(crate) fn resolve(base_url: &str, spec: &RequestSpec) -> crate::Result<EndpointTarget> {
    let url = fields::required_text(spec.fields(), URL_FIELD, SOURCE)?;
    let method = method(spec)?;
    let return_type = return_type(spec)?;
    let options = options(spec)?;

    let mut query = Query::new();
    query.insert("url".into(), QueryValue::Str(url));
    options.to_query(&mut query)?;
    if return_type == ReturnType::Json {
        query.insert("json_response".into(), QueryValue::Bool(true));
    }

    let body = match method {
        HttpMethod::Post => Some(
            spec.payload()
                .cloned()
                .unwrap_or_else(|| Value::Object(Default::default())),
        ),
        HttpMethod::Get => None,
    };

    Ok(EndpointTarget {
        method,
        base_url: base_url.to_string(),
        path: "/".into(),
        query,
        body,
    })
}
