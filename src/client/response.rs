use serde_json::Value;

use crate::dispatch::ResponseFormat;

/// Decode a successful body. Lenient JSON falls back to the raw text.
pub fn decode(format: ResponseFormat, body: String) -> Value {
    match format {
        ResponseFormat::Raw => Value::String(body),
        ResponseFormat::LenientJson => match serde_json::from_str(&body) {
            Ok(value) => value,
            Err(_) => Value::String(body),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lenient_json() {
        assert_eq!(
            decode(ResponseFormat::LenientJson, r#"{"a":1}"#.into()),
            json!({"a": 1})
        );
        assert_eq!(
            decode(ResponseFormat::LenientJson, "<html>".into()),
            json!("<html>")
        );
    }

    #[test]
    fn test_raw_keeps_json_text() {
        assert_eq!(decode(ResponseFormat::Raw, r#"{"a":1}"#.into()), json!(r#"{"a":1}"#));
    }
}
