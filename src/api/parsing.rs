//! Lambda proxy event parsing (API Gateway v1/v2 and Function URLs).

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::{Map, Value};
use tracing::warn;
use uuid::Uuid;

/// The parts of an inbound proxy event the handlers look at.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub request_id: String,
    pub method: String,
    pub path: String,
    pub headers: Value,
    /// Parsed JSON body; `Null` when absent or not JSON.
    pub body: Value,
}

impl ApiRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            headers: Value::Object(Map::new()),
            body: Value::Null,
        }
    }

    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let Value::Object(map) = &mut self.headers {
            map.insert(name.to_string(), Value::String(value.to_string()));
        }
        self
    }

    pub fn from_event(payload: &Value) -> Self {
        let method = v_str(payload, &["requestContext", "http", "method"])
            .or_else(|| v_str(payload, &["httpMethod"]))
            .unwrap_or("GET");
        let path = v_str(payload, &["rawPath"])
            .or_else(|| v_str(payload, &["path"]))
            .unwrap_or("/");
        let request_id = v_str(payload, &["requestContext", "requestId"])
            .map_or_else(|| Uuid::new_v4().to_string(), str::to_string);

        let body = match extract_body(payload) {
            Ok(body) => body,
            Err(e) => {
                warn!("Ignoring unreadable request body: {:#}", e);
                Value::Null
            }
        };

        Self {
            request_id,
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            headers: payload
                .get("headers")
                .cloned()
                .unwrap_or_else(|| Value::Object(Map::new())),
            body,
        }
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        get_header_value(&self.headers, name)
    }

    /// Top-level field of the JSON body.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.body.get(key)
    }
}

fn extract_body(payload: &Value) -> Result<Value> {
    let raw = match payload.get("body") {
        None | Some(Value::Null) => return Ok(Value::Null),
        Some(Value::String(s)) => s,
        // Direct invocations may hand over the body already parsed.
        Some(other) => return Ok(other.clone()),
    };

    let is_base64 = payload
        .get("isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let text = if is_base64 {
        let bytes = STANDARD.decode(raw).context("body is not valid base64")?;
        String::from_utf8(bytes).context("decoded body is not UTF-8")?
    } else {
        raw.clone()
    };

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&text).context("body is not JSON")
}

pub fn v_path<'a>(root: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut cur = root;
    for key in path {
        cur = cur.get(*key)?;
    }
    Some(cur)
}

pub fn v_str<'a>(root: &'a Value, path: &[&str]) -> Option<&'a str> {
    v_path(root, path).and_then(|v| v.as_str())
}

pub fn get_header_value<'a>(headers: &'a Value, name: &str) -> Option<&'a str> {
    if let Some(v) = headers.get(name).and_then(|s| s.as_str()) {
        return Some(v);
    }
    headers.as_object().and_then(|map| {
        map.iter().find_map(|(k, v)| {
            if k.eq_ignore_ascii_case(name) {
                v.as_str()
            } else {
                None
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_http_api_v2_events() {
        let event = json!({
            "rawPath": "/api/dify-talk",
            "requestContext": {"http": {"method": "post"}, "requestId": "req-1"},
            "headers": {"Host": "app.example.com"},
            "body": "{\"userId\":\"U1\"}"
        });
        let request = ApiRequest::from_event(&event);
        assert_eq!(request.method, "POST");
        assert_eq!(request.path, "/api/dify-talk");
        assert_eq!(request.request_id, "req-1");
        assert_eq!(request.header("host"), Some("app.example.com"));
        assert_eq!(request.field("userId"), Some(&json!("U1")));
    }

    #[test]
    fn reads_rest_api_v1_events_with_base64_body() {
        let event = json!({
            "path": "/api/chat",
            "httpMethod": "POST",
            "isBase64Encoded": true,
            "body": STANDARD.encode(r#"{"text":"やあ"}"#)
        });
        let request = ApiRequest::from_event(&event);
        assert_eq!(request.path, "/api/chat");
        assert_eq!(request.field("text"), Some(&json!("やあ")));
    }

    #[test]
    fn malformed_body_reads_as_null() {
        let event = json!({"rawPath": "/api/chat", "body": "{not json"});
        let request = ApiRequest::from_event(&event);
        assert_eq!(request.method, "GET");
        assert!(request.body.is_null());
        assert!(request.field("text").is_none());
    }
}
