//! Common helper functions for API handlers.
//!
//! This module provides the proxy response type and the builders every
//! handler uses, so that failures always come back as one JSON object with
//! an `error` field and optional `details`.

use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;

use crate::errors::HandlerError;

/// Lambda proxy integration response.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    /// The body parsed back as JSON (`Null` for empty bodies).
    #[must_use]
    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Response Builders
// ============================================================================

#[must_use]
pub fn json_response(status_code: u16, body: &Value) -> ApiResponse {
    let mut headers = BTreeMap::new();
    headers.insert("Content-Type".to_string(), "application/json".to_string());
    ApiResponse {
        status_code,
        headers,
        body: body.to_string(),
    }
}

/// Returns a 200 OK response with the given JSON body.
#[must_use]
pub fn ok_json(body: &Value) -> ApiResponse {
    json_response(200, body)
}

/// Returns an error response with the given status code and message.
#[must_use]
pub fn err_response(status_code: u16, message: &str) -> ApiResponse {
    json_response(status_code, &json!({ "error": message }))
}

#[must_use]
pub fn err_with_details(status_code: u16, message: &str, details: Value) -> ApiResponse {
    json_response(status_code, &json!({ "error": message, "details": details }))
}

/// Empty 204, used to answer CORS pre-flight requests.
#[must_use]
pub fn no_content() -> ApiResponse {
    ApiResponse {
        status_code: 204,
        headers: BTreeMap::new(),
        body: String::new(),
    }
}

/// Adds the permissive cross-origin headers browser clients need.
#[must_use]
pub fn with_cors(mut response: ApiResponse) -> ApiResponse {
    response
        .headers
        .insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
    response.headers.insert(
        "Access-Control-Allow-Headers".to_string(),
        "Content-Type, Authorization".to_string(),
    );
    response.headers.insert(
        "Access-Control-Allow-Methods".to_string(),
        "GET,POST,OPTIONS".to_string(),
    );
    response
}

/// Default rendering of a handler failure.
#[must_use]
pub fn error_response(error: HandlerError) -> ApiResponse {
    let status = error.status_code();
    match error {
        HandlerError::Config(_) | HandlerError::Validation(_) | HandlerError::Method => {
            err_response(status, &error.to_string())
        }
        HandlerError::Upstream { message, .. } => {
            err_with_details(status, "Dify API Error", Value::String(message))
        }
        HandlerError::NoReply { raw } => err_with_details(status, "no text in outputs", raw),
        other => err_with_details(
            status,
            "Internal Server Error",
            Value::String(other.to_string()),
        ),
    }
}
