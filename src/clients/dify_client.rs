//! Dify workflow API client
//!
//! Runs a workflow in blocking mode and hands back its `data.outputs`.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{error, info};

use super::http::{Fetched, client, fetch_with_timeout};
use crate::core::fallback::truncate_chars;
use crate::core::models::{WorkflowInputs, WorkflowRunRequest};
use crate::errors::HandlerError;

/// Upstream bodies attached to errors are cut to this many characters.
pub const ERROR_BODY_LIMIT: usize = 500;

/// Outputs of a finished workflow run; `None` when the response carried no
/// `data.outputs` object.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowOutputs(pub Option<Map<String, Value>>);

pub struct WorkflowClient<'a> {
    run_url: String,
    api_key: &'a str,
    timeout: Duration,
}

impl<'a> WorkflowClient<'a> {
    pub fn new(run_url: String, api_key: &'a str, timeout: Duration) -> Self {
        Self {
            run_url,
            api_key,
            timeout,
        }
    }

    /// Submits `inputs` attributed to `user`. Every call goes upstream.
    ///
    /// # Errors
    ///
    /// `Upstream` for non-success statuses, `Parse` for unreadable bodies,
    /// `Timeout`/`Http` for transport failures.
    pub async fn run(
        &self,
        inputs: &WorkflowInputs,
        user: &str,
    ) -> Result<WorkflowOutputs, HandlerError> {
        let payload = WorkflowRunRequest {
            inputs,
            response_mode: "blocking",
            user,
        };

        #[cfg(feature = "debug-logs")]
        info!("Dify workflow payload: {}", serde_json::to_string(&payload)?);

        #[cfg(not(feature = "debug-logs"))]
        info!(
            url = %self.run_url,
            input_count = inputs.len(),
            "Running Dify workflow"
        );

        let request = client()
            .post(&self.run_url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .json(&payload);

        let Fetched { status, body } = fetch_with_timeout(request, self.timeout).await?;

        if !status.is_success() {
            let message = upstream_message(&body);
            error!(status = status.as_u16(), "Dify API error: {}", message);
            return Err(HandlerError::Upstream {
                status: status.as_u16(),
                message,
                body: truncate_chars(&body, ERROR_BODY_LIMIT),
            });
        }

        let parsed: Value = serde_json::from_str(&body).map_err(|e| {
            error!("Dify response is not JSON: {}", e);
            HandlerError::Parse(format!("Dify response: {e}"))
        })?;

        Ok(WorkflowOutputs(
            parsed
                .get("data")
                .and_then(|d| d.get("outputs"))
                .and_then(Value::as_object)
                .cloned(),
        ))
    }
}

/// The `message` field of a JSON error body, or the body itself, cut to
/// [`ERROR_BODY_LIMIT`] characters.
fn upstream_message(body: &str) -> String {
    let message = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string));
    truncate_chars(message.as_deref().unwrap_or(body), ERROR_BODY_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_prefers_json_field() {
        assert_eq!(
            upstream_message(r#"{"code":"invalid_param","message":"bad input"}"#),
            "bad input"
        );
        assert_eq!(upstream_message("gateway timeout"), "gateway timeout");
    }

    #[test]
    fn long_json_message_is_truncated() {
        let body = json!({"message": "x".repeat(2_000)}).to_string();
        assert_eq!(upstream_message(&body).chars().count(), ERROR_BODY_LIMIT);
    }
}
