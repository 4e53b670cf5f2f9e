//! Handler for the session analysis endpoint.

use serde_json::{Value, json};
use tracing::{error, info};

use super::helpers::{ApiResponse, error_response, ok_json};
use super::parsing::ApiRequest;
use crate::clients::WorkflowClient;
use crate::core::config::AppConfig;
use crate::errors::HandlerError;
use crate::features::payload::{analysis_inputs, text_or};
use crate::features::reply::{ReplyPolicy, extract_reply};

const DEFAULT_USER: &str = "analysis-user";

#[tracing::instrument(level = "info", skip_all, fields(request_id = %request.request_id))]
pub async fn handle_analyze(config: &AppConfig, request: &ApiRequest) -> ApiResponse {
    match analyze(config, request).await {
        Ok(body) => ok_json(&body),
        Err(e) => {
            error!("Analyze request failed: {}", e);
            error_response(e)
        }
    }
}

async fn analyze(config: &AppConfig, request: &ApiRequest) -> Result<Value, HandlerError> {
    if request.method != "POST" {
        return Err(HandlerError::Method);
    }

    let api_key = config
        .dify_analysis_key
        .as_deref()
        .ok_or_else(|| HandlerError::missing_credential("DIFY_ANALYSIS_KEY"))?;

    let inputs = analysis_inputs(request.field("inputs"));
    let user = text_or(request.field("userId"), DEFAULT_USER);
    info!(user = %user, "Submitting analysis workflow");

    let outputs = WorkflowClient::new(config.workflow_run_url(), api_key, config.workflow_timeout)
        .run(&inputs, &user)
        .await?;
    let answer = extract_reply(outputs, ReplyPolicy::SerializeFallback)?;

    Ok(json!({ "answer": answer }))
}
