//! Handler for the chat endpoint.

use serde_json::{Value, json};
use tracing::{error, info};

use super::helpers::{ApiResponse, error_response, ok_json};
use super::parsing::ApiRequest;
use crate::clients::WorkflowClient;
use crate::core::config::AppConfig;
use crate::core::models::HistoryInput;
use crate::errors::HandlerError;
use crate::features::payload::{chat_inputs, text_or};
use crate::features::reply::{ReplyPolicy, extract_reply};

const DEFAULT_USER: &str = "chat-user";

#[tracing::instrument(level = "info", skip_all, fields(request_id = %request.request_id))]
pub async fn handle_chat(config: &AppConfig, request: &ApiRequest) -> ApiResponse {
    match chat(config, request).await {
        Ok(body) => ok_json(&body),
        Err(e) => {
            error!("Chat request failed: {}", e);
            error_response(e)
        }
    }
}

async fn chat(config: &AppConfig, request: &ApiRequest) -> Result<Value, HandlerError> {
    if request.method != "POST" {
        return Err(HandlerError::Method);
    }

    let api_key = config
        .dify_api_key
        .as_deref()
        .ok_or_else(|| HandlerError::missing_credential("DIFY_API_KEY"))?;

    // Only a list of turns counts as history here.
    let turns = match HistoryInput::from_value(request.field("history")) {
        HistoryInput::Turns(turns) => turns,
        HistoryInput::Transcript(_) => Vec::new(),
    };

    let inputs = chat_inputs(request.field("inputs"), request.field("text"), &turns);
    let user = text_or(request.field("userId"), DEFAULT_USER);
    info!(user = %user, history_turns = turns.len(), "Submitting chat workflow");

    let outputs = WorkflowClient::new(config.workflow_run_url(), api_key, config.workflow_timeout)
        .run(&inputs, &user)
        .await?;
    let answer = extract_reply(outputs, ReplyPolicy::SerializeFallback)?;

    Ok(json!({ "answer": answer }))
}
