//! Handler for the LINE-style talk endpoint.
//!
//! Resolves who is talking and how they like to be talked to, then runs the
//! talk workflow. The profile and preference lookups are best-effort: they
//! only ever degrade to defaults. The workflow call is the one stage whose
//! failure fails the request.

use serde_json::{Value, json};
use tracing::{error, info};

use super::helpers::{
    ApiResponse, err_with_details, error_response, no_content, ok_json, with_cors,
};
use super::parsing::ApiRequest;
use crate::clients::WorkflowClient;
use crate::core::config::AppConfig;
use crate::core::models::{HistoryInput, ResolvedIdentity};
use crate::errors::HandlerError;
use crate::features::identity::resolve_display_name;
use crate::features::payload::{is_truthy, talk_inputs, text_or};
use crate::features::preferences::{derive_base_url, load_preferences};
use crate::features::reply::{ReplyPolicy, extract_reply};

pub const MISSING_FIELDS: &str = "userId/current_talk required";

#[tracing::instrument(level = "info", skip_all, fields(request_id = %request.request_id))]
pub async fn handle_talk(config: &AppConfig, request: &ApiRequest) -> ApiResponse {
    if request.method == "OPTIONS" {
        return with_cors(no_content());
    }

    let response = match talk(config, request).await {
        Ok(body) => ok_json(&body),
        Err(HandlerError::Upstream { status, body, .. }) => {
            error!(status, "Talk workflow returned an error");
            err_with_details(500, &format!("dify {status}"), Value::String(body))
        }
        Err(e) => {
            error!("Talk request failed: {}", e);
            error_response(e)
        }
    };
    with_cors(response)
}

async fn talk(config: &AppConfig, request: &ApiRequest) -> Result<Value, HandlerError> {
    if request.method != "POST" {
        return Err(HandlerError::Method);
    }

    let api_key = config
        .dify_api_key
        .as_deref()
        .ok_or_else(|| HandlerError::missing_credential("DIFY_API_KEY"))?;

    let (Some(user_id), Some(current_talk)) = (
        required_text(request.field("userId")),
        required_text(request.field("current_talk")),
    ) else {
        return Err(HandlerError::Validation(MISSING_FIELDS.to_string()));
    };

    let client_name = request.field("userName").and_then(Value::as_str);
    let request_base = derive_base_url(
        request.header("x-forwarded-proto"),
        request.header("x-forwarded-host"),
        request.header("host"),
    );

    // Independent lookups, each bounded by its own deadline.
    let (display_name, prefs) = tokio::join!(
        resolve_display_name(config, &user_id, client_name),
        load_preferences(config, request_base.as_deref(), &user_id),
    );

    let identity = ResolvedIdentity {
        user_id,
        display_name,
    };
    let history = HistoryInput::from_value(request.field("history"));
    let inputs = talk_inputs(&identity, &prefs, &current_talk, &history);
    let user_name = inputs
        .get("user_name")
        .cloned()
        .unwrap_or_else(|| Value::String(identity.user_id.clone()));

    info!(user_id = %identity.user_id, "Submitting talk workflow");
    let outputs = WorkflowClient::new(config.talk_run_url(), api_key, config.workflow_timeout)
        .run(&inputs, &identity.user_id)
        .await?;
    let reply = extract_reply(outputs, ReplyPolicy::RequireText)?;

    Ok(json!({
        "reply": reply,
        "prefs": prefs,
        "userName": user_name,
    }))
}

/// A field that must be present and set, in string form.
fn required_text(value: Option<&Value>) -> Option<String> {
    value.filter(|v| is_truthy(v)).map(|v| text_or(Some(v), ""))
}

