//! Handler for the speech token endpoint. Accepts any method.

use serde_json::{Value, json};
use std::time::Duration;
use tracing::{error, info};

use super::helpers::{ApiResponse, err_with_details, error_response, no_content, ok_json, with_cors};
use super::parsing::ApiRequest;
use crate::clients::speech_client::{TOKEN_TTL_SECS, issue_token};
use crate::core::config::{AppConfig, SPEECH_TOKEN_TIMEOUT_MS};
use crate::errors::HandlerError;

pub const MISSING_SPEECH_CONFIG: &str = "AZURE_SPEECH_KEY/REGION missing";

#[tracing::instrument(level = "info", skip_all, fields(request_id = %request.request_id))]
pub async fn handle_speech_token(config: &AppConfig, request: &ApiRequest) -> ApiResponse {
    if request.method == "OPTIONS" {
        return with_cors(no_content());
    }

    let response = match speech_token(config).await {
        Ok(body) => ok_json(&body),
        Err(e @ HandlerError::Config(_)) => {
            error!("Speech token unavailable: {}", e);
            error_response(e)
        }
        Err(e) => {
            error!("Speech token issuance failed: {}", e);
            err_with_details(500, "token fail", Value::String(e.to_string()))
        }
    };
    with_cors(response)
}

async fn speech_token(config: &AppConfig) -> Result<Value, HandlerError> {
    let (Some(key), Some(region)) = (
        config.azure_speech_key.as_deref(),
        config.azure_speech_region.as_deref(),
    ) else {
        return Err(HandlerError::Config(MISSING_SPEECH_CONFIG.to_string()));
    };

    info!(region = %region, "Issuing speech token");
    let token = issue_token(
        &config.speech_token_url(region),
        key,
        Duration::from_millis(SPEECH_TOKEN_TIMEOUT_MS),
    )
    .await?;

    Ok(json!({
        "token": token,
        "region": region,
        "expiresInSec": TOKEN_TTL_SECS,
    }))
}
