//! API Lambda handler - thin router that delegates to the endpoint handlers.
//!
//! This module handles:
//! - Turning the proxy event into an [`ApiRequest`]
//! - Path routing (`/analyze`, `/chat`, `/dify-talk`, `/speech-token`)
//! - Falling back to 404 for anything else

use lambda_runtime::{Error, LambdaEvent};
use serde_json::Value;
use tracing::{info, warn};

use super::helpers::{ApiResponse, err_response};
use super::parsing::ApiRequest;
use super::{analyze, chat, speech_token, talk};
use crate::core::config::AppConfig;

pub use self::function_handler as handler;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Analyze,
    Chat,
    Talk,
    SpeechToken,
}

impl Route {
    /// Matches on the last path segment so the functions work behind any
    /// stage or `/api` prefix.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let last = path.trim_end_matches('/').rsplit('/').next().unwrap_or("");
        match last {
            "analyze" => Some(Route::Analyze),
            "chat" => Some(Route::Chat),
            "dify-talk" | "talk" => Some(Route::Talk),
            "speech-token" => Some(Route::SpeechToken),
            _ => None,
        }
    }
}

/// Lambda handler for the API entrypoint.
///
/// # Errors
///
/// Never fails on its own: every outcome, including upstream failures, is
/// rendered as a proxy response.
pub async fn function_handler(
    config: &AppConfig,
    event: LambdaEvent<Value>,
) -> Result<ApiResponse, Error> {
    let request = ApiRequest::from_event(&event.payload);
    Ok(route(config, &request).await)
}

pub async fn route(config: &AppConfig, request: &ApiRequest) -> ApiResponse {
    info!(
        request_id = %request.request_id,
        method = %request.method,
        path = %request.path,
        "API Lambda received request"
    );

    match Route::from_path(&request.path) {
        Some(Route::Analyze) => analyze::handle_analyze(config, request).await,
        Some(Route::Chat) => chat::handle_chat(config, request).await,
        Some(Route::Talk) => talk::handle_talk(config, request).await,
        Some(Route::SpeechToken) => speech_token::handle_speech_token(config, request).await,
        None => {
            warn!(path = %request.path, "No route for path");
            err_response(404, "Not found")
        }
    }
}
