/// difytalk - serverless handlers that put a Dify workflow behind a small JSON API.
///
/// One API Lambda serves four endpoints, routed by path:
/// 1. `analyze` runs the session analysis workflow
/// 2. `chat` runs the conversation workflow with a rendered transcript
/// 3. `dify-talk` enriches the conversation workflow with the speaker's LINE
///    display name and stored preferences before running it
/// 4. `speech-token` issues short-lived Azure Speech tokens
///
/// # Architecture
///
/// The system uses:
/// - AWS Lambda for serverless execution
/// - reqwest for every outbound call, each bounded by its own deadline
/// - an immutable `AppConfig` read once at cold start and passed to handlers
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use difytalk::api::{ApiRequest, route};
/// use difytalk::core::config::AppConfig;
///
/// #[tokio::main]
/// async fn main() {
///     difytalk::setup_logging();
///
///     let config = AppConfig {
///         dify_api_key: Some("app-dummy".to_string()),
///         line_channel_access_token: Some("line-dummy".to_string()),
///         ..AppConfig::default()
///     };
///
///     let request = ApiRequest::new("POST", "/api/dify-talk").with_json(serde_json::json!({
///         "userId": "U123",
///         "current_talk": "こんにちは",
///     }));
///
///     let response = route(&config, &request).await;
///     println!("{} {}", response.status_code, response.body);
/// }
/// ```
// Module declarations
pub mod api;
pub mod clients;
pub mod core;
pub mod errors;
pub mod features;

pub use errors::HandlerError;

/// Configure structured logging with JSON format for AWS Lambda environments.
///
/// This function sets up tracing-subscriber with a JSON formatter suitable for
/// `CloudWatch` Logs integration. It should be called once at cold start;
/// later calls are no-ops.
///
/// # Example
///
/// ```
/// difytalk::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::prelude::*;
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry().with(fmt_layer).try_init();
}
