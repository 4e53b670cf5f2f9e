//! Azure Speech STS token issuance

use reqwest::header::CONTENT_LENGTH;
use std::time::Duration;
use tracing::error;

use super::http::{Fetched, client, fetch_with_timeout};
use crate::core::fallback::truncate_chars;
use crate::errors::HandlerError;

/// Issued tokens are valid for ten minutes; clients are told to refresh
/// a minute early.
pub const TOKEN_TTL_SECS: u32 = 540;

/// Issues a short-lived bearer token for the speech service.
///
/// # Errors
///
/// `Upstream` for non-success statuses, plus the transport errors of
/// [`fetch_with_timeout`].
pub async fn issue_token(
    endpoint: &str,
    subscription_key: &str,
    timeout: Duration,
) -> Result<String, HandlerError> {
    let request = client()
        .post(endpoint)
        .header("Ocp-Apim-Subscription-Key", subscription_key)
        .header(CONTENT_LENGTH, "0");

    let Fetched { status, body } = fetch_with_timeout(request, timeout).await?;

    if !status.is_success() {
        error!(status = status.as_u16(), "Speech token issuance failed");
        return Err(HandlerError::Upstream {
            status: status.as_u16(),
            message: format!("token issuance failed with {status}"),
            body: truncate_chars(&body, 500),
        });
    }

    Ok(body)
}
