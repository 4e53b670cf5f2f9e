//! LINE Messaging API profile lookup

use reqwest::header::AUTHORIZATION;
use serde::Deserialize;
use std::time::Duration;

use super::http::{client, fetch_with_timeout};
use crate::errors::HandlerError;

#[derive(Debug, Deserialize)]
struct LineProfile {
    #[serde(default, rename = "displayName")]
    display_name: Option<String>,
}

pub struct LineClient<'a> {
    api_base: &'a str,
    access_token: &'a str,
    timeout: Duration,
}

impl<'a> LineClient<'a> {
    pub fn new(api_base: &'a str, access_token: &'a str, timeout: Duration) -> Self {
        Self {
            api_base,
            access_token,
            timeout,
        }
    }

    /// Fetches the trimmed display name of `user_id`.
    ///
    /// # Errors
    ///
    /// `Auxiliary` for non-success statuses or unreadable bodies, plus the
    /// transport errors of [`fetch_with_timeout`].
    pub async fn display_name(&self, user_id: &str) -> Result<String, HandlerError> {
        let url = format!(
            "{}/v2/bot/profile/{}",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(user_id)
        );
        let request = client()
            .get(url)
            .header(AUTHORIZATION, format!("Bearer {}", self.access_token));

        let fetched = fetch_with_timeout(request, self.timeout).await?;
        if !fetched.status.is_success() {
            return Err(HandlerError::Auxiliary(format!(
                "LINE profile returned {}",
                fetched.status
            )));
        }

        let profile: LineProfile = serde_json::from_str(&fetched.body)
            .map_err(|e| HandlerError::Auxiliary(format!("LINE profile parse: {e}")))?;

        Ok(profile
            .display_name
            .map(|name| name.trim().to_string())
            .unwrap_or_default())
    }
}
