//! Internal preferences store lookup

use serde_json::{Map, Value};
use std::time::Duration;

use super::http::{client, fetch_with_timeout};
use crate::errors::HandlerError;

pub struct PrefsClient<'a> {
    base_url: &'a str,
    timeout: Duration,
}

impl<'a> PrefsClient<'a> {
    pub fn new(base_url: &'a str, timeout: Duration) -> Self {
        Self { base_url, timeout }
    }

    /// Fetches the stored (possibly partial) preference object of `user_id`.
    /// The status code is not checked: a body without `prefs` is simply
    /// reported as missing.
    ///
    /// # Errors
    ///
    /// `Auxiliary` when the body is not JSON or has no `prefs` object, plus
    /// the transport errors of [`fetch_with_timeout`].
    pub async fn fetch(&self, user_id: &str) -> Result<Map<String, Value>, HandlerError> {
        let url = format!(
            "{}/api/prefs?userId={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(user_id)
        );

        let fetched = fetch_with_timeout(client().get(url), self.timeout).await?;
        let body: Value = serde_json::from_str(&fetched.body)
            .map_err(|e| HandlerError::Auxiliary(format!("prefs body: {e}")))?;

        match body.get("prefs") {
            Some(Value::Object(prefs)) => Ok(prefs.clone()),
            _ => Err(HandlerError::Auxiliary("prefs missing from response".to_string())),
        }
    }
}
