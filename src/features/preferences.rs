//! Preference loading with field-wise fallback to the default set.

use tracing::{debug, warn};

use crate::clients::PrefsClient;
use crate::core::config::AppConfig;
use crate::core::models::PreferenceSet;

/// Origin of the preferences endpoint as seen by the caller, rebuilt from
/// the forwarding headers of the inbound request.
#[must_use]
pub fn derive_base_url(
    forwarded_proto: Option<&str>,
    forwarded_host: Option<&str>,
    host: Option<&str>,
) -> Option<String> {
    let host = forwarded_host
        .or(host)
        .map(str::trim)
        .filter(|h| !h.is_empty())?;
    let proto = forwarded_proto
        .map(|p| p.split(',').next().unwrap_or(p).trim())
        .filter(|p| !p.is_empty())
        .unwrap_or("https");
    Some(format!("{proto}://{host}"))
}

/// Loads the stored preferences of `user_id`. Always returns a complete
/// set: any failure leaves the defaults in place.
pub async fn load_preferences(
    config: &AppConfig,
    request_base: Option<&str>,
    user_id: &str,
) -> PreferenceSet {
    let defaults = PreferenceSet::default();

    let Some(base) = config.prefs_base_url.as_deref().or(request_base) else {
        debug!("No preferences origin available, using defaults");
        return defaults;
    };

    match PrefsClient::new(base, config.aux_timeout).fetch(user_id).await {
        Ok(partial) => defaults.merged_with(&partial),
        Err(e) => {
            warn!(user_id = %user_id, "[dify-talk] prefs load fail: {}", e);
            defaults
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_headers_win_over_host() {
        assert_eq!(
            derive_base_url(Some("http"), Some("app.example.com"), Some("internal")),
            Some("http://app.example.com".to_string())
        );
        assert_eq!(
            derive_base_url(None, None, Some("internal:3000")),
            Some("https://internal:3000".to_string())
        );
        assert_eq!(
            derive_base_url(Some("https,http"), Some("a.example"), None),
            Some("https://a.example".to_string())
        );
        assert_eq!(derive_base_url(Some("https"), None, None), None);
    }

    #[tokio::test]
    async fn no_origin_means_defaults_without_a_call() {
        let prefs = load_preferences(&AppConfig::default(), None, "U1").await;
        assert_eq!(prefs, PreferenceSet::default());
    }
}
