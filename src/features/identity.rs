//! Display-name resolution.
//!
//! Sources are tried in order and the first non-empty name wins. No source
//! ever fails the request: a broken lookup simply yields nothing.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::clients::LineClient;
use crate::core::config::AppConfig;
use crate::core::fallback::first_non_empty;

#[async_trait]
pub trait NameSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    async fn lookup(&self, user_id: &str) -> Option<String>;
}

/// Name the client sent along with the request.
pub struct ClientSuppliedName<'a>(pub Option<&'a str>);

#[async_trait]
impl NameSource for ClientSuppliedName<'_> {
    fn source_name(&self) -> &'static str {
        "client"
    }

    async fn lookup(&self, _user_id: &str) -> Option<String> {
        first_non_empty([self.0])
    }
}

/// LINE profile API lookup, skipped when no channel token is configured.
pub struct LineProfileLookup<'a> {
    config: &'a AppConfig,
}

impl<'a> LineProfileLookup<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl NameSource for LineProfileLookup<'_> {
    fn source_name(&self) -> &'static str {
        "line_profile"
    }

    async fn lookup(&self, user_id: &str) -> Option<String> {
        let Some(token) = self.config.line_channel_access_token.as_deref() else {
            debug!("LINE_CHANNEL_ACCESS_TOKEN not set, skipping profile lookup");
            return None;
        };

        let line = LineClient::new(&self.config.line_api_base, token, self.config.aux_timeout);
        match line.display_name(user_id).await {
            Ok(name) => first_non_empty([Some(name)]),
            Err(e) => {
                warn!(user_id = %user_id, "LINE profile lookup failed: {}", e);
                None
            }
        }
    }
}

/// Asks each source in turn; later sources are not consulted once a name
/// is found. Returns an empty string when every source comes up empty.
pub async fn resolve_from(sources: &[&dyn NameSource], user_id: &str) -> String {
    for source in sources {
        if let Some(name) = source.lookup(user_id).await {
            info!(source = source.source_name(), "Resolved display name");
            return name;
        }
    }
    String::new()
}

/// Client-supplied name first, then the LINE profile.
pub async fn resolve_display_name(
    config: &AppConfig,
    user_id: &str,
    client_name: Option<&str>,
) -> String {
    let client = ClientSuppliedName(client_name);
    let profile = LineProfileLookup::new(config);
    resolve_from(&[&client, &profile], user_id).await
}
