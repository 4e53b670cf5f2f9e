use std::env;
use std::time::Duration;

pub const DEFAULT_DIFY_API_BASE: &str = "https://api.dify.ai/v1";
pub const DEFAULT_LINE_API_BASE: &str = "https://api.line.me";
pub const DEFAULT_WORKFLOW_TIMEOUT_MS: u64 = 25_000;
pub const DEFAULT_AUX_TIMEOUT_MS: u64 = 4_000;
pub const SPEECH_TOKEN_TIMEOUT_MS: u64 = 10_000;

/// Process configuration, read once at cold start and shared read-only
/// by every handler. Credentials are optional here: a missing key only
/// fails the endpoint that needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub dify_analysis_key: Option<String>,
    pub dify_api_key: Option<String>,
    pub dify_workflow_id: Option<String>,
    pub dify_api_base: String,
    pub line_channel_access_token: Option<String>,
    pub line_api_base: String,
    pub prefs_base_url: Option<String>,
    pub azure_speech_key: Option<String>,
    pub azure_speech_region: Option<String>,
    pub azure_speech_token_endpoint: Option<String>,
    pub workflow_timeout: Duration,
    pub aux_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dify_analysis_key: None,
            dify_api_key: None,
            dify_workflow_id: None,
            dify_api_base: DEFAULT_DIFY_API_BASE.to_string(),
            line_channel_access_token: None,
            line_api_base: DEFAULT_LINE_API_BASE.to_string(),
            prefs_base_url: None,
            azure_speech_key: None,
            azure_speech_region: None,
            azure_speech_token_endpoint: None,
            workflow_timeout: Duration::from_millis(DEFAULT_WORKFLOW_TIMEOUT_MS),
            aux_timeout: Duration::from_millis(DEFAULT_AUX_TIMEOUT_MS),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let millis = |key: &str, default: u64| -> Result<Duration, String> {
            match get(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| format!("{key}: {e}")),
                None => Ok(Duration::from_millis(default)),
            }
        };

        Ok(Self {
            dify_analysis_key: get("DIFY_ANALYSIS_KEY"),
            dify_api_key: get("DIFY_API_KEY"),
            dify_workflow_id: get("DIFY_WORKFLOW_ID"),
            dify_api_base: get("DIFY_API_BASE")
                .unwrap_or_else(|| DEFAULT_DIFY_API_BASE.to_string()),
            line_channel_access_token: get("LINE_CHANNEL_ACCESS_TOKEN"),
            line_api_base: get("LINE_API_BASE")
                .unwrap_or_else(|| DEFAULT_LINE_API_BASE.to_string()),
            prefs_base_url: get("PREFS_BASE_URL"),
            azure_speech_key: get("AZURE_SPEECH_KEY"),
            azure_speech_region: get("AZURE_SPEECH_REGION"),
            azure_speech_token_endpoint: get("AZURE_SPEECH_TOKEN_ENDPOINT"),
            workflow_timeout: millis("WORKFLOW_TIMEOUT_MS", DEFAULT_WORKFLOW_TIMEOUT_MS)?,
            aux_timeout: millis("AUX_TIMEOUT_MS", DEFAULT_AUX_TIMEOUT_MS)?,
        })
    }

    /// Run URL of the workflow published behind the API key.
    #[must_use]
    pub fn workflow_run_url(&self) -> String {
        format!("{}/workflows/run", self.dify_api_base.trim_end_matches('/'))
    }

    /// Run URL for the talk workflow, pinned to `DIFY_WORKFLOW_ID` when set.
    #[must_use]
    pub fn talk_run_url(&self) -> String {
        let base = self.dify_api_base.trim_end_matches('/');
        match &self.dify_workflow_id {
            Some(id) => format!("{base}/workflows/{id}/run"),
            None => format!("{base}/workflows/run"),
        }
    }

    /// True when the preferences origin has to be rebuilt from the
    /// caller's `X-Forwarded-Host`/`Host` headers.
    #[must_use]
    pub fn prefs_origin_from_request(&self) -> bool {
        self.prefs_base_url.is_none()
    }

    #[must_use]
    pub fn speech_token_url(&self, region: &str) -> String {
        self.azure_speech_token_endpoint.clone().unwrap_or_else(|| {
            format!("https://{region}.api.cognitive.microsoft.com/sts/v1.0/issueToken")
        })
    }
}
