use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Number of most recent turns kept when rendering a transcript.
pub const HISTORY_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Other,
}

impl Role {
    /// Speaker label used in the transcript sent to the workflow.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Role::User => "若者",
            Role::Other => "高齢者",
        }
    }
}

// Anything that is not exactly "user" is the other party.
impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw.as_ref().and_then(Value::as_str) {
            Some("user") => Role::User,
            _ => Role::Other,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    #[serde(default = "default_role")]
    pub role: Role,
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,
}

fn default_role() -> Role {
    Role::Other
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(other) => other.to_string(),
    })
}

impl ConversationTurn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }
}

/// History as sent by clients: either already rendered, or a list of turns.
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryInput {
    Transcript(String),
    Turns(Vec<ConversationTurn>),
}

impl HistoryInput {
    /// Interprets a raw JSON `history` field. Entries that are not objects
    /// are dropped; a scalar is kept as a transcript.
    #[must_use]
    pub fn from_value(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => HistoryInput::Transcript(String::new()),
            Some(Value::String(s)) => HistoryInput::Transcript(s.clone()),
            Some(Value::Array(items)) => HistoryInput::Turns(
                items
                    .iter()
                    .filter(|item| item.is_object())
                    .filter_map(|item| serde_json::from_value(item.clone()).ok())
                    .collect(),
            ),
            Some(other) => HistoryInput::Transcript(other.to_string()),
        }
    }
}

/// Per-user conversational tuning parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreferenceSet {
    pub level_cog: f64,
    pub level_circ: f64,
    pub speech_rate: f64,
    pub ob_old: String,
    pub ob_hobby: String,
}

impl Default for PreferenceSet {
    fn default() -> Self {
        Self {
            level_cog: 0.4,
            level_circ: 0.5,
            speech_rate: 1.0,
            ob_old: "80".to_string(),
            ob_hobby: "編み物".to_string(),
        }
    }
}

impl PreferenceSet {
    /// Returns a new set with every usable field of `partial` laid over
    /// `self`. Nulls, empty strings and values of the wrong shape keep the
    /// existing field.
    #[must_use]
    pub fn merged_with(&self, partial: &Map<String, Value>) -> Self {
        let float = |key: &str, current: f64| {
            partial
                .get(key)
                .and_then(|v| match v {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                })
                .filter(|f| f.is_finite())
                .unwrap_or(current)
        };
        let text = |key: &str, current: &str| {
            partial
                .get(key)
                .and_then(|v| match v {
                    Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .unwrap_or_else(|| current.to_string())
        };

        Self {
            level_cog: float("level_cog", self.level_cog),
            level_circ: float("level_circ", self.level_circ),
            speech_rate: float("speech_rate", self.speech_rate),
            ob_old: text("ob_old", &self.ob_old),
            ob_hobby: text("ob_hobby", &self.ob_hobby),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: String,
    pub display_name: String,
}

/// Flat mapping of workflow variable names to values, as declared on the
/// workflow's start node.
pub type WorkflowInputs = Map<String, Value>;

/// JSON body of a blocking workflow run.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowRunRequest<'a> {
    pub inputs: &'a WorkflowInputs,
    pub response_mode: &'static str,
    pub user: &'a str,
}
