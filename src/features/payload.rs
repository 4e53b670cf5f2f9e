//! Workflow input assembly.
//!
//! Each endpoint owns its field mapping, but all of them produce a flat
//! object keyed by the variable names declared on the workflow start node,
//! with defaults applied and numeric fields sent as JSON numbers.

use serde_json::{Map, Number, Value};

use crate::core::fallback::first_non_empty;
use crate::core::models::{
    ConversationTurn, HISTORY_WINDOW, HistoryInput, PreferenceSet, ResolvedIdentity,
    WorkflowInputs,
};

pub const DEFAULT_USER_NAME: &str = "あなた";
pub const SILENT_UTTERANCE: &str = "（無言）";

/// Renders the last [`HISTORY_WINDOW`] turns as `"<label>: <text>"` lines.
#[must_use]
pub fn render_transcript(turns: &[ConversationTurn]) -> String {
    let start = turns.len().saturating_sub(HISTORY_WINDOW);
    turns[start..]
        .iter()
        .map(|turn| format!("{}: {}", turn.role.label(), turn.text))
        .collect::<Vec<_>>()
        .join("\n")
}

#[must_use]
pub fn render_history(history: &HistoryInput) -> String {
    match history {
        HistoryInput::Transcript(text) => text.clone(),
        HistoryInput::Turns(turns) => render_transcript(turns),
    }
}

/// Whether a value would count as set in a loosely typed client: `null`,
/// `""`, `0` and `false` do not.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String form of a set value, or `default` when it is unset.
#[must_use]
pub fn text_or(value: Option<&Value>, default: &str) -> String {
    match value.filter(|v| is_truthy(v)) {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => default.to_string(),
    }
}

/// Numeric coercion: numbers pass through, numeric strings are parsed,
/// booleans become 1/0, anything else falls back to `default`. Integral
/// results are emitted as JSON integers.
#[must_use]
pub fn number_or(value: Option<&Value>, default: f64) -> Value {
    let parsed = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => Some(0.0),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    number_value(parsed.filter(|f| f.is_finite()).unwrap_or(default))
}

#[allow(clippy::cast_possible_truncation)]
fn number_value(f: f64) -> Value {
    if f.fract() == 0.0 && f.abs() < 9.0e15 {
        Value::from(f as i64)
    } else {
        Number::from_f64(f).map_or(Value::Null, Value::Number)
    }
}

/// Inputs for the session analysis workflow.
#[must_use]
pub fn analysis_inputs(client_inputs: Option<&Value>) -> WorkflowInputs {
    let field = |key: &str| client_inputs.and_then(|inputs| inputs.get(key));

    let mut inputs = Map::new();
    inputs.insert(
        "selected_quotes".into(),
        text_or(field("selected_quotes"), "（特になし）").into(),
    );
    inputs.insert(
        "parameters".into(),
        text_or(field("parameters"), "設定なし").into(),
    );
    inputs.insert("scenario".into(), text_or(field("scenario"), "不明").into());
    inputs.insert("stress_count".into(), number_or(field("stress_count"), 0.0));
    inputs.insert("pause_count".into(), number_or(field("pause_count"), 0.0));
    inputs.insert("vas_value".into(), number_or(field("vas_value"), 50.0));
    inputs.insert(
        "emotion_tags".into(),
        text_or(field("emotion_tags"), "なし").into(),
    );
    inputs.insert(
        "user_name".into(),
        text_or(field("user_name"), DEFAULT_USER_NAME).into(),
    );
    inputs
}

/// Inputs for the chat workflow: every client-supplied input is forwarded,
/// then the conversational fields are set on top.
#[must_use]
pub fn chat_inputs(
    client_inputs: Option<&Value>,
    text: Option<&Value>,
    turns: &[ConversationTurn],
) -> WorkflowInputs {
    let mut inputs = client_inputs
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let user_name = text_or(
        client_inputs.and_then(|i| i.get("user_name")),
        DEFAULT_USER_NAME,
    );
    let utterance = text_or(text, SILENT_UTTERANCE);

    inputs.insert("user_name".into(), user_name.into());
    inputs.insert("current_talk".into(), utterance.clone().into());
    inputs.insert("history".into(), render_transcript(turns).into());
    inputs.insert("query".into(), utterance.into());
    inputs
}

/// Inputs for the LINE-style talk workflow.
#[must_use]
pub fn talk_inputs(
    identity: &ResolvedIdentity,
    prefs: &PreferenceSet,
    current_talk: &str,
    history: &HistoryInput,
) -> WorkflowInputs {
    let defaults = PreferenceSet::default();
    let user_name = first_non_empty([
        Some(identity.display_name.as_str()),
        Some(identity.user_id.as_str()),
    ])
    .unwrap_or_default();

    let mut inputs = Map::new();
    inputs.insert("user_id".into(), identity.user_id.clone().into());
    inputs.insert("user_name".into(), user_name.into());
    inputs.insert("current_talk".into(), current_talk.into());
    inputs.insert("history".into(), render_history(history).into());
    inputs.insert("level_cog".into(), number_value(prefs.level_cog));
    inputs.insert("level_circ".into(), number_value(prefs.level_circ));
    inputs.insert("speech_rate".into(), number_value(prefs.speech_rate));
    inputs.insert(
        "ob_old".into(),
        first_non_empty([Some(prefs.ob_old.as_str()), Some(defaults.ob_old.as_str())])
            .unwrap_or_default()
            .into(),
    );
    inputs.insert(
        "ob_hobby".into(),
        first_non_empty([
            Some(prefs.ob_hobby.as_str()),
            Some(defaults.ob_hobby.as_str()),
        ])
        .unwrap_or_default()
        .into(),
    );
    inputs.insert("replyToken".into(), "".into());
    inputs
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_are_coerced_not_rejected() {
        assert_eq!(number_or(Some(&json!("12")), 0.0), json!(12));
        assert_eq!(number_or(Some(&json!(" 3.5 ")), 0.0), json!(3.5));
        assert_eq!(number_or(Some(&json!("many")), 50.0), json!(50));
        assert_eq!(number_or(Some(&json!(true)), 0.0), json!(1));
        assert_eq!(number_or(Some(&Value::Null), 50.0), json!(50));
        assert_eq!(number_or(None, 0.0), json!(0));
        assert_eq!(number_or(Some(&json!("")), 50.0), json!(0));
    }

    #[test]
    fn falsy_values_take_the_default() {
        assert_eq!(text_or(Some(&json!("")), "なし"), "なし");
        assert_eq!(text_or(Some(&json!(0)), "なし"), "なし");
        assert_eq!(text_or(Some(&json!(false)), "なし"), "なし");
        assert_eq!(text_or(Some(&json!(7)), "なし"), "7");
        assert_eq!(text_or(Some(&json!("怒り")), "なし"), "怒り");
    }

    #[test]
    fn transcript_labels_speakers() {
        let turns = vec![
            ConversationTurn::new(crate::core::models::Role::User, "おはよう"),
            ConversationTurn::new(crate::core::models::Role::Other, "おはようさん"),
        ];
        assert_eq!(render_transcript(&turns), "若者: おはよう\n高齢者: おはようさん");
        assert_eq!(render_transcript(&[]), "");
    }

    #[test]
    fn talk_inputs_fall_back_to_user_id() {
        let identity = ResolvedIdentity {
            user_id: "U42".into(),
            display_name: String::new(),
        };
        let prefs = PreferenceSet {
            ob_old: String::new(),
            ..PreferenceSet::default()
        };
        let inputs = talk_inputs(
            &identity,
            &prefs,
            "こんにちは",
            &HistoryInput::Transcript(String::new()),
        );
        assert_eq!(inputs["user_name"], json!("U42"));
        assert_eq!(inputs["ob_old"], json!("80"));
        assert_eq!(inputs["level_cog"], json!(0.4));
        assert_eq!(inputs["speech_rate"], json!(1));
        assert_eq!(inputs["replyToken"], json!(""));
    }
}
