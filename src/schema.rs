// src/schema.rs
// ============================================================================
// SCHEMA VALIDATOR - Structural checks per record
// ============================================================================
//
// Every defect is tallied into a named bucket; none is fatal. Checks are
// cumulative per record, except the two early-skip cases (record is not an
// object, record has no usable messages list), which end that record.
//
// Validation also produces the typed conversations used by the token
// counter: messages become records with explicit optional fields instead
// of open-ended JSON maps. Keys outside the allowlist are dropped.
//
// ============================================================================

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

/// Allowed keys on a message object.
pub const MESSAGE_KEYS: [&str; 4] = ["role", "content", "name", "function_call"];

/// Recognized roles.
pub const ROLES: [&str; 4] = ["system", "user", "assistant", "function"];

// ============================================================================
// ERROR BUCKETS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FormatError {
    /// Record is not a JSON object.
    DataType,
    /// `messages` is missing, not an array, or empty.
    MissingMessagesList,
    /// Message lacks `role` or `content` (counted once per message).
    MessageMissingKey,
    /// Message carries a key outside the allowlist (counted once per message).
    MessageUnrecognizedKey,
    /// `role` is absent, non-string, or not a recognized role.
    UnrecognizedRole,
    /// No usable content and no function_call, or content present but not text.
    MissingContent,
    /// Record has no assistant-role message.
    ExampleMissingAssistantMessage,
}

impl FormatError {
    pub fn key(self) -> &'static str {
        match self {
            FormatError::DataType => "data_type",
            FormatError::MissingMessagesList => "missing_messages_list",
            FormatError::MessageMissingKey => "message_missing_key",
            FormatError::MessageUnrecognizedKey => "message_unrecognized_key",
            FormatError::UnrecognizedRole => "unrecognized_role",
            FormatError::MissingContent => "missing_content",
            FormatError::ExampleMissingAssistantMessage => "example_missing_assistant_message",
        }
    }
}

/// Additive tally of structural defects. Never decremented.
///
/// Serializes as an object of error-kind → count containing only the kinds
/// that actually occurred.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct FormatErrorTally {
    counts: BTreeMap<FormatError, usize>,
}

impl FormatErrorTally {
    pub fn bump(&mut self, kind: FormatError) {
        *self.counts.entry(kind).or_insert(0) += 1;
    }

    pub fn count(&self, kind: FormatError) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }

    pub fn is_clean(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

impl Serialize for FormatErrorTally {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.counts.len()))?;
        for (kind, count) in &self.counts {
            map.serialize_entry(kind.key(), count)?;
        }
        map.end()
    }
}

// ============================================================================
// TYPED MODEL
// ============================================================================

/// One conversation turn, validated against the key allowlist.
///
/// `content` is only populated when the raw value was a string; non-text
/// content is tallied as `missing_content` and dropped here.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Message {
    pub role: Option<String>,
    pub content: Option<String>,
    pub name: Option<String>,
    pub function_call: Option<Value>,
}

impl Message {
    pub fn is_assistant(&self) -> bool {
        self.role.as_deref() == Some("assistant")
    }
}

/// One training example that survived the early-skip checks.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    pub messages: Vec<Message>,
}

// ============================================================================
// VALIDATION
// ============================================================================

/// Validates every record, tallying defects and extracting the typed
/// conversations for the token-counting pass.
///
/// Records that fail the early-skip checks produce no conversation and are
/// excluded from token statistics.
pub fn validate_dataset(dataset: &[Value]) -> (FormatErrorTally, Vec<Conversation>) {
    let mut tally = FormatErrorTally::default();
    let mut conversations = Vec::new();

    for record in dataset {
        let Some(obj) = record.as_object() else {
            tally.bump(FormatError::DataType);
            continue;
        };

        let messages = match obj.get("messages").and_then(Value::as_array) {
            Some(arr) if !arr.is_empty() => arr,
            _ => {
                tally.bump(FormatError::MissingMessagesList);
                continue;
            }
        };

        let mut convo = Conversation::default();

        for raw in messages {
            convo.messages.push(validate_message(raw, &mut tally));
        }

        if !convo.messages.iter().any(Message::is_assistant) {
            tally.bump(FormatError::ExampleMissingAssistantMessage);
        }

        conversations.push(convo);
    }

    if !tally.is_clean() {
        log::warn!("dataset has {} format errors", tally.total());
    }

    (tally, conversations)
}

fn validate_message(raw: &Value, tally: &mut FormatErrorTally) -> Message {
    let Some(msg) = raw.as_object() else {
        // A message that is not an object has neither key nor content.
        tally.bump(FormatError::MessageMissingKey);
        tally.bump(FormatError::UnrecognizedRole);
        tally.bump(FormatError::MissingContent);
        return Message::default();
    };

    if !msg.contains_key("role") || !msg.contains_key("content") {
        tally.bump(FormatError::MessageMissingKey);
    }

    if msg.keys().any(|k| !MESSAGE_KEYS.contains(&k.as_str())) {
        tally.bump(FormatError::MessageUnrecognizedKey);
    }

    let role = msg.get("role").and_then(Value::as_str);
    if !role.is_some_and(|r| ROLES.contains(&r)) {
        tally.bump(FormatError::UnrecognizedRole);
    }

    let content = msg.get("content").filter(|v| !v.is_null());
    let content_text = content.and_then(Value::as_str);
    let function_call = msg.get("function_call").filter(|v| !v.is_null());

    let content_empty = match content_text {
        Some(text) => text.is_empty(),
        None => content.is_none(),
    };
    let content_not_text = content.is_some() && content_text.is_none();

    if (content_empty && function_call.is_none()) || content_not_text {
        tally.bump(FormatError::MissingContent);
    }

    Message {
        role: role.map(str::to_string),
        content: content_text.map(str::to_string),
        name: msg.get("name").and_then(Value::as_str).map(str::to_string),
        function_call: function_call.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_record_is_clean() {
        let dataset = vec![json!({
            "messages": [
                {"role": "system", "content": "You are helpful."},
                {"role": "user", "content": "hi"},
                {"role": "assistant", "content": "hello"},
            ]
        })];

        let (tally, convos) = validate_dataset(&dataset);
        assert!(tally.is_clean());
        assert_eq!(convos.len(), 1);
        assert_eq!(convos[0].messages.len(), 3);
    }

    #[test]
    fn test_non_object_record() {
        let dataset = vec![json!([1, 2, 3])];
        let (tally, convos) = validate_dataset(&dataset);
        assert_eq!(tally.count(FormatError::DataType), 1);
        assert!(convos.is_empty());
    }

    #[test]
    fn test_missing_or_empty_messages() {
        let dataset = vec![
            json!({"prompt": "no messages here"}),
            json!({"messages": []}),
            json!({"messages": "not a list"}),
        ];
        let (tally, convos) = validate_dataset(&dataset);
        assert_eq!(tally.count(FormatError::MissingMessagesList), 3);
        assert!(convos.is_empty());
    }

    #[test]
    fn test_missing_key_counted_per_message() {
        let dataset = vec![json!({
            "messages": [
                {"role": "assistant"},
                {"content": "orphan"},
                {"role": "user", "content": "ok"},
            ]
        })];
        let (tally, _) = validate_dataset(&dataset);
        // Exactly the two messages missing role or content.
        assert_eq!(tally.count(FormatError::MessageMissingKey), 2);
    }

    #[test]
    fn test_unrecognized_key_once_per_message() {
        let dataset = vec![json!({
            "messages": [
                {"role": "assistant", "content": "x", "weight": 1, "extra": true},
            ]
        })];
        let (tally, _) = validate_dataset(&dataset);
        assert_eq!(tally.count(FormatError::MessageUnrecognizedKey), 1);
    }

    #[test]
    fn test_unrecognized_role() {
        let dataset = vec![json!({
            "messages": [
                {"role": "bot", "content": "x"},
                {"role": 7, "content": "x"},
                {"content": "no role at all"},
                {"role": "assistant", "content": "x"},
            ]
        })];
        let (tally, _) = validate_dataset(&dataset);
        assert_eq!(tally.count(FormatError::UnrecognizedRole), 3);
    }

    #[test]
    fn test_missing_content_rules() {
        let dataset = vec![json!({
            "messages": [
                // empty content, no function_call -> defect
                {"role": "user", "content": ""},
                // no content, has function_call -> fine
                {"role": "assistant", "function_call": {"name": "f", "arguments": "{}"}},
                // content present but not text -> defect
                {"role": "user", "content": 42},
                // null content, no function_call -> defect
                {"role": "user", "content": null},
            ]
        })];
        let (tally, _) = validate_dataset(&dataset);
        assert_eq!(tally.count(FormatError::MissingContent), 3);
    }

    #[test]
    fn test_missing_assistant_counted_once() {
        // Multiple defects in one record still bump the assistant bucket once.
        let dataset = vec![json!({
            "messages": [
                {"role": "bot"},
                {"role": "user", "content": ""},
            ]
        })];
        let (tally, _) = validate_dataset(&dataset);
        assert_eq!(tally.count(FormatError::ExampleMissingAssistantMessage), 1);
    }

    #[test]
    fn test_checks_are_cumulative() {
        let dataset = vec![json!({
            "messages": [
                {"role": "bot", "custom": true},
            ]
        })];
        let (tally, _) = validate_dataset(&dataset);
        assert_eq!(tally.count(FormatError::MessageMissingKey), 1);
        assert_eq!(tally.count(FormatError::MessageUnrecognizedKey), 1);
        assert_eq!(tally.count(FormatError::UnrecognizedRole), 1);
        assert_eq!(tally.count(FormatError::MissingContent), 1);
        assert_eq!(tally.count(FormatError::ExampleMissingAssistantMessage), 1);
        assert_eq!(tally.total(), 5);
    }

    #[test]
    fn test_typed_message_drops_non_text_content() {
        let dataset = vec![json!({
            "messages": [
                {"role": "assistant", "content": 42},
                {"role": "assistant", "content": "real", "name": "bot",
                 "function_call": {"name": "f"}},
            ]
        })];
        let (_, convos) = validate_dataset(&dataset);
        let msgs = &convos[0].messages;
        assert_eq!(msgs[0].content, None);
        assert_eq!(msgs[1].content.as_deref(), Some("real"));
        assert_eq!(msgs[1].name.as_deref(), Some("bot"));
        assert!(msgs[1].function_call.is_some());
    }

    #[test]
    fn test_tally_serializes_only_observed_kinds() {
        let mut tally = FormatErrorTally::default();
        tally.bump(FormatError::DataType);
        tally.bump(FormatError::DataType);
        tally.bump(FormatError::UnrecognizedRole);

        let json = serde_json::to_value(&tally).unwrap();
        assert_eq!(json, json!({"data_type": 2, "unrecognized_role": 1}));
    }
}
