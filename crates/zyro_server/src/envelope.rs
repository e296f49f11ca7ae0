//! Locating the model's text inside a chat-completion envelope.
//!
//! Upstream providers disagree on where the answer lands. Reasoning models
//! sometimes leave `content` empty and put everything in `reasoning`.

use serde_json::Value;
use tracing::{debug, instrument};

/// Where the payload was found, tried in [`PayloadSource::ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum PayloadSource {
    /// `message.content` as a string, or the message itself when it is a string.
    PrimaryContent,
    /// The first `{` to the last `}` inside `message.reasoning`.
    ReasoningField,
    /// The whole message object serialized back to JSON.
    StringifiedMessage,
}

impl PayloadSource {
    /// Priority order of extraction strategies.
    pub const ORDER: [PayloadSource; 3] = [
        PayloadSource::PrimaryContent,
        PayloadSource::ReasoningField,
        PayloadSource::StringifiedMessage,
    ];

    /// Applies this strategy, returning non-empty text or `None`.
    pub fn extract(self, message: &Value) -> Option<String> {
        let text = match self {
            PayloadSource::PrimaryContent => match message {
                Value::String(s) => Some(s.clone()),
                Value::Object(map) => map
                    .get("content")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                _ => None,
            },
            PayloadSource::ReasoningField => message
                .get("reasoning")
                .and_then(Value::as_str)
                .and_then(|reasoning| {
                    let start = reasoning.find('{')?;
                    let end = reasoning.rfind('}')?;
                    (end > start).then(|| reasoning[start..=end].to_string())
                }),
            PayloadSource::StringifiedMessage => match message {
                Value::Object(_) => serde_json::to_string(message).ok(),
                _ => None,
            },
        };
        text.filter(|t| !t.trim().is_empty())
    }
}

/// Returns `choices[0].message` from a completion response body.
pub fn first_message(body: &Value) -> Option<&Value> {
    body.get("choices")?.get(0)?.get("message")
}

/// Runs each strategy in order; the first non-empty result wins.
#[instrument(skip(message))]
pub fn extract_payload(message: &Value) -> Option<(PayloadSource, String)> {
    let found = PayloadSource::ORDER
        .iter()
        .find_map(|source| source.extract(message).map(|text| (*source, text)));
    if let Some((source, text)) = &found {
        debug!(%source, len = text.len(), "Extracted payload");
    }
    found
}
