//! Chat message model and display normalization

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString};

/// Role in conversation. Model output is tagged `System`; there is no
/// separate assistant role.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ChatRole {
    User,
    System,
}

/// Message content as it appears on the wire: plain text, a list of content
/// parts, or something else entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<Value>),
    Other(Value),
}

impl From<String> for MessageContent {
    fn from(text: String) -> Self {
        MessageContent::Text(text)
    }
}

impl From<&str> for MessageContent {
    fn from(text: &str) -> Self {
        MessageContent::Text(text.to_string())
    }
}

/// A single message in the conversation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: ChatRole,
    #[serde(default)]
    pub content: Option<MessageContent>,
}

impl Message {
    pub fn new(role: ChatRole, content: impl Into<MessageContent>) -> Self {
        Self {
            role,
            content: Some(content.into()),
        }
    }

    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn system(content: impl Into<MessageContent>) -> Self {
        Self::new(ChatRole::System, content)
    }

    /// Content flattened to a single display string.
    pub fn display_text(&self) -> String {
        content_to_string(self.content.as_ref())
    }
}

/// Flatten message content into a display string.
///
/// Text passes through unchanged and missing content becomes `""`. Part lists
/// are concatenated without a separator, where a part contributes either
/// itself (a string) or its string `text` field (an object). Anything else
/// contributes nothing.
pub fn content_to_string(content: Option<&MessageContent>) -> String {
    match content {
        None => String::new(),
        Some(MessageContent::Text(text)) => text.clone(),
        Some(MessageContent::Parts(parts)) => parts.iter().map(part_text).collect(),
        Some(MessageContent::Other(_)) => String::new(),
    }
}

fn part_text(part: &Value) -> &str {
    match part {
        Value::String(text) => text,
        Value::Object(fields) => fields.get("text").and_then(Value::as_str).unwrap_or(""),
        _ => "",
    }
}
