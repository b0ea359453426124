use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A structured message exchanged between the orchestrator and an agent.
///
/// Messages are immutable once constructed: an agent's `handle` produces a
/// new message rather than mutating its input. `metadata` is an opaque,
/// insertion-ordered payload interpreted by the receiving side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Name of the party that authored the message.
    pub sender: String,
    /// The textual content of the message.
    pub content: String,
    /// Arbitrary key-value metadata attached to the message.
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl AgentMessage {
    /// Creates a new message with empty metadata.
    pub fn new(sender: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            content: content.into(),
            metadata: Map::new(),
        }
    }

    /// Attaches a metadata map, replacing any existing one.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Reads a string-valued metadata field, if present.
    pub fn metadata_str(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_creation() {
        let msg = AgentMessage::new("caller", "daily refresh");
        assert_eq!(msg.sender, "caller");
        assert_eq!(msg.content, "daily refresh");
        assert!(msg.metadata.is_empty());
    }

    #[test]
    fn test_message_serialization() {
        let mut metadata = Map::new();
        metadata.insert("task_id".to_string(), json!("plan-dataset"));
        let msg = AgentMessage::new("orchestrator", "build it").with_metadata(metadata);

        let json = serde_json::to_string(&msg).unwrap();
        let parsed: AgentMessage = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.content, "build it");
        assert_eq!(parsed.metadata_str("task_id"), Some("plan-dataset"));
    }

    #[test]
    fn test_metadata_str_missing_key() {
        let msg = AgentMessage::new("a", "b");
        assert_eq!(msg.metadata_str("nope"), None);
    }
}
