//! Wire types for the chat server's JSON endpoints
//!
//! Replies are decoded leniently (every field optional) and then folded
//! into an [`Outcome`]. An `error` field counts whenever its JSON value is
//! truthy (anything but `null`, `false`, `0` or `""`), and it wins over any
//! payload sent alongside it.

use crate::api::Outcome;
use crate::error::TransportError;
use crate::transcript::{Message, Sender};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Text shown when the server answers a login without `success`
pub const LOGIN_FAILED: &str = "Login failed.";

/// Body of `POST /login`
#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    /// Trimmed username
    pub username: &'a str,
}

/// Body of `POST /chat`
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    /// Trimmed message text
    pub message: &'a str,
}

/// Reply to `POST /login`
#[derive(Debug, Deserialize)]
pub struct LoginReply {
    #[serde(default)]
    pub success: bool,
}

impl LoginReply {
    /// Fold into an outcome
    pub fn into_outcome(self) -> Outcome<()> {
        if self.success {
            Outcome::Success(())
        } else {
            Outcome::Rejected(LOGIN_FAILED.to_string())
        }
    }
}

/// Reply to `POST /chat`
#[derive(Debug, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ChatReply {
    /// Fold into an outcome
    pub fn into_outcome(self) -> Outcome<String> {
        if let Some(error) = present(self.error) {
            return Outcome::Rejected(error);
        }
        match self.response {
            Some(text) => Outcome::Success(text),
            None => TransportError::Malformed("missing `response` field".to_string()).into(),
        }
    }
}

/// One entry of a stored conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationItem {
    pub sender: Sender,
    pub message: String,
}

impl From<ConversationItem> for Message {
    fn from(item: ConversationItem) -> Self {
        Message::new(item.sender, item.message)
    }
}

impl From<Message> for ConversationItem {
    fn from(message: Message) -> Self {
        Self {
            sender: message.sender,
            message: message.text,
        }
    }
}

/// Reply to `GET /get_conversation`
#[derive(Debug, Deserialize)]
pub struct ConversationReply {
    #[serde(default)]
    pub conversation: Option<Vec<ConversationItem>>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl ConversationReply {
    /// Fold into an outcome, preserving server order
    pub fn into_outcome(self) -> Outcome<Vec<Message>> {
        if let Some(error) = present(self.error) {
            return Outcome::Rejected(error);
        }
        match self.conversation {
            Some(items) => Outcome::Success(items.into_iter().map(Message::from).collect()),
            None => TransportError::Malformed("missing `conversation` field".to_string()).into(),
        }
    }
}

/// One remembered fact about the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub memory: String,
}

/// Reply to `GET /list_memories`
#[derive(Debug, Deserialize)]
pub struct MemoriesReply {
    #[serde(default)]
    pub memories: Option<Vec<MemoryRecord>>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl MemoriesReply {
    /// Fold into an outcome
    pub fn into_outcome(self) -> Outcome<Vec<MemoryRecord>> {
        if let Some(error) = present(self.error) {
            return Outcome::Rejected(error);
        }
        match self.memories {
            Some(memories) => Outcome::Success(memories),
            None => TransportError::Malformed("missing `memories` field".to_string()).into(),
        }
    }
}

/// Reply to `POST /delete_memories`
#[derive(Debug, Deserialize)]
pub struct DeleteReply {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl DeleteReply {
    /// Fold into an outcome
    pub fn into_outcome(self) -> Outcome<String> {
        if let Some(error) = present(self.error) {
            return Outcome::Rejected(error);
        }
        match self.status {
            Some(status) => Outcome::Success(status),
            None => TransportError::Malformed("missing `status` field".to_string()).into(),
        }
    }
}

/// Alert text for a truthy `error` value
///
/// Strings are used as-is. Any other truthy value is shown as its JSON text.
fn present(field: Option<Value>) -> Option<String> {
    match field? {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode<T: serde::de::DeserializeOwned>(json: &str) -> T {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_login_request_shape() {
        let body = serde_json::to_value(LoginRequest { username: "alice" }).unwrap();
        assert_eq!(body, serde_json::json!({"username": "alice"}));
    }

    #[test]
    fn test_chat_request_shape() {
        let body = serde_json::to_value(ChatRequest { message: "hello" }).unwrap();
        assert_eq!(body, serde_json::json!({"message": "hello"}));
    }

    #[test]
    fn test_login_success_flag() {
        let ok: LoginReply = decode(r#"{"success": true}"#);
        assert!(ok.into_outcome().is_success());

        let missing: LoginReply = decode(r#"{}"#);
        assert!(matches!(missing.into_outcome(), Outcome::Rejected(m) if m == LOGIN_FAILED));
    }

    #[test]
    fn test_chat_reply_response() {
        let reply: ChatReply = decode(r#"{"response": "hi"}"#);
        assert!(matches!(reply.into_outcome(), Outcome::Success(t) if t == "hi"));
    }

    #[test]
    fn test_chat_reply_error_wins() {
        let reply: ChatReply = decode(r#"{"response": "hi", "error": "rate limited"}"#);
        assert!(matches!(reply.into_outcome(), Outcome::Rejected(e) if e == "rate limited"));
    }

    #[test]
    fn test_chat_reply_empty_error_is_ignored() {
        let reply: ChatReply = decode(r#"{"response": "hi", "error": ""}"#);
        assert!(reply.into_outcome().is_success());
    }

    #[test]
    fn test_chat_reply_structured_error_is_rejected() {
        let reply: ChatReply = decode(r#"{"error": {"code": 429, "detail": "rate limited"}}"#);
        match reply.into_outcome() {
            Outcome::Rejected(text) => {
                let value: Value = serde_json::from_str(&text).unwrap();
                assert_eq!(value["detail"], "rate limited");
                assert_eq!(value["code"], 429);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_falsy_error_values_are_ignored() {
        for falsy in ["null", "false", "0", "\"\""] {
            let reply: ChatReply =
                decode(&format!(r#"{{"response": "hi", "error": {}}}"#, falsy));
            assert!(reply.into_outcome().is_success(), "error = {}", falsy);
        }
    }

    #[test]
    fn test_truthy_scalar_errors_are_rejected() {
        let reply: ConversationReply = decode(r#"{"conversation": [], "error": true}"#);
        assert!(matches!(reply.into_outcome(), Outcome::Rejected(e) if e == "true"));

        let reply: DeleteReply = decode(r#"{"status": "ok", "error": 500}"#);
        assert!(matches!(reply.into_outcome(), Outcome::Rejected(e) if e == "500"));
    }

    #[test]
    fn test_chat_reply_without_fields_is_transport_failure() {
        let reply: ChatReply = decode(r#"{}"#);
        assert!(matches!(
            reply.into_outcome(),
            Outcome::Transport(TransportError::Malformed(_))
        ));
    }

    #[test]
    fn test_conversation_reply_preserves_order() {
        let reply: ConversationReply = decode(
            r#"{"conversation": [
                {"sender": "user", "message": "a"},
                {"sender": "bot", "message": "b"}
            ]}"#,
        );
        match reply.into_outcome() {
            Outcome::Success(messages) => {
                assert_eq!(messages, vec![Message::user("a"), Message::bot("b")]);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_conversation_reply_error() {
        let reply: ConversationReply = decode(r#"{"error": "User not logged in"}"#);
        assert!(matches!(reply.into_outcome(), Outcome::Rejected(e) if e == "User not logged in"));
    }

    #[test]
    fn test_memories_reply_ignores_extra_fields() {
        let reply: MemoriesReply = decode(
            r#"{"memories": [{"id": "m1", "memory": "Name is Alice", "score": 0.9}]}"#,
        );
        match reply.into_outcome() {
            Outcome::Success(memories) => {
                assert_eq!(memories.len(), 1);
                assert_eq!(memories[0].id.as_deref(), Some("m1"));
                assert_eq!(memories[0].memory, "Name is Alice");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_delete_reply() {
        let ok: DeleteReply = decode(r#"{"status": "All memories deleted"}"#);
        assert!(matches!(ok.into_outcome(), Outcome::Success(s) if s == "All memories deleted"));

        let err: DeleteReply = decode(r#"{"error": "Failed to delete memories"}"#);
        assert!(matches!(err.into_outcome(), Outcome::Rejected(_)));
    }
}
