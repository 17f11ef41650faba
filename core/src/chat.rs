//! Per-session conversation log for the assistant page.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub posted_at: DateTime<Utc>,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message. Blank input is ignored and returns `None`.
    pub fn post(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.messages.push(ChatMessage {
            id: Uuid::new_v4(),
            posted_at: Utc::now(),
            text: text.to_string(),
        });
        self.messages.last()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input_is_ignored() {
        let mut log = ConversationLog::new();
        assert!(log.post("   ").is_none());
        assert!(log.post("").is_none());
        assert!(log.is_empty());
    }

    #[test]
    fn messages_keep_posting_order() {
        let mut log = ConversationLog::new();
        log.post("  привет ");
        log.post("второе");
        let texts: Vec<&str> = log.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, ["привет", "второе"]);
        assert_ne!(log.messages()[0].id, log.messages()[1].id);
    }
}
