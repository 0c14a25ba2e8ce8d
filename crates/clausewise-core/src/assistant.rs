//! Scripted contract assistant.
//!
//! There is no analysis engine behind the chat: replies are fixed strings
//! chosen by whether the user attached a file, delivered after a delay.

use std::time::Duration;

use chrono::{DateTime, Local};
use uuid::Uuid;

pub const GREETING: &str = "I will analyse your contract";

const FILE_REPLY: &str = "I'm analyzing your contract file. I've identified several potential \
loopholes and areas of concern. Would you like me to provide a detailed analysis?";

const QUERY_REPLY: &str = "I understand your query. Please upload a contract file for detailed \
analysis, or ask me specific questions about contract loopholes.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Assistant,
}

/// A file the user attached. Only the name is kept; contents are never read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub name: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            sender,
            timestamp: Local::now(),
        }
    }

    pub fn greeting() -> Self {
        Self::new(Sender::Assistant, GREETING)
    }

    /// Builds the user's message, or `None` when there is nothing to send.
    pub fn from_user(text: &str, attachment: Option<&Attachment>) -> Option<Self> {
        let text = text.trim();
        if !text.is_empty() {
            return Some(Self::new(Sender::User, text));
        }
        attachment.map(|file| Self::new(Sender::User, format!("Uploaded file: {}", file.name)))
    }
}

/// Produces canned replies after a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct ScriptedAssistant {
    delay: Duration,
}

impl Default for ScriptedAssistant {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

impl ScriptedAssistant {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Picks the reply without waiting.
    pub fn script(has_attachment: bool) -> &'static str {
        if has_attachment {
            FILE_REPLY
        } else {
            QUERY_REPLY
        }
    }

    /// Suspends for the configured delay, then replies.
    pub async fn reply(&self, has_attachment: bool) -> ChatMessage {
        tokio::time::sleep(self.delay).await;
        ChatMessage::new(Sender::Assistant, Self::script(has_attachment))
    }
}
