use chrono::{DateTime, Utc};
use shared::chat_api::{AttachmentInfo, GeneratedFile, HistoryEntry};

/// How many prior turns ride along with each outgoing message.
pub const HISTORY_WINDOW: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

/// One entry in the conversation. Never mutated after it is appended.
#[derive(Debug, Clone)]
pub struct Message {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub attachments: Vec<AttachmentInfo>,
    /// Set when the bot's reply carried a generated file
    pub download: Option<GeneratedFile>,
}

impl Message {
    pub fn user(content: impl Into<String>, attachments: Vec<AttachmentInfo>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            sender: Sender::User,
            timestamp: Utc::now(),
            attachments,
            download: None,
        }
    }

    pub fn bot(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            content: content.into(),
            sender: Sender::Bot,
            timestamp: Utc::now(),
            attachments: Vec::new(),
            download: None,
        }
    }

    pub fn with_download(mut self, file: GeneratedFile) -> Self {
        self.download = Some(file);
        self
    }
}

/// Append-only log of the active session.
#[derive(Debug, Default)]
pub struct ConversationLog {
    messages: Vec<Message>,
}

impl ConversationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Wire-format view of the most recent `limit` turns.
    pub fn recent_history(&self, limit: usize) -> Vec<HistoryEntry> {
        let start = self.messages.len().saturating_sub(limit);
        self.messages[start..]
            .iter()
            .map(|m| match m.sender {
                Sender::User => HistoryEntry::user(&m.content),
                Sender::Bot => HistoryEntry::assistant(&m.content),
            })
            .collect()
    }
}
