//! Drives one send at a time from user input to an appended reply.
//!
//! The controller owns all mutable session state. A send walks a fixed
//! path: validate, append the user message and clear the inputs, raise the
//! loading flag, dispatch, append exactly one bot message (reply or
//! formatted error), drop the flag. Dispatch failures never escape; they
//! become bot-authored text.

use crate::attachments::PendingAttachments;
use crate::conversation::{ConversationLog, Message, HISTORY_WINDOW};
use providers::dispatch::{DispatchError, Dispatcher, OutgoingMessage};
use shared::chat_api::{Attachment, BackendId};

/// First message of every fresh session.
pub const GREETING: &str = "Hi! I'm your assistant. How can I help you today?";

pub struct ChatController {
    dispatcher: Box<dyn Dispatcher>,
    session_id: String,
    user_name: String,
    backend: BackendId,
    conversation: ConversationLog,
    pending: PendingAttachments,
    input: String,
    loading: bool,
}

impl ChatController {
    pub fn new(
        dispatcher: Box<dyn Dispatcher>,
        user_name: impl Into<String>,
        backend: BackendId,
    ) -> Self {
        let mut conversation = ConversationLog::new();
        conversation.push(Message::bot(GREETING));
        Self {
            dispatcher,
            session_id: uuid::Uuid::new_v4().to_string(),
            user_name: user_name.into(),
            backend,
            conversation,
            pending: PendingAttachments::new(),
            input: String::new(),
            loading: false,
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn messages(&self) -> &[Message] {
        self.conversation.messages()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.conversation.last()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn backend(&self) -> &BackendId {
        &self.backend
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn pending_files(&self) -> &[Attachment] {
        self.pending.files()
    }

    /// Draft edits stay legal while a send is in flight; only the send
    /// control itself is gated.
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn select_backend(&mut self, backend: BackendId) {
        self.backend = backend;
    }

    /// Stages files, returning warnings for any that were rejected.
    pub fn attach(&mut self, files: Vec<Attachment>) -> Vec<String> {
        self.pending.add(files);
        self.pending.take_warnings()
    }

    pub fn remove_attachment(&mut self, index: usize) {
        self.pending.remove(index);
    }

    pub fn can_send(&self) -> bool {
        !self.loading && (!self.input.trim().is_empty() || !self.pending.is_empty())
    }

    /// Runs one full send cycle. A no-op when nothing is staged or a send
    /// is already in flight.
    pub async fn send(&mut self) {
        if self.loading {
            return;
        }
        if self.input.trim().is_empty() && self.pending.is_empty() {
            return;
        }

        // Inputs are cleared up front; the message owns them now.
        let content = std::mem::take(&mut self.input);
        let attachments = self.pending.drain();
        let history = self.conversation.recent_history(HISTORY_WINDOW);

        let infos = attachments.iter().map(Attachment::info).collect();
        self.conversation.push(Message::user(content.clone(), infos));
        self.loading = true;

        let outgoing = OutgoingMessage {
            text: &content,
            attachments: &attachments,
            history: &history,
            session_id: &self.session_id,
            user: &self.user_name,
        };

        let reply = match self.dispatcher.dispatch(&self.backend, outgoing).await {
            Ok(reply) => {
                let message = Message::bot(reply.text);
                match reply.file {
                    Some(file) => message.with_download(file),
                    None => message,
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "dispatch failed");
                Message::bot(error_reply_text(&err))
            }
        };

        self.conversation.push(reply);
        self.loading = false;
    }
}

/// User-facing text for a failed dispatch, keyed on the error class.
fn error_reply_text(err: &DispatchError) -> String {
    match err {
        DispatchError::AttachmentsUnsupported => {
            "This model can't receive files. Switch to the Workflow backend to send attachments."
                .to_string()
        }
        DispatchError::Status { status, .. } => format!(
            "The service returned an error ({status}). Please try again in a moment."
        ),
        DispatchError::Transport(e) => format!(
            "I couldn't reach the service. Please check your connection and try again.\n\nError: {e}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::Sender;
    use async_trait::async_trait;
    use providers::normalize::NormalizedReply;
    use shared::chat_api::GeneratedFile;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Copy)]
    enum StubOutcome {
        Reply(&'static str),
        FileReply(&'static str),
        Unsupported,
        HttpError,
    }

    struct StubDispatcher {
        outcome: StubOutcome,
        history_lens: Arc<Mutex<Vec<usize>>>,
    }

    impl StubDispatcher {
        fn new(outcome: StubOutcome) -> Self {
            Self {
                outcome,
                history_lens: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl Dispatcher for StubDispatcher {
        async fn dispatch(
            &self,
            _backend: &BackendId,
            outgoing: OutgoingMessage<'_>,
        ) -> Result<NormalizedReply, DispatchError> {
            self.history_lens.lock().unwrap().push(outgoing.history.len());
            match self.outcome {
                StubOutcome::Reply(text) => Ok(NormalizedReply::text_only(text)),
                StubOutcome::FileReply(content) => Ok(NormalizedReply {
                    text: "file ready".into(),
                    file: Some(GeneratedFile::text("file.text", content)),
                }),
                StubOutcome::Unsupported => Err(DispatchError::AttachmentsUnsupported),
                StubOutcome::HttpError => Err(DispatchError::Status {
                    status: reqwest::StatusCode::BAD_GATEWAY,
                    detail: "upstream".into(),
                }),
            }
        }
    }

    fn controller(outcome: StubOutcome) -> ChatController {
        ChatController::new(
            Box::new(StubDispatcher::new(outcome)),
            "guest",
            crate::catalog::default_backend(),
        )
    }

    #[tokio::test]
    async fn test_send_appends_user_and_bot_message() {
        let mut chat = controller(StubOutcome::Reply("sure thing"));
        assert_eq!(chat.messages().len(), 1); // greeting

        chat.set_input("hello");
        chat.send().await;

        assert_eq!(chat.messages().len(), 3);
        assert_eq!(chat.messages()[1].sender, Sender::User);
        assert_eq!(chat.messages()[1].content, "hello");
        assert_eq!(chat.messages()[2].sender, Sender::Bot);
        assert_eq!(chat.messages()[2].content, "sure thing");
        assert!(!chat.is_loading());
        assert!(chat.input().is_empty());
    }

    #[tokio::test]
    async fn test_empty_input_is_a_noop() {
        let mut chat = controller(StubOutcome::Reply("never sent"));
        chat.set_input("   ");
        chat.send().await;
        assert_eq!(chat.messages().len(), 1);
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_attachments_alone_are_sendable() {
        let mut chat = controller(StubOutcome::Reply("got the file"));
        let warnings = chat.attach(vec![Attachment::new(
            "report.pdf",
            "application/pdf",
            vec![0x25],
        )]);
        assert!(warnings.is_empty());
        chat.send().await;
        assert_eq!(chat.messages().len(), 3);
        assert_eq!(chat.messages()[1].attachments.len(), 1);
        assert!(chat.pending_files().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_failure_becomes_bot_message() {
        let mut chat = controller(StubOutcome::HttpError);
        chat.set_input("hello");
        chat.send().await;

        assert_eq!(chat.messages().len(), 3);
        let reply = chat.last_message().unwrap();
        assert_eq!(reply.sender, Sender::Bot);
        assert!(reply.content.contains("502"));
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_unsupported_attachments_guidance() {
        let mut chat = controller(StubOutcome::Unsupported);
        chat.set_input("read this");
        chat.attach(vec![Attachment::new("a.pdf", "application/pdf", vec![1])]);
        chat.send().await;

        let reply = chat.last_message().unwrap();
        assert!(reply.content.contains("Workflow"));
        // Staged files are cleared even when the send fails.
        assert!(chat.pending_files().is_empty());
        assert!(!chat.is_loading());
    }

    #[tokio::test]
    async fn test_rejected_attachment_warns_and_is_not_staged() {
        let mut chat = controller(StubOutcome::Reply("ok"));
        let warnings = chat.attach(vec![
            Attachment::new("report.pdf", "application/pdf", vec![0x25]),
            Attachment::new("setup.exe", "application/x-msdownload", vec![0x4d]),
        ]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("setup.exe"));
        assert_eq!(chat.pending_files().len(), 1);
    }

    #[tokio::test]
    async fn test_file_reply_lands_on_message() {
        let mut chat = controller(StubOutcome::FileReply("hello"));
        chat.set_input("make me a file");
        chat.send().await;

        let reply = chat.last_message().unwrap();
        let file = reply.download.as_ref().unwrap();
        assert_eq!(file.name, "file.text");
        assert_eq!(file.size_bytes, 5);
    }

    #[tokio::test]
    async fn test_backend_switch_leaves_log_untouched() {
        let mut chat = controller(StubOutcome::Reply("first"));
        chat.set_input("hello");
        chat.send().await;
        let before: Vec<String> = chat.messages().iter().map(|m| m.id.clone()).collect();

        chat.select_backend(BackendId::Workflow);
        let after: Vec<String> = chat.messages().iter().map(|m| m.id.clone()).collect();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_history_window_stays_capped() {
        let stub = StubDispatcher::new(StubOutcome::Reply("ack"));
        let lens = stub.history_lens.clone();
        let mut chat = ChatController::new(
            Box::new(stub),
            "guest",
            crate::catalog::default_backend(),
        );

        for i in 0..12 {
            chat.set_input(format!("message {i}"));
            chat.send().await;
        }

        assert_eq!(chat.messages().len(), 1 + 12 * 2);
        let lens = lens.lock().unwrap();
        // Log sizes before each send: 1, 3, 5, ... capped at the window.
        assert_eq!(
            *lens,
            vec![1, 3, 5, 7, 9, 10, 10, 10, 10, 10, 10, 10]
        );
    }
}
