//! Routes one outgoing message to the selected backend.

use crate::completion::CompletionClient;
use crate::normalize::{self, NormalizedReply};
use crate::workflow::WorkflowClient;
use anyhow::Result;
use async_trait::async_trait;
use shared::chat_api::{Attachment, BackendId, HistoryEntry};
use shared::settings::ChatSettings;

/// What can go wrong between accepting a message and producing a reply.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// Connection-level failure, including an unreadable response body
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {detail}")]
    Status {
        status: reqwest::StatusCode,
        detail: String,
    },

    #[error("attachments are not supported on this backend")]
    AttachmentsUnsupported,
}

/// Everything the dispatcher needs to produce exactly one reply.
#[derive(Debug)]
pub struct OutgoingMessage<'a> {
    pub text: &'a str,
    pub attachments: &'a [Attachment],
    /// Prior turns only; the new message is not part of the window
    pub history: &'a [HistoryEntry],
    pub session_id: &'a str,
    pub user: &'a str,
}

#[async_trait]
pub trait Dispatcher: Send + Sync {
    async fn dispatch(
        &self,
        backend: &BackendId,
        outgoing: OutgoingMessage<'_>,
    ) -> Result<NormalizedReply, DispatchError>;
}

/// The real thing: HTTP clients for both backends.
pub struct HttpDispatcher {
    completion: CompletionClient,
    workflow: WorkflowClient,
}

impl HttpDispatcher {
    pub fn new(settings: &ChatSettings) -> Result<Self> {
        Ok(Self {
            completion: CompletionClient::new(&settings.completion)?,
            workflow: WorkflowClient::new(&settings.workflow),
        })
    }
}

#[async_trait]
impl Dispatcher for HttpDispatcher {
    async fn dispatch(
        &self,
        backend: &BackendId,
        outgoing: OutgoingMessage<'_>,
    ) -> Result<NormalizedReply, DispatchError> {
        match backend {
            BackendId::Workflow => {
                tracing::debug!(session = outgoing.session_id, "dispatching to workflow webhook");
                let value = self
                    .workflow
                    .invoke(
                        outgoing.text,
                        outgoing.session_id,
                        outgoing.user,
                        outgoing.history,
                        outgoing.attachments,
                    )
                    .await?;
                Ok(normalize::normalize_workflow_reply(&value))
            }
            BackendId::Completion { model } => {
                // No upload path here; the caller surfaces the guidance text.
                if !outgoing.attachments.is_empty() {
                    return Err(DispatchError::AttachmentsUnsupported);
                }
                tracing::debug!(model = %model, "dispatching to completion endpoint");
                let mut messages: Vec<HistoryEntry> = outgoing.history.to_vec();
                messages.push(HistoryEntry::user(outgoing.text));
                let text = self.completion.generate(model, &messages).await?;
                Ok(NormalizedReply::text_only(text))
            }
        }
    }
}
