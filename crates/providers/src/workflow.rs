//! Client for the workflow-automation webhook.
//!
//! Plain JSON when the message is text-only; multipart form data when
//! attachments ride along. Binary-capable attachments (PDF, images) are
//! uploaded as raw `files` parts; everything else is base64-encoded into
//! `fileData` fields with its name/type/size alongside.

use crate::dispatch::DispatchError;
use base64::Engine;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Serialize;
use shared::chat_api::{Attachment, HistoryEntry};
use shared::settings::WorkflowSettings;
use std::sync::LazyLock;
use std::time::Duration;

static SHARED_HTTP: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(2)
        .build()
        .expect("failed to build HTTP client")
});

#[derive(Debug, Serialize)]
struct WorkflowBody<'a> {
    message: &'a str,
    #[serde(rename = "sessionId")]
    session_id: &'a str,
    timestamp: &'a str,
    user: &'a str,
    #[serde(rename = "conversationHistory")]
    conversation_history: &'a [HistoryEntry],
}

pub struct WorkflowClient {
    http: Client,
    webhook_url: String,
}

impl WorkflowClient {
    pub fn new(settings: &WorkflowSettings) -> Self {
        Self {
            http: SHARED_HTTP.clone(),
            webhook_url: settings.webhook_url.clone(),
        }
    }

    /// POST one message to the webhook and hand back the parsed response
    /// body for normalization. The response shape is the webhook's business.
    pub async fn invoke(
        &self,
        message: &str,
        session_id: &str,
        user: &str,
        history: &[HistoryEntry],
        attachments: &[Attachment],
    ) -> Result<serde_json::Value, DispatchError> {
        let timestamp = chrono::Utc::now().to_rfc3339();

        let resp = if attachments.is_empty() {
            let body = WorkflowBody {
                message,
                session_id,
                timestamp: &timestamp,
                user,
                conversation_history: history,
            };
            self.http.post(&self.webhook_url).json(&body).send().await?
        } else {
            tracing::debug!(count = attachments.len(), "uploading attachments to workflow");
            let form = build_form(message, session_id, &timestamp, user, history, attachments)?;
            self.http
                .post(&self.webhook_url)
                .multipart(form)
                .send()
                .await?
        };

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let detail: String = body.chars().take(800).collect();
            return Err(DispatchError::Status { status, detail });
        }

        Ok(resp.json().await?)
    }
}

fn build_form(
    message: &str,
    session_id: &str,
    timestamp: &str,
    user: &str,
    history: &[HistoryEntry],
    attachments: &[Attachment],
) -> Result<Form, DispatchError> {
    let history_json = serde_json::to_string(history).unwrap_or_else(|_| "[]".into());
    let mut form = Form::new()
        .text("message", message.to_string())
        .text("sessionId", session_id.to_string())
        .text("timestamp", timestamp.to_string())
        .text("user", user.to_string())
        .text("conversationHistory", history_json);

    for attachment in attachments {
        if attachment.is_binary_capable() {
            let part = Part::bytes(attachment.bytes.clone())
                .file_name(attachment.name.clone())
                .mime_str(&attachment.mime_type)?;
            form = form.part("files", part);
        } else {
            let encoded = base64::engine::general_purpose::STANDARD.encode(&attachment.bytes);
            form = form
                .text("fileData", encoded)
                .text("fileName", attachment.name.clone())
                .text("fileType", attachment.mime_type.clone())
                .text("fileSize", attachment.size_bytes().to_string());
        }
    }

    Ok(form)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body_field_casing() {
        let history = vec![HistoryEntry::assistant("hi")];
        let body = WorkflowBody {
            message: "hello",
            session_id: "abc-123",
            timestamp: "2026-01-01T00:00:00Z",
            user: "guest",
            conversation_history: &history,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["sessionId"], "abc-123");
        assert_eq!(value["conversationHistory"][0]["role"], "assistant");
        assert!(value.get("session_id").is_none());
    }

    #[test]
    fn test_form_builds_for_mixed_attachments() {
        let attachments = vec![
            Attachment::new("report.pdf", "application/pdf", vec![0x25, 0x50, 0x44, 0x46]),
            Attachment::new("notes.txt", "text/plain", b"hello".to_vec()),
        ];
        let form = build_form("msg", "sid", "ts", "guest", &[], &attachments);
        assert!(form.is_ok());
    }
}
