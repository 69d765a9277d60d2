pub mod settings {
    use serde::{Deserialize, Serialize};

    /// Completion-style endpoint (OpenAI-compatible chat completions).
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct CompletionSettings {
        /// Base URL without the `/v1/chat/completions` suffix
        pub base_url: String,
        /// Bearer token; falls back to COMPLETION_API_KEY at client build time
        pub api_key: Option<String>,
        pub default_model: String,
    }

    /// Workflow-automation webhook endpoint.
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct WorkflowSettings {
        pub webhook_url: String,
    }

    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct ChatSettings {
        pub completion: CompletionSettings,
        pub workflow: WorkflowSettings,
        /// Display name attached to workflow calls as the `user` field
        pub user_name: String,
    }

    impl Default for CompletionSettings {
        fn default() -> Self {
            Self {
                base_url: "https://openrouter.ai/api".into(),
                api_key: None,
                default_model: "gpt-4".into(),
            }
        }
    }

    impl Default for WorkflowSettings {
        fn default() -> Self {
            Self {
                webhook_url: "http://localhost:5678/webhook/chat".into(),
            }
        }
    }

    impl Default for ChatSettings {
        fn default() -> Self {
            Self {
                completion: CompletionSettings::default(),
                workflow: WorkflowSettings::default(),
                user_name: "guest".into(),
            }
        }
    }

    impl ChatSettings {
        /// Built-in endpoint defaults with environment overrides for the
        /// deploy-time values (secrets and the webhook target).
        pub fn from_env() -> Self {
            let mut settings = Self::default();
            if let Ok(key) = std::env::var("COMPLETION_API_KEY") {
                settings.completion.api_key = Some(key);
            }
            if let Ok(url) = std::env::var("WORKFLOW_WEBHOOK_URL") {
                settings.workflow.webhook_url = url;
            }
            if let Ok(name) = std::env::var("CHAT_USER_NAME") {
                settings.user_name = name;
            }
            settings
        }
    }
}

pub mod chat_api {
    use serde::Serialize;

    /// One prior turn in the wire format both backends accept.
    #[derive(Debug, Clone, Serialize)]
    pub struct HistoryEntry {
        pub role: String, // "user" | "assistant"
        pub content: String,
    }

    impl HistoryEntry {
        pub fn user(content: impl Into<String>) -> Self {
            Self {
                role: "user".into(),
                content: content.into(),
            }
        }

        pub fn assistant(content: impl Into<String>) -> Self {
            Self {
                role: "assistant".into(),
                content: content.into(),
            }
        }
    }

    /// Which backend answers the next message.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum BackendId {
        /// Workflow-automation webhook; may return generated files
        Workflow,
        /// Completion endpoint with the given model identifier
        Completion { model: String },
    }

    /// A user-selected file waiting to be sent.
    #[derive(Debug, Clone)]
    pub struct Attachment {
        pub name: String,
        pub mime_type: String,
        pub bytes: Vec<u8>,
    }

    impl Attachment {
        pub fn new(name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
            Self {
                name: name.into(),
                mime_type: mime_type.into(),
                bytes,
            }
        }

        pub fn size_bytes(&self) -> u64 {
            self.bytes.len() as u64
        }

        /// Types the workflow backend accepts as raw form-data parts.
        /// Everything else is base64-encoded before upload.
        pub fn is_binary_capable(&self) -> bool {
            self.mime_type == "application/pdf" || self.mime_type.starts_with("image/")
        }

        /// Descriptor kept on the sent message (payload not retained).
        pub fn info(&self) -> AttachmentInfo {
            AttachmentInfo {
                name: self.name.clone(),
                mime_type: self.mime_type.clone(),
                size_bytes: self.size_bytes(),
            }
        }
    }

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct AttachmentInfo {
        pub name: String,
        pub mime_type: String,
        pub size_bytes: u64,
    }

    /// A bot-produced text artifact the user can save locally.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct GeneratedFile {
        pub name: String,
        pub content: String,
        pub content_type: String,
        pub size_bytes: u64,
    }

    impl GeneratedFile {
        pub fn text(name: impl Into<String>, content: impl Into<String>) -> Self {
            let content = content.into();
            Self {
                name: name.into(),
                size_bytes: content.len() as u64,
                content_type: "text/plain".into(),
                content,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::chat_api::{Attachment, GeneratedFile};
    use super::settings::ChatSettings;

    #[test]
    fn test_settings_defaults() {
        let settings = ChatSettings::default();
        assert!(settings.completion.api_key.is_none());
        assert_eq!(settings.completion.default_model, "gpt-4");
        assert!(!settings.workflow.webhook_url.is_empty());
    }

    #[test]
    fn test_binary_capable_types() {
        let pdf = Attachment::new("report.pdf", "application/pdf", vec![0x25, 0x50]);
        let png = Attachment::new("shot.png", "image/png", vec![0x89]);
        let txt = Attachment::new("notes.txt", "text/plain", b"hello".to_vec());
        assert!(pdf.is_binary_capable());
        assert!(png.is_binary_capable());
        assert!(!txt.is_binary_capable());
    }

    #[test]
    fn test_attachment_info_captures_size() {
        let att = Attachment::new("notes.txt", "text/plain", b"hello".to_vec());
        let info = att.info();
        assert_eq!(info.name, "notes.txt");
        assert_eq!(info.size_bytes, 5);
    }

    #[test]
    fn test_generated_file_size() {
        let file = GeneratedFile::text("file.text", "hello");
        assert_eq!(file.size_bytes, 5);
        assert_eq!(file.content_type, "text/plain");
    }
}
