use crate::dispatch::DispatchError;
use anyhow::{anyhow, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::chat_api::HistoryEntry;
use shared::settings::CompletionSettings;
use std::env;
use std::sync::LazyLock;
use std::time::Duration;

static SHARED_HTTP: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .timeout(Duration::from_secs(120))
        .pool_max_idle_per_host(2)
        .build()
        .expect("failed to build HTTP client")
});

// ── Wire types ───────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [HistoryEntry],
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────

pub struct CompletionClient {
    http: Client,
    auth_token: String,
    base_url: String,
}

impl CompletionClient {
    pub fn new(settings: &CompletionSettings) -> Result<Self> {
        let auth_token = if let Some(api_key) = &settings.api_key {
            api_key.clone()
        } else {
            env::var("COMPLETION_API_KEY")
                .map_err(|_| anyhow!("no completion API key configured"))?
        };

        Ok(Self {
            http: SHARED_HTTP.clone(),
            auth_token,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// One non-streaming completion round trip. The reply is the first
    /// choice's message content; an empty choice list yields an empty string.
    pub async fn generate(
        &self,
        model: &str,
        messages: &[HistoryEntry],
    ) -> Result<String, DispatchError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let req = CompletionRequest { model, messages };
        let resp = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.auth_token))
            .header("Content-Type", "application/json")
            .json(&req)
            .send()
            .await?;
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let detail: String = body.chars().take(800).collect();
            return Err(DispatchError::Status { status, detail });
        }
        let body: CompletionResponse = resp.json().await?;
        let text = body
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        Ok(text)
    }
}
