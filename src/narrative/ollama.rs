//! Ollama chat backend.
//!
//! See: <https://github.com/ollama/ollama/blob/main/docs/api.md#generate-a-chat-completion>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{ChatMessage, NarrativeBackend, check_status, transport_error};
use crate::{Result, USER_AGENT, VibeError};

/// Default chat model.
pub const DEFAULT_OLLAMA_MODEL: &str = "llama3.2";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for a local or remote Ollama server's `/api/chat`.
#[derive(Clone)]
pub struct OllamaBackend {
    http: Client,
    host: String,
    model: String,
    timeout: Duration,
    temperature: f32,
}

impl OllamaBackend {
    /// Create a backend for the server at `host` (e.g. `http://localhost:11434`).
    pub fn new(host: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| VibeError::Http(e.to_string()))?;

        Ok(Self {
            http,
            host: host.into().trim_end_matches('/').to_string(),
            model: model.into(),
            timeout: DEFAULT_TIMEOUT,
            temperature: 0.7,
        })
    }

    /// Set the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl NarrativeBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    #[instrument(skip_all, fields(backend = "ollama", model = %self.model))]
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let url = format!("{}/api/chat", self.host);
        let request = OllamaChatRequest {
            model: &self.model,
            messages: [ChatMessage::system(system), ChatMessage::user(user)],
            stream: false,
            options: OllamaOptions {
                temperature: self.temperature,
            },
        };

        let response = self
            .http
            .post(&url)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        check_status(&response, "ollama")?;

        let body: OllamaChatResponse = response.json().await.map_err(transport_error)?;

        // Older servers answer with a `messages` list instead of `message`.
        body.message
            .or_else(|| body.messages.into_iter().last())
            .and_then(|m| m.content)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(VibeError::EmptyResponse)
    }
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct OllamaChatResponse {
    #[serde(default)]
    message: Option<OllamaMessage>,
    #[serde(default)]
    messages: Vec<OllamaMessage>,
}

#[derive(Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: Option<String>,
}
