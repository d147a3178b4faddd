//! Narrative bridge: a short text description of a vibe board.
//!
//! Exactly one backend is chosen once from [`NarrativeConfig`]; there is no
//! per-request fallback between backends and no retries. Backend failures
//! are returned to the caller and never invalidate the board itself.

pub mod ollama;
pub mod openai;
pub mod prompt;

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::telemetry;
use crate::types::VibeBoard;
use crate::{Result, VibeError};

pub use ollama::{DEFAULT_OLLAMA_MODEL, OllamaBackend};
pub use openai::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENAI_MODEL, OpenAiBackend};
pub use prompt::{MAX_DIGEST_CHARS, NarrativeStyle, SYSTEM_PROMPT, board_digest, user_prompt};

/// Default cap on returned narrative length, in characters.
pub const DEFAULT_MAX_RESPONSE_CHARS: usize = 2_000;

/// Text-generation backend used for narratives.
#[async_trait]
pub trait NarrativeBackend: Send + Sync {
    /// Backend name for logging/metrics.
    fn name(&self) -> &str;

    /// Single-turn completion for a system + user message pair.
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

// ============================================================================
// Configuration
// ============================================================================

/// Settings for an OpenAI-compatible backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
    /// Override for OpenAI-compatible gateways.
    pub base_url: Option<String>,
}

/// Settings for an Ollama backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OllamaSettings {
    pub host: String,
    pub model: String,
}

/// The one configured narrative backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeBackendConfig {
    OpenAi(OpenAiSettings),
    Ollama(OllamaSettings),
}

/// Narrative configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrativeConfig {
    pub backend: Option<NarrativeBackendConfig>,
    pub max_response_chars: usize,
    /// Per-request timeout override; backends have their own defaults.
    pub timeout: Option<Duration>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            backend: None,
            max_response_chars: DEFAULT_MAX_RESPONSE_CHARS,
            timeout: None,
        }
    }
}

impl NarrativeConfig {
    /// Pick the backend from the available settings.
    ///
    /// Both backends configured at once is a configuration error; neither
    /// leaves the bridge unconfigured.
    pub fn resolve(openai: Option<OpenAiSettings>, ollama: Option<OllamaSettings>) -> Result<Self> {
        let backend = match (openai, ollama) {
            (Some(_), Some(_)) => {
                return Err(VibeError::Configuration(
                    "both OpenAI and Ollama narrative backends are configured; configure only one"
                        .to_string(),
                ));
            }
            (Some(openai), None) => Some(NarrativeBackendConfig::OpenAi(openai)),
            (None, Some(ollama)) => Some(NarrativeBackendConfig::Ollama(ollama)),
            (None, None) => None,
        };
        Ok(Self {
            backend,
            ..Self::default()
        })
    }

    pub fn max_response_chars(mut self, n: usize) -> Self {
        self.max_response_chars = n;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

// ============================================================================
// Bridge
// ============================================================================

/// Turns a board into narrative text through the configured backend.
#[derive(Clone)]
pub struct NarrativeBridge {
    backend: Option<Arc<dyn NarrativeBackend>>,
    max_response_chars: usize,
}

impl NarrativeBridge {
    /// Build the bridge and its backend client from configuration.
    pub fn from_config(config: &NarrativeConfig) -> Result<Self> {
        let backend: Option<Arc<dyn NarrativeBackend>> = match &config.backend {
            None => None,
            Some(NarrativeBackendConfig::OpenAi(s)) => {
                let base_url = s.base_url.as_deref().unwrap_or(DEFAULT_OPENAI_BASE_URL);
                let mut backend = OpenAiBackend::with_base_url(&s.api_key, &s.model, base_url)?;
                if let Some(timeout) = config.timeout {
                    backend = backend.timeout(timeout);
                }
                Some(Arc::new(backend))
            }
            Some(NarrativeBackendConfig::Ollama(s)) => {
                let mut backend = OllamaBackend::new(&s.host, &s.model)?;
                if let Some(timeout) = config.timeout {
                    backend = backend.timeout(timeout);
                }
                Some(Arc::new(backend))
            }
        };
        Ok(Self {
            backend,
            max_response_chars: config.max_response_chars,
        })
    }

    /// Bridge over an explicit backend.
    pub fn with_backend(backend: Arc<dyn NarrativeBackend>) -> Self {
        Self {
            backend: Some(backend),
            max_response_chars: DEFAULT_MAX_RESPONSE_CHARS,
        }
    }

    /// Bridge with no backend; every request fails with `BackendNotConfigured`.
    pub fn unconfigured() -> Self {
        Self {
            backend: None,
            max_response_chars: DEFAULT_MAX_RESPONSE_CHARS,
        }
    }

    pub fn max_response_chars(mut self, n: usize) -> Self {
        self.max_response_chars = n;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn backend_name(&self) -> Option<&str> {
        self.backend.as_deref().map(|b| b.name())
    }

    /// Describe `board` in the requested style.
    ///
    /// The response is returned as produced, cut to the configured maximum
    /// length on a character boundary.
    #[instrument(skip(self, board), fields(query = %board.query, groups = board.groups.len()))]
    pub async fn narrate(&self, board: &VibeBoard, style: &NarrativeStyle) -> Result<String> {
        let Some(backend) = self.backend.as_deref() else {
            return Err(VibeError::BackendNotConfigured);
        };

        let user = user_prompt(board, style)?;
        let backend_name = backend.name().to_string();
        let start = Instant::now();
        let result = backend.complete(SYSTEM_PROMPT, &user).await;

        metrics::histogram!(telemetry::NARRATIVE_DURATION_SECONDS, "backend" => backend_name.clone())
            .record(start.elapsed().as_secs_f64());
        let status = if result.is_ok() { "ok" } else { "error" };
        metrics::counter!(telemetry::NARRATIVE_REQUESTS_TOTAL,
            "backend" => backend_name.clone(),
            "status" => status,
        )
        .increment(1);

        match result {
            Ok(text) => {
                let text = prompt::truncate_chars(&text, self.max_response_chars).to_string();
                info!(backend = %backend_name, chars = text.chars().count(), "narrative generated");
                Ok(text)
            }
            Err(e) => {
                warn!(backend = %backend_name, error = %e, "narrative request failed");
                Err(e)
            }
        }
    }
}

// ============================================================================
// Shared HTTP plumbing
// ============================================================================

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> ChatMessage<'a> {
    fn system(content: &'a str) -> Self {
        Self {
            role: "system",
            content,
        }
    }

    fn user(content: &'a str) -> Self {
        Self {
            role: "user",
            content,
        }
    }
}

/// Map a non-success status to the matching error.
fn check_status(response: &reqwest::Response, backend: &str) -> Result<()> {
    let status = response.status();

    if status.is_success() {
        return Ok(());
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            Err(VibeError::BackendRateLimited { retry_after })
        }
        code if status.is_server_error() => Err(VibeError::BackendUnavailable(format!(
            "{backend} returned {code}"
        ))),
        code => Err(VibeError::Api {
            status: code,
            message: format!("{backend} API error: {status}"),
        }),
    }
}

/// Connection failures and timeouts make the backend unavailable; a body
/// that cannot be parsed is an HTTP error.
fn transport_error(e: reqwest::Error) -> VibeError {
    if e.is_decode() {
        VibeError::Http(e.to_string())
    } else {
        VibeError::BackendUnavailable(e.to_string())
    }
}
