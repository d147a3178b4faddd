//! vibeboard error types

use std::time::Duration;

/// vibeboard error types
#[derive(Debug, thiserror::Error)]
pub enum VibeError {
    // Cover art errors (per candidate, never fatal for a board)
    #[error("no cover art available for {0}")]
    ImageUnavailable(String),

    #[error("image decode error: {0}")]
    Decode(String),

    // Catalog errors (fatal for a request)
    #[error("catalog lookup failed: {0}")]
    CatalogLookupFailed(String),

    // Narrative backend errors
    /// Neither narrative backend was configured at startup.
    #[error("narrative backend not configured")]
    BackendNotConfigured,

    #[error("narrative backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("narrative backend rate limited, retry after {retry_after:?}")]
    BackendRateLimited { retry_after: Option<Duration> },

    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("empty response from backend")]
    EmptyResponse,

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl VibeError {
    /// Stable machine-readable code for this error, used in JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            VibeError::ImageUnavailable(_) => "image_unavailable",
            VibeError::Decode(_) => "decode_error",
            VibeError::CatalogLookupFailed(_) => "catalog_lookup_failed",
            VibeError::BackendNotConfigured => "backend_not_configured",
            VibeError::BackendUnavailable(_) => "backend_unavailable",
            VibeError::BackendRateLimited { .. } => "backend_rate_limited",
            VibeError::Http(_) => "http_error",
            VibeError::Api { .. } => "api_error",
            VibeError::EmptyResponse => "empty_response",
            VibeError::Json(_) => "json_error",
            VibeError::InvalidInput(_) => "invalid_input",
            VibeError::Configuration(_) => "configuration_error",
        }
    }

    /// Whether this error aborts a whole board request.
    ///
    /// Per-candidate cover failures and narrative failures leave the board usable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            VibeError::CatalogLookupFailed(_)
                | VibeError::Configuration(_)
                | VibeError::InvalidInput(_)
        )
    }

    /// Retry hint carried by a rate-limited backend response.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            VibeError::BackendRateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for vibeboard operations
pub type Result<T> = std::result::Result<T, VibeError>;
