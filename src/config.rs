//! Configuration loading for the `vibeboard` binary.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag)
//! 2. `~/.vibeboard/config.toml` (user)
//! 3. `/etc/vibeboard/config.toml` (system)
//!
//! Without any file, built-in defaults apply.
//!
//! Secrets are loaded separately with mandatory permission checks:
//! 1. `~/.vibeboard/secrets.toml` (user, must be 0600)
//! 2. `/etc/vibeboard/secrets.toml` (system, must be 0600)
//!
//! The OpenAI key falls back to `OPENAI_API_KEY`; the Ollama host falls back
//! to `OLLAMA_HOST`. Configuring both narrative backends is rejected.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::analysis::kmeans::DEFAULT_K;
use crate::analysis::{ColorAnalyzer, DEFAULT_SAMPLE_BUDGET};
use crate::board::{DEFAULT_MAX_CONCURRENT_FETCHES, VibePipeline};
use crate::catalog::{MusicBrainzCatalog, MusicBrainzClient};
use crate::cover::{
    CoverArtFetcher, DEFAULT_ARCHIVE_BASE_URL, DEFAULT_ITUNES_BASE_URL, DEFAULT_ITUNES_TIMEOUT,
    DEFAULT_RELEASE_FALLBACK_LIMIT, ItunesClient,
};
use crate::narrative::{
    DEFAULT_MAX_RESPONSE_CHARS, DEFAULT_OLLAMA_MODEL, DEFAULT_OPENAI_MODEL, NarrativeBridge,
    NarrativeConfig, OllamaSettings, OpenAiSettings,
};
use crate::search::CoverSearch;
use crate::service::VibeService;
use crate::{Result, VibeError};

const MUSICBRAINZ_BASE_URL: &str = "https://musicbrainz.org/ws/2";

/// vibeboard configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub narrative: NarrativeSection,
}

/// Cover fetching.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Cover Art Archive base URL.
    #[serde(default = "default_archive_url")]
    pub archive_base_url: String,
    /// Per-request timeout in seconds (default: 12).
    #[serde(default = "default_fetch_timeout")]
    pub timeout_secs: u64,
    /// Maximum simultaneous cover fetches (default: 6).
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Try individual releases when release-group artwork is missing.
    #[serde(default = "default_true")]
    pub release_fallback: bool,
    /// Releases tried per release group (default: 10).
    #[serde(default = "default_release_limit")]
    pub release_limit: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            archive_base_url: default_archive_url(),
            timeout_secs: default_fetch_timeout(),
            max_concurrent: default_max_concurrent(),
            release_fallback: true,
            release_limit: default_release_limit(),
        }
    }
}

fn default_archive_url() -> String {
    DEFAULT_ARCHIVE_BASE_URL.to_string()
}

fn default_fetch_timeout() -> u64 {
    12
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT_FETCHES
}

fn default_true() -> bool {
    true
}

fn default_release_limit() -> usize {
    DEFAULT_RELEASE_FALLBACK_LIMIT
}

/// MusicBrainz lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_catalog_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 20).
    #[serde(default = "default_catalog_timeout")]
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            timeout_secs: default_catalog_timeout(),
        }
    }
}

fn default_catalog_url() -> String {
    MUSICBRAINZ_BASE_URL.to_string()
}

fn default_catalog_timeout() -> u64 {
    20
}

/// Palette extraction.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    /// Palette size (default: 5).
    #[serde(default = "default_clusters")]
    pub clusters: usize,
    /// Pixels sampled per cover (default: 10000).
    #[serde(default = "default_sample_budget")]
    pub sample_budget: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            clusters: default_clusters(),
            sample_budget: default_sample_budget(),
        }
    }
}

fn default_clusters() -> usize {
    DEFAULT_K
}

fn default_sample_budget() -> usize {
    DEFAULT_SAMPLE_BUDGET
}

/// Cover search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Ask iTunes when the archive has no front cover (default: true).
    #[serde(default = "default_true")]
    pub itunes_fallback: bool,
    #[serde(default = "default_itunes_url")]
    pub itunes_base_url: String,
    /// iTunes request timeout in seconds (default: 8).
    #[serde(default = "default_itunes_timeout")]
    pub itunes_timeout_secs: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            itunes_fallback: true,
            itunes_base_url: default_itunes_url(),
            itunes_timeout_secs: default_itunes_timeout(),
        }
    }
}

fn default_itunes_url() -> String {
    DEFAULT_ITUNES_BASE_URL.to_string()
}

fn default_itunes_timeout() -> u64 {
    DEFAULT_ITUNES_TIMEOUT.as_secs()
}

/// Narrative backends. At most one may end up configured.
#[derive(Debug, Clone, Deserialize)]
pub struct NarrativeSection {
    /// Maximum narrative length in characters (default: 2000).
    #[serde(default = "default_max_response_chars")]
    pub max_response_chars: usize,
    /// Per-request timeout override in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub openai: Option<OpenAiSection>,
    #[serde(default)]
    pub ollama: Option<OllamaSection>,
}

impl Default for NarrativeSection {
    fn default() -> Self {
        Self {
            max_response_chars: default_max_response_chars(),
            timeout_secs: None,
            openai: None,
            ollama: None,
        }
    }
}

fn default_max_response_chars() -> usize {
    DEFAULT_MAX_RESPONSE_CHARS
}

/// OpenAI options; the API key lives in the secrets file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OpenAiSection {
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Ollama options.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OllamaSection {
    /// Server URL, e.g. `http://localhost:11434`.
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Secrets configuration (API keys).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Secrets {
    #[serde(default)]
    pub openai: Option<ApiKeySecret>,
}

/// A single API key secret.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiKeySecret {
    pub api_key: String,
}

/// Backend name → environment variable name mapping.
const BACKEND_ENV_VARS: &[(&str, &str)] = &[("openai", "OPENAI_API_KEY")];

const OLLAMA_HOST_ENV: &str = "OLLAMA_HOST";

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// An explicit path must exist; otherwise a missing file means defaults.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            VibeError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            VibeError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(VibeError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".vibeboard").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/vibeboard/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Resolve the narrative backend from config, secrets and the environment.
    pub fn narrative_config(&self, secrets: &Secrets) -> Result<NarrativeConfig> {
        let ollama_host = self
            .narrative
            .ollama
            .as_ref()
            .and_then(|o| o.host.clone())
            .or_else(|| std::env::var(OLLAMA_HOST_ENV).ok());
        self.narrative_config_from(secrets.api_key("openai"), ollama_host)
    }

    /// Resolve the narrative backend from an already-looked-up API key and
    /// Ollama host. Blank values count as unset.
    pub fn narrative_config_from(
        &self,
        openai_api_key: Option<String>,
        ollama_host: Option<String>,
    ) -> Result<NarrativeConfig> {
        let section = &self.narrative;

        let openai = non_blank(openai_api_key).map(|api_key| {
            let opts = section.openai.clone().unwrap_or_default();
            OpenAiSettings {
                api_key,
                model: opts.model.unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
                base_url: opts.base_url,
            }
        });
        let ollama = non_blank(ollama_host).map(|host| OllamaSettings {
            host,
            model: section
                .ollama
                .as_ref()
                .and_then(|o| o.model.clone())
                .unwrap_or_else(|| DEFAULT_OLLAMA_MODEL.to_string()),
        });

        let mut config =
            NarrativeConfig::resolve(openai, ollama)?.max_response_chars(section.max_response_chars);
        if let Some(secs) = section.timeout_secs {
            config = config.timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    fn musicbrainz_client(&self) -> Result<MusicBrainzClient> {
        Ok(MusicBrainzClient::with_base_url(&self.catalog.base_url)?
            .timeout(Duration::from_secs(self.catalog.timeout_secs)))
    }

    fn cover_fetcher(&self, musicbrainz: &MusicBrainzClient) -> Result<CoverArtFetcher> {
        let mut fetcher = CoverArtFetcher::with_base_url(&self.fetch.archive_base_url)?
            .timeout(Duration::from_secs(self.fetch.timeout_secs))
            .release_limit(self.fetch.release_limit);
        if self.fetch.release_fallback {
            fetcher = fetcher.release_fallback(musicbrainz.clone());
        }
        Ok(fetcher)
    }

    /// Build the full service described by this configuration.
    pub fn build_service(&self, secrets: &Secrets) -> Result<VibeService> {
        let narrative = NarrativeBridge::from_config(&self.narrative_config(secrets)?)?;

        let musicbrainz = self.musicbrainz_client()?;
        let fetcher = self.cover_fetcher(&musicbrainz)?;

        let pipeline = VibePipeline::new(Arc::new(fetcher))
            .analyzer(
                ColorAnalyzer::default()
                    .clusters(self.analysis.clusters)
                    .sample_budget(self.analysis.sample_budget),
            )
            .max_concurrent_fetches(self.fetch.max_concurrent);

        Ok(VibeService::new(
            Arc::new(MusicBrainzCatalog::new(musicbrainz)),
            pipeline,
            narrative,
        ))
    }

    /// Build the cover search described by this configuration.
    pub fn build_cover_search(&self) -> Result<CoverSearch> {
        let musicbrainz = self.musicbrainz_client()?;
        let fetcher = self.cover_fetcher(&musicbrainz)?;

        let mut search = CoverSearch::new(MusicBrainzCatalog::new(musicbrainz), fetcher)
            .max_concurrent_lookups(self.fetch.max_concurrent);
        if self.search.itunes_fallback {
            let itunes = ItunesClient::with_base_url(&self.search.itunes_base_url)?
                .timeout(Duration::from_secs(self.search.itunes_timeout_secs));
            search = search.itunes_fallback(itunes);
        }
        Ok(search)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Secrets {
    /// Load secrets from the standard locations with permission checks.
    ///
    /// Resolution order:
    /// 1. `~/.vibeboard/secrets.toml` (if exists, must be 0600)
    /// 2. `/etc/vibeboard/secrets.toml` (if exists, must be 0600)
    ///
    /// Returns empty secrets if no file exists (keys may come from env vars).
    pub fn load() -> Result<Self> {
        // Try user secrets first
        if let Some(home) = dirs::home_dir() {
            let user_secrets = home.join(".vibeboard").join("secrets.toml");
            if user_secrets.exists() {
                return Self::load_from_file(&user_secrets);
            }
        }

        // Try system secrets
        let system_secrets = PathBuf::from("/etc/vibeboard/secrets.toml");
        if system_secrets.exists() {
            return Self::load_from_file(&system_secrets);
        }

        Ok(Secrets::default())
    }

    /// Load one secrets file after checking its permissions.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        Self::check_permissions(path)?;
        let content = fs::read_to_string(path).map_err(|e| {
            VibeError::Configuration(format!("Failed to read secrets file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            VibeError::Configuration(format!("Failed to parse secrets file {path:?}: {e}"))
        })
    }

    /// Check that the secrets file has secure permissions (0600 or 0400).
    #[cfg(unix)]
    fn check_permissions(path: &Path) -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let metadata = fs::metadata(path).map_err(|e| {
            VibeError::Configuration(format!("Failed to stat secrets file {path:?}: {e}"))
        })?;

        let mode = metadata.permissions().mode();
        // Reject if group or other bits are set
        if mode & 0o077 != 0 {
            return Err(VibeError::Configuration(format!(
                "Secrets file {path:?} has insecure permissions {:o}. Must be 0600 or 0400.",
                mode & 0o777
            )));
        }

        Ok(())
    }

    #[cfg(not(unix))]
    fn check_permissions(_path: &Path) -> Result<()> {
        Ok(())
    }

    /// API key for a backend, falling back to the corresponding environment variable.
    pub fn api_key(&self, backend: &str) -> Option<String> {
        let from_file = match backend {
            "openai" => self.openai.as_ref(),
            _ => None,
        }
        .map(|s| s.api_key.clone());

        from_file.or_else(|| {
            BACKEND_ENV_VARS
                .iter()
                .find(|(name, _)| *name == backend)
                .and_then(|(_, env_var)| std::env::var(env_var).ok())
        })
    }
}
