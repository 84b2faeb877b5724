//! Configuration file parser for ~/.config/edutree/config.toml.
//!
//! The config file is optional: a missing file yields `Config::default()`.
//! Unknown keys are accepted but logged as a warning, since they are usually
//! typos. Command-line flags override whatever is loaded here.
use secrecy::SecretString;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the API bearer token. Takes precedence over
/// `api_token` in the config file.
pub const TOKEN_ENV_VAR: &str = "EDUTREE_API_TOKEN";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),

    #[error("Invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
/// `api_token` is masked in the `Debug` output.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the platform REST API, e.g. `https://learn.example.edu/api`.
    pub api_base_url: String,

    /// Bearer token for the API (alternative to `EDUTREE_API_TOKEN`).
    pub api_token: Option<String>,

    /// Per-request timeout for the category fetch.
    pub request_timeout_secs: u64,

    /// Quiet period after the last keystroke before the search filter runs.
    pub search_debounce_ms: u64,

    /// Nodes shallower than this start expanded (1 = only top-level categories).
    pub expand_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000/api".to_string(),
            api_token: None,
            request_timeout_secs: crate::api::DEFAULT_TIMEOUT.as_secs(),
            search_debounce_ms: crate::app::SEARCH_DEBOUNCE.as_millis() as u64,
            expand_depth: crate::tree::DEFAULT_EXPAND_DEPTH,
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_base_url", &self.api_base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("search_debounce_ms", &self.search_debounce_ms)
            .field("expand_depth", &self.expand_depth)
            .finish()
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Upper bound for `search_debounce_ms`; longer delays feel broken.
    const MAX_DEBOUNCE_MS: u64 = 5_000;

    const KNOWN_KEYS: [&'static str; 5] = [
        "api_base_url",
        "api_token",
        "request_timeout_secs",
        "search_debounce_ms",
        "expand_depth",
    ];

    /// Load configuration from a TOML file.
    ///
    /// - Missing or empty file -> `Ok(Config::default())`
    /// - Invalid TOML -> `Err(ConfigError::Parse)`
    /// - Out-of-range values -> `Err(ConfigError::InvalidValue)`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        Self::parse(&content)
    }

    /// Parse and validate TOML text.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        config.validate()?;
        tracing::info!(api_base_url = %config.api_base_url, "Loaded configuration");
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "api_base_url",
                reason: "must not be empty".to_string(),
            });
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "request_timeout_secs",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.search_debounce_ms > Self::MAX_DEBOUNCE_MS {
            return Err(ConfigError::InvalidValue {
                key: "search_debounce_ms",
                reason: format!("must be at most {}", Self::MAX_DEBOUNCE_MS),
            });
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// API token from the environment, falling back to the config file.
    pub fn resolve_token(&self) -> Option<SecretString> {
        Self::pick_token(std::env::var(TOKEN_ENV_VAR).ok(), self.api_token.clone())
    }

    fn pick_token(env: Option<String>, file: Option<String>) -> Option<SecretString> {
        env.filter(|t| !t.trim().is_empty())
            .or_else(|| file.filter(|t| !t.trim().is_empty()))
            .map(SecretString::from)
    }
}

// ============================================================================
// Tests
// ============================================================================
