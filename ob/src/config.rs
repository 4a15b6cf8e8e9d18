//! OKR Board configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Values shipped in `.env.example` files that are not real credentials
const PLACEHOLDER_KEYS: &[&str] = &["your-api-key-here", "your-openai-api-key-here"];

/// Environment variable that overrides the configured base URL
pub const BASE_URL_ENV: &str = "OPENAI_BASE_URL";

/// Environment variable that overrides the configured model
pub const MODEL_ENV: &str = "OPENAI_MODEL";

/// Main OKR Board configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Storage configuration
    pub storage: StorageConfig,

    /// HTTP server configuration
    pub server: ServerConfig,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        for candidate in Self::default_paths() {
            if candidate.exists() {
                match Self::load_from_file(&candidate) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is initialised
    ///
    /// Errors are swallowed; the full load later reports them properly.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let paths = match config_path {
            Some(path) => vec![path.clone()],
            None => Self::default_paths(),
        };

        paths
            .iter()
            .filter(|p| p.exists())
            .find_map(|p| fs::read_to_string(p).ok())
            .and_then(|content| serde_yaml::from_str::<Self>(&content).ok())
            .and_then(|config| config.log_level)
    }

    /// Project-local `.okrboard.yml`, then `~/.config/okrboard/okrboard.yml`
    fn default_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(".okrboard.yml")];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("okrboard").join("okrboard.yml"));
        }
        paths
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL (the `/chat/completions` path is appended)
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_ms: 60_000,
        }
    }
}

impl LlmConfig {
    /// Resolve against the process environment
    ///
    /// This is the only place the environment is consulted; the result is
    /// handed to the client constructor.
    pub fn resolve(&self) -> ResolvedLlmConfig {
        self.resolve_with(|name| std::env::var(name).ok())
    }

    /// Resolve using an arbitrary variable lookup
    pub fn resolve_with<F>(&self, lookup: F) -> ResolvedLlmConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        debug!(api_key_env = %self.api_key_env, "resolve_with: called");
        let non_empty = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_key = non_empty(&self.api_key_env).filter(|key| !PLACEHOLDER_KEYS.contains(&key.as_str()));
        let base_url = non_empty(BASE_URL_ENV).unwrap_or_else(|| self.base_url.clone());
        let model = non_empty(MODEL_ENV).unwrap_or_else(|| self.model.clone());

        ResolvedLlmConfig {
            model,
            api_key,
            api_key_env: self.api_key_env.clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_ms: self.timeout_ms,
        }
    }
}

/// LLM settings after environment lookup
#[derive(Clone)]
pub struct ResolvedLlmConfig {
    pub model: String,
    /// `None` when the variable is unset, empty, or a known placeholder
    pub api_key: Option<String>,
    /// Name of the variable the key was read from, for error messages
    pub api_key_env: String,
    pub base_url: String,
    pub timeout_ms: u64,
}

impl ResolvedLlmConfig {
    /// API key suitable for display, e.g. `sk-abcdefg...wxyz`
    pub fn masked_api_key(&self) -> String {
        match &self.api_key {
            None => "NOT SET".to_string(),
            Some(key) => {
                let chars: Vec<char> = key.chars().collect();
                if chars.len() <= 14 {
                    "*".repeat(chars.len())
                } else {
                    let head: String = chars[..10].iter().collect();
                    let tail: String = chars[chars.len() - 4..].iter().collect();
                    format!("{}...{}", head, tail)
                }
            }
        }
    }
}

impl std::fmt::Debug for ResolvedLlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedLlmConfig")
            .field("model", &self.model)
            .field("api_key", &self.masked_api_key())
            .field("api_key_env", &self.api_key_env)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite database file shared by every front end
    #[serde(rename = "db-path")]
    pub db_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: planstore::default_db_path(),
        }
    }
}

impl StorageConfig {
    /// Database path with a leading `~/` expanded
    pub fn expanded_db_path(&self) -> PathBuf {
        match self.db_path.to_str().and_then(|p| p.strip_prefix("~/")) {
            Some(rest) => dirs::home_dir().map(|home| home.join(rest)).unwrap_or_else(|| self.db_path.clone()),
            None => self.db_path.clone(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
