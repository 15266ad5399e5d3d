//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables, configuration files, or defaults.

use super::transport::TransportConfig;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
///
/// This struct contains all configurable aspects of the server, organized
/// by domain for clarity and maintainability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Persisted input store configuration.
    pub storage: StorageConfig,

    /// Timings of the shared tool state machinery.
    pub state: StateConfig,

    /// Prompt builder (completion API) configuration.
    pub prompt_builder: PromptBuilderConfig,

    /// External API credentials configuration.
    pub credentials: CredentialsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Configuration for the persisted input store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON file backing the store.
    /// If None, values only live for the lifetime of the process.
    pub path: Option<PathBuf>,
}

/// Delays used by the debouncer, the notification center and tool states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Quiet period before a live transform runs.
    pub debounce_ms: u64,

    /// Lifetime of a notification before it is removed automatically.
    pub notification_ttl_ms: u64,

    /// Lifetime of a tool's success message.
    pub success_ttl_ms: u64,
}

impl StateConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_millis(self.notification_ttl_ms)
    }

    pub fn success_ttl(&self) -> Duration {
        Duration::from_millis(self.success_ttl_ms)
    }
}

/// Configuration of the chat-completion endpoint used by `prompt_build`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptBuilderConfig {
    /// Base URL of the OpenAI-compatible API.
    pub base_url: String,

    /// Model identifier sent with every request.
    pub model: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Configuration for external API credentials.
///
/// Secrets are read at runtime and never serialized.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// OpenRouter API key for the prompt builder.
    #[serde(skip)]
    pub openrouter_api_key: Option<Secret<String>>,
}

impl CredentialsConfig {
    /// The OpenRouter key, if one is configured and non-blank.
    pub fn openrouter_api_key(&self) -> Option<&str> {
        self.openrouter_api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.trim().is_empty())
    }
}

/// Custom Debug implementation to redact secrets from logs.
impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field(
                "openrouter_api_key",
                &self.openrouter_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            notification_ttl_ms: 5_000,
            success_ttl_ms: 3_000,
        }
    }
}

impl Default for PromptBuilderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-3.5-turbo".to_string(),
            timeout_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "devkit-mcp-server".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                with_timestamps: true,
            },
            transport: TransportConfig::default(),
            storage: StorageConfig::default(),
            state: StateConfig::default(),
            prompt_builder: PromptBuilderConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env();

        if let Ok(path) = std::env::var("MCP_STORAGE_PATH") {
            config.storage.path = Some(PathBuf::from(path));
            info!("Persisted store file: {:?}", config.storage.path);
        } else {
            warn!("MCP_STORAGE_PATH not set - tool inputs are kept in memory only");
        }

        if let Some(ms) = env_millis("MCP_DEBOUNCE_MS") {
            config.state.debounce_ms = ms;
        }
        if let Some(ms) = env_millis("MCP_NOTIFICATION_TTL_MS") {
            config.state.notification_ttl_ms = ms;
        }
        if let Some(ms) = env_millis("MCP_SUCCESS_TTL_MS") {
            config.state.success_ttl_ms = ms;
        }

        if let Ok(base_url) = std::env::var("MCP_OPENROUTER_BASE_URL") {
            config.prompt_builder.base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Ok(model) = std::env::var("MCP_OPENROUTER_MODEL") {
            config.prompt_builder.model = model;
        }
        if let Some(secs) = env_millis("MCP_OPENROUTER_TIMEOUT_SECS") {
            config.prompt_builder.timeout_secs = secs;
        }

        // The key is only ever read at runtime; it is never compiled in.
        match std::env::var("MCP_OPENROUTER_API_KEY") {
            Ok(api_key) if !api_key.trim().is_empty() => {
                config.credentials.openrouter_api_key = Some(Secret::new(api_key));
                info!("OpenRouter API key loaded from environment");
            }
            _ => {
                warn!("MCP_OPENROUTER_API_KEY not set - the prompt_build tool is disabled");
            }
        }

        config
    }
}

/// Parse a numeric environment variable, ignoring malformed values.
fn env_millis(name: &str) -> Option<u64> {
    let raw = std::env::var(name).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!("Ignoring invalid value for {}: {:?}", name, raw);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to ensure env var tests run serially
    static ENV_TEST_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_api_key_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_OPENROUTER_API_KEY", "sk-or-test-12345");
        }
        let config = Config::from_env();
        assert_eq!(
            config.credentials.openrouter_api_key(),
            Some("sk-or-test-12345")
        );
        unsafe {
            std::env::remove_var("MCP_OPENROUTER_API_KEY");
        }
    }

    #[test]
    fn test_api_key_absent_by_default() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::remove_var("MCP_OPENROUTER_API_KEY");
        }
        let config = Config::from_env();
        assert!(config.credentials.openrouter_api_key().is_none());
    }

    #[test]
    fn test_state_timings_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_DEBOUNCE_MS", "50");
            std::env::set_var("MCP_NOTIFICATION_TTL_MS", "not-a-number");
        }
        let config = Config::from_env();
        assert_eq!(config.state.debounce(), Duration::from_millis(50));
        assert_eq!(config.state.notification_ttl(), Duration::from_secs(5));
        unsafe {
            std::env::remove_var("MCP_DEBOUNCE_MS");
            std::env::remove_var("MCP_NOTIFICATION_TTL_MS");
        }
    }

    #[test]
    fn test_credentials_redacted_in_debug() {
        let creds = CredentialsConfig {
            openrouter_api_key: Some(Secret::new("super_secret_key".to_string())),
        };
        let debug_str = format!("{:?}", creds);
        assert!(debug_str.contains("REDACTED"));
        assert!(!debug_str.contains("super_secret_key"));
    }

    #[test]
    fn test_blank_key_is_treated_as_missing() {
        let creds = CredentialsConfig {
            openrouter_api_key: Some(Secret::new("   ".to_string())),
        };
        assert!(creds.openrouter_api_key().is_none());
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.state.debounce_ms, 300);
        assert_eq!(config.state.success_ttl(), Duration::from_secs(3));
        assert_eq!(config.prompt_builder.model, "openai/gpt-3.5-turbo");
        assert!(config.storage.path.is_none());
    }
}
