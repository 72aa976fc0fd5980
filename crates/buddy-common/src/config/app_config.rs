//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when
//! present). Remote service credentials have no defaults.

use serde::Deserialize;
use std::env;

/// Largest page the remote directory and history endpoints accept
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub remote: RemoteConfig,
    pub chat: ChatConfig,
    pub cors: CorsConfig,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default = "default_env")]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Remote chat service credentials
#[derive(Clone, Deserialize)]
pub struct RemoteConfig {
    pub app_id: String,
    pub region: String,
    pub auth_key: String,
}

impl std::fmt::Debug for RemoteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteConfig")
            .field("app_id", &self.app_id)
            .field("region", &self.region)
            .field("auth_key", &"<redacted>")
            .finish()
    }
}

/// Page sizes used by the chat adapter
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChatConfig {
    #[serde(default = "default_users_page_limit")]
    pub users_page_limit: u32,
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            users_page_limit: default_users_page_limit(),
            history_limit: default_history_limit(),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

// Default value functions
fn default_app_name() -> String {
    "StudyBuddy".to_string()
}

fn default_env() -> Environment {
    Environment::Development
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_users_page_limit() -> u32 {
    30
}

fn default_history_limit() -> u32 {
    50
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            let value = lookup(key).ok_or(ConfigError::MissingVar(key))?;
            let value = value.trim().to_string();
            if value.is_empty() {
                return Err(ConfigError::InvalidValue(key, "must not be blank".to_string()));
            }
            Ok(value)
        };

        let limit = |key: &'static str, default: u32| -> Result<u32, ConfigError> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => match raw.trim().parse::<u32>() {
                    Ok(n) if (1..=MAX_PAGE_LIMIT).contains(&n) => Ok(n),
                    _ => Err(ConfigError::InvalidValue(
                        key,
                        format!("expected 1..={MAX_PAGE_LIMIT}, got {raw:?}"),
                    )),
                },
            }
        };

        let port = match lookup("API_PORT") {
            None => default_port(),
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue("API_PORT", raw.clone()))?,
        };

        let env = match lookup("APP_ENV") {
            None => Environment::default(),
            Some(raw) => Environment::parse(raw.trim())
                .ok_or_else(|| ConfigError::InvalidValue("APP_ENV", raw.clone()))?,
        };

        Ok(Self {
            app: AppSettings {
                name: lookup("APP_NAME").unwrap_or_else(default_app_name),
                env,
            },
            api: ServerConfig {
                host: lookup("API_HOST").unwrap_or_else(default_host),
                port,
            },
            remote: RemoteConfig {
                app_id: required("CHAT_APP_ID")?,
                region: required("CHAT_REGION")?.to_lowercase(),
                auth_key: required("CHAT_AUTH_KEY")?,
            },
            chat: ChatConfig {
                users_page_limit: limit("USERS_PAGE_LIMIT", default_users_page_limit())?,
                history_limit: limit("MESSAGES_HISTORY_LIMIT", default_history_limit())?,
            },
            cors: CorsConfig {
                allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                    .map(|s| {
                        s.split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(String::from)
                            .collect()
                    })
                    .unwrap_or_default(),
            },
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
