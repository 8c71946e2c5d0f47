//! EduNexus configuration management

use crate::catalogue::types::Role;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main EduNexus configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortalConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Assistant backend configuration
    #[serde(default)]
    pub assistant: AssistantConfig,

    /// Login accounts
    #[serde(default)]
    pub auth: AuthConfig,
}

impl PortalConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config
            .validate()
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    /// Reject values the server cannot run with
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.server.session_idle_secs == 0 {
            return Err("server.session_idle_secs must be at least 1".to_string());
        }
        if self.server.session_idle_secs > MAX_SESSION_IDLE_SECS {
            return Err(format!(
                "server.session_idle_secs must be at most {}",
                MAX_SESSION_IDLE_SECS
            ));
        }
        if self.assistant.timeout_secs == 0 {
            return Err("assistant.timeout_secs must be at least 1".to_string());
        }
        if self.assistant.max_retries > MAX_RETRIES {
            return Err(format!("assistant.max_retries must be at most {}", MAX_RETRIES));
        }
        Ok(())
    }

    /// Load `explicit` if given, else the per-user config file if it exists,
    /// else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::load(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Upper bound on `assistant.max_retries`
pub const MAX_RETRIES: u32 = 10;

/// One year
const MAX_SESSION_IDLE_SECS: u64 = 365 * 24 * 3600;

/// `<config_dir>/edunexus/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join("edunexus").join("config.toml"))
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Allowed CORS origins (empty = any)
    pub cors_origins: Vec<String>,

    /// Sessions idle longer than this are dropped
    pub session_idle_secs: u64,

    /// How often idle sessions are swept
    pub cleanup_interval_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 18080,
            cors_origins: Vec::new(),
            session_idle_secs: 3600,
            cleanup_interval_secs: 300,
        }
    }
}

impl ServerConfig {
    /// Idle limit in milliseconds, clamped to `1..=MAX_SESSION_IDLE_SECS` seconds
    pub fn session_idle_ms(&self) -> i64 {
        let secs = self.session_idle_secs.clamp(1, MAX_SESSION_IDLE_SECS);
        (secs * 1000) as i64
    }
}

/// Assistant backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Backend provider (`gemini`)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Override for the provider's API endpoint
    pub base_url: Option<String>,

    /// Environment variable holding the API key
    pub api_key_ref: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Per-attempt timeout
    pub timeout_secs: u64,

    /// Extra attempts after a failed one
    pub max_retries: u32,

    /// Pause before each retry
    pub retry_backoff_ms: u64,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            base_url: None,
            api_key_ref: "GEMINI_API_KEY".to_string(),
            temperature: 0.7,
            timeout_secs: 30,
            max_retries: 1,
            retry_backoff_ms: 500,
        }
    }
}

impl AssistantConfig {
    /// Read the API key from `api_key_ref`, trying the exact name first and
    /// then its upper-case form.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_ref)
            .or_else(|_| std::env::var(self.api_key_ref.to_uppercase()))
            .ok()
            .filter(|v| !v.is_empty())
    }
}

/// Login accounts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub accounts: Vec<AccountConfig>,
}

impl AuthConfig {
    /// Demonstration accounts, one per role
    pub fn demo() -> Self {
        Self {
            accounts: vec![
                AccountConfig::new("profesor", "admin", Role::Teacher, "Profesor Demo"),
                AccountConfig::new("ampa", "ampa", Role::Ampa, "Admin AMPA"),
                AccountConfig::new("padre", "1234", Role::Parent, "Familia Demo"),
                AccountConfig::new("alumno", "1234", Role::Student, "Estudiante Demo"),
            ],
        }
    }
}

/// A single login account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub display_name: String,
}

impl AccountConfig {
    pub fn new(username: &str, password: &str, role: Role, display_name: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            role,
            display_name: display_name.to_string(),
        }
    }
}
