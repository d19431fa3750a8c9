//! Configuration loading for promptlog.
//!
//! Layers, lowest precedence first:
//!   1. built-in defaults
//!   2. a config file: `$CONFIG_FILE`, else the first of `config.toml`,
//!      `config.yaml`, `config.yml` found in the working directory
//!   3. `.env` in the working directory, then process environment variables
//!
//! Provider credentials have no defaults.

mod env;
mod error;

use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

pub use env::*;
pub use error::ConfigError;

/// Environment variable naming an explicit config file.
pub const CONFIG_FILE_ENV: &str = "CONFIG_FILE";

/// Dotenv file read from the working directory.
pub const DOTENV_FILE: &str = ".env";

/// Files probed, in order, when `CONFIG_FILE` is unset.
pub const DEFAULT_CONFIG_FILES: &[&str] = &["config.toml", "config.yaml", "config.yml"];

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default, alias = "db")]
    pub database: DatabaseConfig,
    #[serde(default, alias = "openai")]
    pub provider: ProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String { "0.0.0.0".to_string() }
fn default_server_port() -> u16    { 8080 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_server_host(), port: default_server_port() }
    }
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_db_user", alias = "username")]
    pub user: String,
    #[serde(default = "empty_secret", deserialize_with = "deserialize_secret")]
    pub password: SecretString,
    #[serde(default = "default_db_name", alias = "database")]
    pub dbname: String,
    /// libpq-style `sslmode` (`disable`, `prefer`, `require`, …).
    #[serde(default = "default_sslmode")]
    pub sslmode: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
}

fn default_db_host()         -> String { "localhost".to_string() }
fn default_db_port()         -> u16    { 5432 }
fn default_db_user()         -> String { "postgres".to_string() }
fn default_db_name()         -> String { "promptlog".to_string() }
fn default_sslmode()         -> String { "disable".to_string() }
fn default_max_connections() -> u32    { 10 }
fn default_acquire_timeout() -> u64    { 10 }

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: default_db_host(),
            port: default_db_port(),
            user: default_db_user(),
            password: empty_secret(),
            dbname: default_db_name(),
            sslmode: default_sslmode(),
            max_connections: default_max_connections(),
            acquire_timeout_secs: default_acquire_timeout(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProviderConfig {
    /// Full chat-completions endpoint URL.
    #[serde(default = "default_provider_url")]
    pub url: String,
    #[serde(default)]
    pub model: String,
    #[serde(default = "empty_secret", deserialize_with = "deserialize_secret")]
    pub api_key: SecretString,
    #[serde(default = "empty_secret", deserialize_with = "deserialize_secret")]
    pub org_key: SecretString,
    /// Content of the fixed "system" message.
    #[serde(default)]
    pub system: String,
    #[serde(default = "default_temperature", alias = "temp")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens", alias = "max_token")]
    pub max_tokens: u32,
    /// Whole-request timeout; `0` disables it.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_provider_url() -> String { "https://api.openai.com/v1/chat/completions".to_string() }
fn default_temperature()  -> f32    { 0.7 }
fn default_max_tokens()   -> u32    { 256 }
fn default_timeout()      -> u64    { 60 }
fn default_user_agent()   -> String { format!("promptlog/{}", env!("CARGO_PKG_VERSION")) }

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: default_provider_url(),
            model: String::new(),
            api_key: empty_secret(),
            org_key: empty_secret(),
            system: String::new(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// Seed the process environment from a dotenv file. A missing file is
/// skipped; an unreadable or malformed one is an error.
pub fn load_dotenv(path: &Path) -> Result<(), ConfigError> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(source) => Err(ConfigError::Dotenv { path: path.to_path_buf(), source }),
    }
}


impl Config {
    /// Load configuration from file and environment.
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv(Path::new(DOTENV_FILE))?;

        let mut config = match config_file_path()? {
            Some(path) => {
                tracing::info!(path = %path.display(), "Reading configuration file");
                Self::from_file(&path)?
            }
            None => {
                tracing::info!("Config file not found; using default configuration values");
                Self::default()
            }
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a config file, choosing TOML or YAML by extension.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content).map_err(|source| ConfigError::Toml {
                path: path.to_path_buf(),
                source,
            }),
            Some("yaml") | Some("yml") => {
                Self::from_yaml_str(&content).map_err(|source| ConfigError::Yaml {
                    path: path.to_path_buf(),
                    source,
                })
            }
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self, serde_yaml::Error> {
        // An empty YAML document is `null`, which should mean "all defaults".
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// One-line summary for the startup log. Secrets are never included.
    pub fn summary(&self) -> String {
        format!(
            "server={}:{} database={}@{}:{}/{} (password {}) provider={} model={} (api key {}, org key {})",
            self.server.host,
            self.server.port,
            self.database.user,
            self.database.host,
            self.database.port,
            self.database.dbname,
            presence(&self.database.password),
            self.provider.url,
            if self.provider.model.is_empty() { "<unset>" } else { self.provider.model.as_str() },
            presence(&self.provider.api_key),
            presence(&self.provider.org_key),
        )
    }
}

fn presence(secret: &SecretString) -> &'static str {
    if secret.expose_secret().is_empty() { "unset" } else { "set" }
}

fn config_file_path() -> Result<Option<PathBuf>, ConfigError> {
    if let Some(explicit) = std::env::var_os(CONFIG_FILE_ENV).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(explicit);
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        return Ok(Some(path));
    }

    Ok(DEFAULT_CONFIG_FILES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists()))
}
