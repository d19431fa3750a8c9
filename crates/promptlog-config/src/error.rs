use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file {}: {source}", path.display())]
    Io { path: PathBuf, #[source] source: std::io::Error },

    #[error("Invalid TOML in {}: {source}", path.display())]
    Toml { path: PathBuf, #[source] source: toml::de::Error },

    #[error("Invalid YAML in {}: {source}", path.display())]
    Yaml { path: PathBuf, #[source] source: serde_yaml::Error },

    #[error("Invalid dotenv file {}: {source}", path.display())]
    Dotenv { path: PathBuf, #[source] source: dotenvy::Error },

    #[error("Unsupported config file format (expected .toml, .yaml or .yml): {}", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: String, value: String },
}
