//! Environment-variable overrides.

use std::str::FromStr;

use secrecy::SecretString;

use crate::{Config, ConfigError};

pub const ENV_SERVER_HOST: &str = "SERVER_HOST";
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";
pub const ENV_DB_HOST: &str = "DB_HOST";
pub const ENV_DB_PORT: &str = "DB_PORT";
pub const ENV_DB_USER: &str = "DB_USER";
pub const ENV_DB_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_DB_NAME: &str = "DB_NAME";
pub const ENV_OPENAI_URL: &str = "OPENAI_URL";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_ORG_KEY: &str = "OPENAI_ORG_KEY";
pub const ENV_OPENAI_SYSTEM: &str = "OPENAI_SYSTEM";
pub const ENV_OPENAI_TEMP: &str = "OPENAI_TEMP";
pub const ENV_OPENAI_MAX_TOKEN: &str = "OPENAI_MAX_TOKEN";

impl Config {
    /// Apply overrides from `lookup` (normally `std::env::var`). Unset or
    /// empty variables leave the current value alone.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_SERVER_HOST) { self.server.host = v; }
        if let Some(v) = get(ENV_SERVER_PORT) { self.server.port = parse(ENV_SERVER_PORT, v)?; }

        if let Some(v) = get(ENV_DB_HOST)     { self.database.host = v; }
        if let Some(v) = get(ENV_DB_PORT)     { self.database.port = parse(ENV_DB_PORT, v)?; }
        if let Some(v) = get(ENV_DB_USER)     { self.database.user = v; }
        if let Some(v) = get(ENV_DB_PASSWORD) { self.database.password = SecretString::from(v); }
        if let Some(v) = get(ENV_DB_NAME)     { self.database.dbname = v; }

        if let Some(v) = get(ENV_OPENAI_URL)     { self.provider.url = v; }
        if let Some(v) = get(ENV_OPENAI_MODEL)   { self.provider.model = v; }
        if let Some(v) = get(ENV_OPENAI_API_KEY) { self.provider.api_key = SecretString::from(v); }
        if let Some(v) = get(ENV_OPENAI_ORG_KEY) { self.provider.org_key = SecretString::from(v); }
        if let Some(v) = get(ENV_OPENAI_SYSTEM)  { self.provider.system = v; }
        if let Some(v) = get(ENV_OPENAI_TEMP)    { self.provider.temperature = parse(ENV_OPENAI_TEMP, v)?; }
        if let Some(v) = get(ENV_OPENAI_MAX_TOKEN) {
            self.provider.max_tokens = parse(ENV_OPENAI_MAX_TOKEN, v)?;
        }

        Ok(())
    }
}

fn parse<T: FromStr>(key: &str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key: key.to_string(), value })
}
