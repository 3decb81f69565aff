use apexbot::prelude::*;
use serde::Deserialize;
use std::time::Duration;

pub const API_BASE_URL: &str = "https://api.mozambiquehe.re";
pub const API_KEY_ENV: &str = "APEX_LEGENDS_API_KEY";
pub const TIMEOUT: Duration = Duration::from_secs(10);

/// The module's `[module.apex]` table.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl Config {
    pub fn from_toml(value: toml::Value) -> Result<Self> {
        let settings: Settings = value.try_into().context("invalid apex module config")?;
        Ok(Self::resolve(std::env::var(API_KEY_ENV).ok(), settings))
    }

    /// The environment's key wins over the one in the module config; blank keys count as unset.
    pub fn resolve(env_key: Option<String>, settings: Settings) -> Self {
        let Settings { api_key, base_url } = settings;
        let api_key = env_key
            .filter(|k| !k.trim().is_empty())
            .or_else(|| api_key.filter(|k| !k.trim().is_empty()));

        Self {
            api_base_url: base_url
                .unwrap_or_else(|| API_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            timeout: TIMEOUT,
        }
    }
}
