//! llm/config.rs
//!
//! Provider configuration, resolved fresh on every request.
//!
//! Precedence: environment, then `<config_dir>/testforge/config.toml`, then
//! provider defaults. Credentials only ever come from the environment.

use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::Result;
use crate::llm::client::{Provider, ProviderConfig};

pub const PROVIDER_VAR: &str = "AI_PROVIDER";
pub const MODEL_VAR: &str = "AI_MODEL";
pub const TEMPERATURE_VAR: &str = "AI_TEMPERATURE";
pub const MAX_TOKENS_VAR: &str = "AI_MAX_TOKENS";
pub const BASE_URL_VAR: &str = "AI_BASE_URL";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    ai: Option<AiDefaults>,
}

/// Defaults from the `[ai]` table of the config file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AiDefaults {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_tokens: Option<u32>,
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Reads the process environment and the optional config file.
    pub fn from_env() -> Result<Self> {
        Self::resolve(|key| std::env::var(key).ok(), &load_defaults())
    }

    /// Resolves a config from `lookup` (an environment view) over `defaults`.
    ///
    /// Blank variables count as unset. Unparsable numbers fall back to the
    /// next source with a warning. An unknown provider name is an error.
    pub fn resolve(lookup: impl Fn(&str) -> Option<String>, defaults: &AiDefaults) -> Result<Self> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = match var(PROVIDER_VAR).or_else(|| defaults.provider.clone()) {
            Some(name) => Provider::from_str(&name)?,
            None => Provider::OpenAI,
        };

        let mut cfg = ProviderConfig::new(provider);
        cfg.api_key = var(&provider.key_var());

        if let Some(model) = var(MODEL_VAR).or_else(|| defaults.model.clone()) {
            cfg.model = model;
        }

        if let Some(t) = parsed(var(TEMPERATURE_VAR), TEMPERATURE_VAR).or(defaults.temperature) {
            cfg.temperature = t;
        }

        if let Some(n) = parsed(var(MAX_TOKENS_VAR), MAX_TOKENS_VAR).or(defaults.max_tokens) {
            cfg.max_tokens = n;
        }

        cfg.base_url = var(BASE_URL_VAR).or_else(|| defaults.base_url.clone());

        Ok(cfg)
    }
}

fn parsed<T: FromStr>(raw: Option<String>, key: &str) -> Option<T> {
    let raw = raw?;
    match raw.parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("ignoring {key}={raw:?}: not a valid number");
            None
        }
    }
}

/* ============================================================
   Config file
   ============================================================ */

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("testforge/config.toml")
}

/// Missing or malformed files yield empty defaults.
pub fn load_defaults() -> AiDefaults {
    let Ok(raw) = fs::read_to_string(config_path()) else {
        return AiDefaults::default();
    };

    parse_defaults(&raw)
}

fn parse_defaults(raw: &str) -> AiDefaults {
    match toml::from_str::<ConfigFile>(raw) {
        Ok(file) => file.ai.unwrap_or_default(),
        Err(e) => {
            log::warn!("ignoring malformed {}: {e}", config_path().display());
            AiDefaults::default()
        }
    }
}
