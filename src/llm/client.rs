// src/llm/client.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};
use url::Url;

use crate::error::{Error, Result};

const PROMPT_ABI_VERSION: &str = "v1-testgen-cases-json";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAI,
    Anthropic,
    Gemini,
    Local,
}

/// Static catalog entry for a provider.
#[derive(Debug, Clone, Copy)]
pub struct ProviderInfo {
    pub name: &'static str,
    pub models: &'static [&'static str],
    pub endpoint: &'static str,
}

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::OpenAI,
        Provider::Anthropic,
        Provider::Gemini,
        Provider::Local,
    ];

    pub fn info(&self) -> ProviderInfo {
        match self {
            Provider::OpenAI => ProviderInfo {
                name: "OpenAI GPT-4",
                models: &["gpt-4", "gpt-4-turbo", "gpt-3.5-turbo"],
                endpoint: "https://api.openai.com/v1/chat/completions",
            },
            Provider::Anthropic => ProviderInfo {
                name: "Anthropic Claude",
                models: &[
                    "claude-3-opus-20240229",
                    "claude-3-sonnet-20240229",
                    "claude-3-haiku-20240307",
                ],
                endpoint: "https://api.anthropic.com/v1/messages",
            },
            Provider::Gemini => ProviderInfo {
                name: "Google Gemini",
                models: &["gemini-pro", "gemini-pro-vision"],
                endpoint: "https://generativelanguage.googleapis.com/v1beta/models",
            },
            Provider::Local => ProviderInfo {
                name: "Local AI Model",
                models: &["llama2", "mistral", "codellama"],
                endpoint: "http://localhost:11434/api/generate",
            },
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Provider::OpenAI => "gpt-4",
            Provider::Anthropic => "claude-3-sonnet-20240229",
            Provider::Gemini => "gemini-pro",
            Provider::Local => "llama2",
        }
    }

    /// Environment variable holding this provider's credential.
    pub fn key_var(&self) -> String {
        format!("{}_API_KEY", self.to_string().to_uppercase())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Provider::OpenAI => "openai",
            Provider::Anthropic => "anthropic",
            Provider::Gemini => "gemini",
            Provider::Local => "local",
        };
        f.write_str(s)
    }
}

impl FromStr for Provider {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAI),
            "anthropic" => Ok(Provider::Anthropic),
            "gemini" => Ok(Provider::Gemini),
            "local" => Ok(Provider::Local),
            other => Err(Error::UnknownProvider(other.to_string())),
        }
    }
}

/// Per-request provider settings. Never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,

    /// Endpoint override. For gemini this replaces the models root.
    pub base_url: Option<String>,
}

impl ProviderConfig {
    pub fn new(provider: Provider) -> Self {
        Self {
            provider,
            api_key: None,
            model: provider.default_model().to_string(),
            temperature: 0.3,
            max_tokens: 2000,
            base_url: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Drops the credential, forcing heuristic-only synthesis.
    pub fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    /// The credential, if present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    fn endpoint(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(self.provider.info().endpoint)
    }
}

/// A fully-built provider call, ready for a transport.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub url: Url,
    pub headers: Vec<(&'static str, String)>,
    pub body: Value,
}

/* ============================================================
   Request / response adapters
   ============================================================ */

pub fn build_request(cfg: &ProviderConfig, api_key: &str, prompt: &str) -> Result<LlmRequest> {
    let endpoint = cfg.endpoint().trim_end_matches('/');

    match cfg.provider {
        Provider::OpenAI => Ok(LlmRequest {
            url: parse_endpoint(endpoint)?,
            headers: vec![("Authorization", format!("Bearer {}", api_key))],
            body: json!({
                "model": cfg.model,
                "messages": [{ "role": "user", "content": prompt }],
                "temperature": cfg.temperature,
                "max_tokens": cfg.max_tokens,
            }),
        }),

        Provider::Anthropic => Ok(LlmRequest {
            url: parse_endpoint(endpoint)?,
            headers: vec![
                ("x-api-key", api_key.to_string()),
                ("anthropic-version", ANTHROPIC_VERSION.into()),
            ],
            body: json!({
                "model": cfg.model,
                "max_tokens": cfg.max_tokens,
                "messages": [{ "role": "user", "content": prompt }],
            }),
        }),

        Provider::Gemini => {
            let raw = format!("{}/{}:generateContent", endpoint, cfg.model);
            let url = Url::parse_with_params(&raw, &[("key", api_key)])
                .map_err(|e| Error::ProviderUnavailable(format!("invalid endpoint: {e}")))?;

            Ok(LlmRequest {
                url,
                headers: Vec::new(),
                body: json!({
                    "contents": [{ "parts": [{ "text": prompt }] }],
                    "generationConfig": {
                        "temperature": cfg.temperature,
                        "maxOutputTokens": cfg.max_tokens,
                    },
                }),
            })
        }

        Provider::Local => Ok(LlmRequest {
            url: parse_endpoint(endpoint)?,
            headers: Vec::new(),
            body: json!({
                "model": cfg.model,
                "prompt": prompt,
                "stream": false,
                "options": { "temperature": cfg.temperature },
            }),
        }),
    }
}

/// Pulls the generated text out of a decoded provider response.
pub fn extract_text(provider: Provider, v: &Value) -> Result<String> {
    let pointer = match provider {
        Provider::OpenAI => "/choices/0/message/content",
        Provider::Anthropic => "/content/0/text",
        Provider::Gemini => "/candidates/0/content/parts/0/text",
        Provider::Local => "/response",
    };

    v.pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| Error::InvalidResponse(format!("{provider} response has no {pointer}")))
}

/// Short stable digest of a prompt, for log correlation.
pub fn prompt_hash(prompt: &str) -> String {
    let mut h = Sha256::new();
    h.update(PROMPT_ABI_VERSION.as_bytes());
    h.update(prompt.as_bytes());
    let mut digest = hex::encode(h.finalize());
    digest.truncate(12);
    digest
}

fn parse_endpoint(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::ProviderUnavailable(format!("invalid endpoint {raw}: {e}")))
}
