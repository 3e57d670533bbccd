//! Client factory: provider selection and one-time config defaulting.
//!
//! Defaults for model/max-tokens/temperature are substituted exactly once
//! here, producing an immutable [`ResolvedConfig`]; adapters never re-check
//! zero values at call time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::debug;

use crate::error::Error;
use crate::provider::claude::{self, ClaudeAdapter};
use crate::provider::openai::{self, OpenAiAdapter};
use crate::provider::transport::HttpTransport;
use crate::provider::ProviderAdapter;

pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Claude,
    OpenAi,
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "claude" => Ok(Self::Claude),
            "openai" => Ok(Self::OpenAi),
            other => Err(Error::UnsupportedProvider(other.to_string())),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Claude => "claude",
            Self::OpenAi => "openai",
        })
    }
}

/// Caller-facing configuration, as handed over by an external loader.
///
/// Zero values (empty model, 0 max tokens, 0.0 temperature) mean "use the
/// provider default".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    /// Provider identifier: "claude" or "openai".
    pub provider: String,
    pub api_key: String,
    /// Base URL override; trailing slashes are trimmed.
    pub base_url: Option<String>,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Configuration after defaulting, held immutably by an adapter.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub provider: ProviderKind,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl ResolvedConfig {
    /// Apply provider defaults to every unset field.
    pub fn resolve(provider: ProviderKind, config: &ClientConfig) -> Self {
        let (default_base, default_model) = match provider {
            ProviderKind::Claude => (claude::DEFAULT_BASE_URL, claude::DEFAULT_MODEL),
            ProviderKind::OpenAi => (openai::DEFAULT_BASE_URL, openai::DEFAULT_MODEL),
        };

        let base_url = config
            .base_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .unwrap_or(default_base)
            .trim_end_matches('/')
            .to_string();

        Self {
            provider,
            api_key: config.api_key.clone(),
            base_url,
            model: if config.model.is_empty() {
                default_model.to_string()
            } else {
                config.model.clone()
            },
            max_tokens: if config.max_tokens == 0 {
                DEFAULT_MAX_TOKENS
            } else {
                config.max_tokens
            },
            temperature: if config.temperature == 0.0 {
                DEFAULT_TEMPERATURE
            } else {
                config.temperature
            },
        }
    }
}

/// Construct the adapter for `config.provider`.
///
/// Fails with a configuration error when the API key is empty and an
/// unsupported-provider error when the identifier is unknown.
pub fn create_client(
    config: &ClientConfig,
    transport: Arc<dyn HttpTransport>,
) -> Result<Box<dyn ProviderAdapter>, Error> {
    if config.api_key.is_empty() {
        return Err(Error::Configuration("API key must not be empty".into()));
    }
    let provider: ProviderKind = config.provider.parse()?;
    let resolved = ResolvedConfig::resolve(provider, config);

    debug!(
        provider = %provider,
        model = %resolved.model,
        base_url = %resolved.base_url,
        "Creating LLM client"
    );

    Ok(match provider {
        ProviderKind::Claude => Box::new(ClaudeAdapter::new(resolved, transport)),
        ProviderKind::OpenAi => Box::new(OpenAiAdapter::new(resolved, transport)),
    })
}
