//! Claude-style backend (Anthropic Messages API).
//!
//! POST `{base}/v1/messages` with `x-api-key` and `anthropic-version`
//! headers; the response carries an ordered list of content blocks plus a
//! `stop_reason`.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::transport::HttpTransport;
use super::{ProviderAdapter, WireRequest};
use crate::client::ResolvedConfig;
use crate::error::Error;
use crate::types::{ContentBlock, Usage, WireResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
const API_VERSION: &str = "2023-06-01";

/// Adapter for the Anthropic Messages endpoint.
pub struct ClaudeAdapter {
    config: ResolvedConfig,
    transport: Arc<dyn HttpTransport>,
}

impl ClaudeAdapter {
    pub fn new(config: ResolvedConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlockWire>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: UsageWire,
}

#[derive(Deserialize)]
struct ContentBlockWire {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
struct UsageWire {
    #[serde(default)]
    input_tokens: u32,
    #[serde(default)]
    output_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl ProviderAdapter for ClaudeAdapter {
    fn name(&self) -> &'static str {
        "claude"
    }

    fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    fn transport(&self) -> &dyn HttpTransport {
        self.transport.as_ref()
    }

    fn build_wire_request(&self, prompt: &str, max_tokens: u32) -> Result<WireRequest, Error> {
        let body = MessagesRequest {
            model: &self.config.model,
            max_tokens,
            temperature: self.config.temperature,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };
        let body = serde_json::to_string(&body)
            .map_err(|e| Error::Parse(format!("failed to serialize request: {e}")))?;

        Ok(WireRequest {
            method: "POST",
            url: format!("{}/v1/messages", self.config.base_url),
            headers: vec![
                ("x-api-key".into(), self.config.api_key.clone()),
                ("anthropic-version".into(), API_VERSION.into()),
                ("Content-Type".into(), "application/json".into()),
            ],
            body,
        })
    }

    fn parse_wire_response(&self, body: &str) -> Result<WireResponse, Error> {
        let parsed: MessagesResponse = serde_json::from_str(body)
            .map_err(|e| Error::Parse(format!("invalid messages response: {e}")))?;

        Ok(WireResponse {
            content: parsed
                .content
                .into_iter()
                .map(|b| ContentBlock {
                    kind: b.kind,
                    text: b.text,
                })
                .collect(),
            stop_reason: parsed.stop_reason.unwrap_or_default(),
            model: parsed.model,
            usage: Usage {
                input_tokens: parsed.usage.input_tokens,
                output_tokens: parsed.usage.output_tokens,
            },
        })
    }

    fn parse_error_message(&self, body: &str) -> Option<String> {
        serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|e| e.error.message)
    }
}
