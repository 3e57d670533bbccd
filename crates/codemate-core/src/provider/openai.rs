//! OpenAI-style backend (chat-completions API).
//!
//! POST `{base}/v1/chat/completions` with a bearer token. Field names differ
//! from the Claude-style wire (`choices[0].message.content`,
//! `finish_reason`), but the parsed result feeds the same normalization
//! contract.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::transport::HttpTransport;
use super::{ProviderAdapter, WireRequest};
use crate::client::ResolvedConfig;
use crate::error::Error;
use crate::types::{ContentBlock, Usage, WireResponse};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4o";

/// Adapter for the chat-completions endpoint.
pub struct OpenAiAdapter {
    config: ResolvedConfig,
    transport: Arc<dyn HttpTransport>,
}

impl OpenAiAdapter {
    pub fn new(config: ResolvedConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self { config, transport }
    }
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Serialize)]
struct CompletionsRequest<'a> {
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
struct CompletionsResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    model: String,
    #[serde(default)]
    usage: UsageWire,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Default)]
struct UsageWire {
    #[serde(default)]
    prompt_tokens: u32,
    #[serde(default)]
    completion_tokens: u32,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    fn transport(&self) -> &dyn HttpTransport {
        self.transport.as_ref()
    }

    fn build_wire_request(&self, prompt: &str, max_tokens: u32) -> Result<WireRequest, Error> {
        let body = CompletionsRequest {
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
            url: format!("{}/v1/chat/completions", self.config.base_url),
            headers: vec![
                (
                    "Authorization".into(),
                    format!("Bearer {}", self.config.api_key),
                ),
                ("Content-Type".into(), "application/json".into()),
            ],
            body,
        })
    }

    fn parse_wire_response(&self, body: &str) -> Result<WireResponse, Error> {
        let parsed: CompletionsResponse = serde_json::from_str(body)
            .map_err(|e| Error::Parse(format!("invalid completions response: {e}")))?;

        // An empty choices list normalizes to an empty content list rather
        // than an error; extraction handles it downstream.
        let (content, stop_reason) = match parsed.choices.into_iter().next() {
            Some(choice) => (
                vec![ContentBlock {
                    kind: "text".into(),
                    text: choice.message.content.unwrap_or_default(),
                }],
                choice.finish_reason.unwrap_or_default(),
            ),
            None => (Vec::new(), String::new()),
        };

        Ok(WireResponse {
            content,
            stop_reason,
            model: parsed.model,
            usage: Usage {
                input_tokens: parsed.usage.prompt_tokens,
                output_tokens: parsed.usage.completion_tokens,
            },
        })
    }

    fn parse_error_message(&self, body: &str) -> Option<String> {
        serde_json::from_str::<ErrorEnvelope>(body)
            .ok()
            .map(|e| e.error.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ClientConfig, ProviderKind};
    use crate::error::{ApiErrorKind, Error};
    use crate::provider::testing::{CannedTransport, FailingTransport};
    use crate::types::{CodeContext, GenerationRequest};
    use tokio_util::sync::CancellationToken;

    fn adapter(transport: Arc<dyn HttpTransport>) -> OpenAiAdapter {
        let config = ResolvedConfig::resolve(
            ProviderKind::OpenAi,
            &ClientConfig {
                provider: "openai".into(),
                api_key: "sk-test".into(),
                ..Default::default()
            },
        );
        OpenAiAdapter::new(config, transport)
    }

    const SUCCESS_BODY: &str = r#"{
        "id": "chatcmpl-01",
        "object": "chat.completion",
        "model": "gpt-4o",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": "```typescript\nfunction add(a: number, b: number): number { return a + b; }\n```"},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 20, "completion_tokens": 18, "total_tokens": 38}
    }"#;

    #[test]
    fn wire_request_shape() {
        let a = adapter(Arc::new(CannedTransport::new(200, "")));
        let req = a.build_wire_request("generate this", 128).unwrap();

        assert_eq!(req.method, "POST");
        assert_eq!(req.url, "https://api.openai.com/v1/chat/completions");
        assert!(req
            .headers
            .iter()
            .any(|(k, v)| k == "Authorization" && v == "Bearer sk-test"));

        let body: serde_json::Value = serde_json::from_str(&req.body).unwrap();
        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["max_tokens"], 128);
        assert_eq!(body["messages"][0]["content"], "generate this");
    }

    #[tokio::test]
    async fn finish_reason_maps_to_stop_reason() {
        let a = adapter(Arc::new(CannedTransport::new(200, SUCCESS_BODY)));
        let wire = a
            .send(&CancellationToken::new(), "x", 128)
            .await
            .unwrap();

        assert_eq!(wire.stop_reason, "stop");
        assert_eq!(wire.usage.input_tokens, 20);
        assert_eq!(wire.usage.output_tokens, 18);
        assert_eq!(wire.content.len(), 1);
        assert_eq!(wire.content[0].kind, "text");
    }

    #[tokio::test]
    async fn empty_choices_normalize_to_empty_content() {
        let a = adapter(Arc::new(CannedTransport::new(
            200,
            r#"{"choices": [], "model": "gpt-4o"}"#,
        )));
        let wire = a.send(&CancellationToken::new(), "x", 16).await.unwrap();
        assert!(wire.content.is_empty());
        assert!(wire.stop_reason.is_empty());
    }

    #[tokio::test]
    async fn rate_limit_is_classified() {
        let body = r#"{"error": {"message": "Rate limit reached", "type": "tokens", "code": "rate_limit_exceeded"}}"#;
        let a = adapter(Arc::new(CannedTransport::new(429, body)));
        let err = a
            .send(&CancellationToken::new(), "x", 16)
            .await
            .unwrap_err();

        match err {
            Error::Api {
                status,
                kind,
                message,
            } => {
                assert_eq!(status, 429);
                assert_eq!(kind, ApiErrorKind::RateLimit);
                assert_eq!(message, "Rate limit reached");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn generate_strips_fences_from_first_choice() {
        let a = adapter(Arc::new(CannedTransport::new(200, SUCCESS_BODY)));
        let request = GenerationRequest {
            prompt: "an add function".into(),
            language: "typescript".into(),
            context: CodeContext::default(),
        };
        let response = a
            .generate(&CancellationToken::new(), &request)
            .await
            .unwrap();

        assert_eq!(
            response.code,
            "function add(a: number, b: number): number { return a + b; }"
        );
        assert!(response.confidence > 0.7);
        assert!(response.error.is_none());
    }

    #[tokio::test]
    async fn generate_absorbs_api_failure() {
        let a = adapter(Arc::new(CannedTransport::new(503, "busy")));
        let request = GenerationRequest {
            prompt: "anything".into(),
            language: "go".into(),
            context: CodeContext::default(),
        };
        let response = a
            .generate(&CancellationToken::new(), &request)
            .await
            .unwrap();

        assert!(response.code.is_empty());
        assert_eq!(response.confidence, 0.0);
        assert!(response.error.as_deref().unwrap().contains("API error"));
    }

    #[tokio::test]
    async fn generate_absorbs_transport_failure() {
        let a = adapter(Arc::new(FailingTransport));
        let request = GenerationRequest {
            prompt: "anything".into(),
            language: "go".into(),
            context: CodeContext::default(),
        };
        let response = a
            .generate(&CancellationToken::new(), &request)
            .await
            .unwrap();
        assert!(response.error.is_some());
        assert_eq!(response.confidence, 0.0);
    }
}
