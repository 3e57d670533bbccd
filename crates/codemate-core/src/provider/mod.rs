//! Provider adapter trait and its backend implementations.
//!
//! Each backend implements the wire-level pieces (request serialization,
//! response parsing, error-body parsing); the call flow, status
//! classification, and high-level completion/generation operations are
//! shared provided methods. Adapters hold no per-call state, so one instance
//! is safe to use from concurrent calls.

pub mod claude;
pub mod openai;
pub mod transport;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::ResolvedConfig;
use crate::error::{ApiErrorKind, Error};
use crate::normalize::{calculate_confidence, extract_code, extract_suggestions};
use crate::prompt::{build_completion_prompt, build_generation_prompt};
use crate::template;
use crate::types::{
    CompletionRequest, CompletionResponse, GenerationRequest, GenerationResponse, WireResponse,
};
use transport::{HttpResponse, HttpTransport};

/// A fully serialized provider call, ready for the transport.
#[derive(Debug, Clone)]
pub struct WireRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl std::fmt::Debug for dyn ProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderAdapter")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

/// A provider backend.
///
/// Exactly one HTTP attempt is made per call; retry and backoff are the
/// caller's business. Cancellation is cooperative: the supplied token is
/// raced against the transport and a fired token surfaces as a transport
/// failure.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Short backend name for logging.
    fn name(&self) -> &'static str;

    /// The resolved (fully defaulted) configuration this adapter was built with.
    fn config(&self) -> &ResolvedConfig;

    fn transport(&self) -> &dyn HttpTransport;

    /// Serialize a prompt into this backend's wire request.
    fn build_wire_request(&self, prompt: &str, max_tokens: u32) -> Result<WireRequest, Error>;

    /// Parse a success body (status < 400) into the uniform wire response.
    /// Failure here is an [`Error::Parse`], distinct from an API error.
    fn parse_wire_response(&self, body: &str) -> Result<WireResponse, Error>;

    /// Pull a structured message out of an error body, if one is present.
    fn parse_error_message(&self, body: &str) -> Option<String>;

    /// Issue one call and classify the outcome.
    async fn send(
        &self,
        cancel: &CancellationToken,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<WireResponse, Error> {
        let request = self.build_wire_request(prompt, max_tokens)?;
        debug!(
            provider = self.name(),
            model = %self.config().model,
            prompt_len = prompt.len(),
            "Sending provider request"
        );

        let response = execute_cancellable(self.transport(), cancel, &request).await?;
        if response.status >= 400 {
            return Err(self.classify_error(&response));
        }

        self.parse_wire_response(&response.body)
    }

    /// Issue a minimal low-token test call and interpret only the status code.
    async fn validate_credentials(&self, cancel: &CancellationToken) -> Result<(), Error> {
        let request = self.build_wire_request("Hi", 1)?;
        let response = execute_cancellable(self.transport(), cancel, &request).await?;

        match response.status {
            401 => Err(Error::Api {
                status: 401,
                kind: ApiErrorKind::Auth,
                message: "invalid API key".into(),
            }),
            403 => Err(Error::Api {
                status: 403,
                kind: ApiErrorKind::Auth,
                message: "insufficient permissions".into(),
            }),
            status if status >= 400 => Err(Error::Api {
                status,
                kind: ApiErrorKind::from_status(status),
                message: format!("credential check failed with status {status}"),
            }),
            _ => Ok(()),
        }
    }

    /// Substitute a caller-supplied template and send it, returning the raw
    /// response body.
    async fn raw_prompt(
        &self,
        cancel: &CancellationToken,
        template_text: &str,
        vars_json: &str,
    ) -> Result<String, Error> {
        let prompt = template::substitute(template_text, vars_json)?;
        let request = self.build_wire_request(&prompt, self.config().max_tokens)?;
        let response = execute_cancellable(self.transport(), cancel, &request).await?;
        if response.status >= 400 {
            return Err(self.classify_error(&response));
        }
        Ok(response.body)
    }

    /// Complete code at a cursor position.
    ///
    /// Provider-side failures are absorbed into the response's error field;
    /// template/configuration/cursor errors propagate as `Err`.
    async fn complete(
        &self,
        cancel: &CancellationToken,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, Error> {
        let prompt = build_completion_prompt(request)?;
        match self.send(cancel, &prompt, self.config().max_tokens).await {
            Ok(wire) => Ok(CompletionResponse {
                suggestions: extract_suggestions(&wire),
                confidence: calculate_confidence(&wire),
                error: None,
            }),
            Err(e) if e.is_provider_failure() => {
                warn!(provider = self.name(), error = %e, "Completion call failed");
                Ok(CompletionResponse::failed(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Generate code from a natural-language description.
    ///
    /// Same error-absorption policy as [`ProviderAdapter::complete`].
    async fn generate(
        &self,
        cancel: &CancellationToken,
        request: &GenerationRequest,
    ) -> Result<GenerationResponse, Error> {
        let prompt = build_generation_prompt(request);
        match self.send(cancel, &prompt, self.config().max_tokens).await {
            Ok(wire) => Ok(GenerationResponse {
                code: extract_code(&wire),
                confidence: calculate_confidence(&wire),
                error: None,
            }),
            Err(e) if e.is_provider_failure() => {
                warn!(provider = self.name(), error = %e, "Generation call failed");
                Ok(GenerationResponse::failed(e.to_string()))
            }
            Err(e) => Err(e),
        }
    }

    /// Turn an HTTP ≥ 400 exchange into an [`Error::Api`], preferring the
    /// provider's structured message over the bare status code.
    fn classify_error(&self, response: &HttpResponse) -> Error {
        let message = self
            .parse_error_message(&response.body)
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        Error::Api {
            status: response.status,
            kind: ApiErrorKind::from_status(response.status),
            message,
        }
    }
}

/// Race the transport call against the cancellation token.
async fn execute_cancellable(
    transport: &dyn HttpTransport,
    cancel: &CancellationToken,
    request: &WireRequest,
) -> Result<HttpResponse, Error> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(Error::Transport("request cancelled".into())),
        result = transport.execute(
            request.method,
            &request.url,
            &request.headers,
            Some(request.body.clone()),
        ) => result,
    }
}
