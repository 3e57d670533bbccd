//! codemate-core: provider-agnostic LLM client for code completion and
//! generation.
//!
//! Building blocks:
//!
//! - [`template`] — `{{name}}` variable substitution for custom prompts
//! - [`prompt`] — deterministic prompt assembly from structured requests
//! - [`provider`] — the [`provider::ProviderAdapter`] trait plus the
//!   Claude-style and OpenAI-style backends and the HTTP transport seam
//! - [`normalize`] — suggestion/code extraction and confidence scoring
//! - [`client`] — the factory that resolves config and picks a backend
//! - [`config`] — typed configuration loading from JSON
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use codemate_core::client::{create_client, ClientConfig};
//! use codemate_core::provider::transport::ReqwestTransport;
//! use codemate_core::provider::ProviderAdapter;
//! use codemate_core::types::{CodeContext, CompletionRequest};
//!
//! # async fn run() -> Result<(), codemate_core::error::Error> {
//! let config = ClientConfig {
//!     provider: "claude".into(),
//!     api_key: "sk-ant-...".into(),
//!     ..Default::default()
//! };
//! let client = create_client(&config, Arc::new(ReqwestTransport::new()))?;
//!
//! let request = CompletionRequest {
//!     source: "function add(a, b) {\n}".into(),
//!     cursor: 21,
//!     language: "javascript".into(),
//!     context: CodeContext::default(),
//! };
//! let response = client.complete(&CancellationToken::new(), &request).await?;
//! println!("{:?}", response.suggestions);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod normalize;
pub mod prompt;
pub mod provider;
pub mod template;
pub mod types;
