//! Error taxonomy for the client library.
//!
//! High-level `complete`/`generate` calls absorb provider-side failures
//! (`Transport`, `Api`, `Parse`) into the response's error field so UI callers
//! always get a renderable response. Programmer errors (`Configuration`,
//! `Template`, `CursorOutOfRange`) propagate as `Err`.

use thiserror::Error;

/// Subkind of an API error, derived from the HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 401 or 403 — bad or under-privileged credentials.
    Auth,
    /// 429 — provider rate limit hit.
    RateLimit,
    /// 404 — unknown model or endpoint.
    NotFound,
    /// Anything else ≥ 400.
    Generic,
}

impl ApiErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Auth,
            429 => Self::RateLimit,
            404 => Self::NotFound,
            _ => Self::Generic,
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid client configuration.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Provider identifier that maps to no known backend.
    #[error("unsupported provider: {0}")]
    UnsupportedProvider(String),

    /// Malformed variable JSON, non-object/non-null variable JSON,
    /// or an empty template.
    #[error("template error: {0}")]
    Template(String),

    /// Completion cursor outside the source text or not on a character
    /// boundary. Caller contract violation.
    #[error("cursor offset {cursor} out of range for source of length {len}")]
    CursorOutOfRange { cursor: usize, len: usize },

    /// No HTTP response obtained (network failure, cancellation, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// HTTP ≥ 400 from the provider, with the parsed or raw message.
    #[error("API error ({status}): {message}")]
    Api {
        status: u16,
        kind: ApiErrorKind,
        message: String,
    },

    /// Response body that is not valid JSON for the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl Error {
    /// Whether this error came from the provider side of a call.
    ///
    /// Provider failures are absorbed into high-level responses; everything
    /// else is a programmer error and propagates.
    pub fn is_provider_failure(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Api { .. } | Self::Parse(_))
    }
}
