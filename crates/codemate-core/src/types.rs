//! Request, response, and context value types shared across providers.
//!
//! Requests and responses are plain value objects created per call. The
//! [`WireResponse`] is the provider-neutral shape every backend's JSON is
//! normalized into before suggestion/code/confidence extraction.

use serde::{Deserialize, Serialize};

/// Style metadata gathered by an external analyzer.
///
/// Carried through into prompts verbatim when present; never interpreted here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleAnalysis {
    pub indentation: String,
    pub naming_convention: String,
    pub uses_linting: bool,
    pub uses_type_system: bool,
}

/// Project context surrounding the code being completed or generated.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CodeContext {
    pub current_function: Option<String>,
    /// Import lines in their original order.
    pub imports: Vec<String>,
    pub project_type: Option<String>,
    pub style: Option<StyleAnalysis>,
}

/// A request to complete code at a cursor position.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompletionRequest {
    /// Full source text of the file being edited.
    pub source: String,
    /// Byte offset of the cursor into `source`. Must be `<= source.len()`
    /// and fall on a character boundary.
    pub cursor: usize,
    /// Language label, e.g. "typescript".
    pub language: String,
    pub context: CodeContext,
}

/// Ordered completion suggestions plus a heuristic confidence score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompletionResponse {
    /// Best-first suggestion lines. Empty when `error` is set.
    pub suggestions: Vec<String>,
    /// Heuristic quality estimate in [0.0, 1.0]. 0.0 when `error` is set.
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CompletionResponse {
    /// A structurally valid response carrying an absorbed provider failure.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            suggestions: Vec::new(),
            confidence: 0.0,
            error: Some(message.into()),
        }
    }
}

/// A request to generate code from a natural-language description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Free-form description of the code to produce.
    pub prompt: String,
    pub language: String,
    pub context: CodeContext,
}

/// Generated code plus a heuristic confidence score.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationResponse {
    /// Generated code with any fence markup stripped. Empty when `error` is set.
    pub code: String,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GenerationResponse {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            code: String::new(),
            confidence: 0.0,
            error: Some(message.into()),
        }
    }
}

/// One unit of generated output from a provider.
#[derive(Debug, Clone, Default)]
pub struct ContentBlock {
    /// Kind tag as returned by the provider ("text" in practice).
    pub kind: String,
    pub text: String,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Provider response after field-name adaptation, before normalization.
///
/// Content blocks keep the provider's order; only the first block is treated
/// as primary output.
#[derive(Debug, Clone, Default)]
pub struct WireResponse {
    pub content: Vec<ContentBlock>,
    /// Why generation ended: "end_turn"/"stop", "max_tokens"/"length",
    /// "stop_sequence", or empty when the provider reported none.
    pub stop_reason: String,
    pub model: String,
    pub usage: Usage,
}

impl WireResponse {
    /// Text of the first content block, if any.
    pub fn primary_text(&self) -> Option<&str> {
        self.content.first().map(|b| b.text.as_str())
    }
}
