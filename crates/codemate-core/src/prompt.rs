//! Deterministic prompt assembly for completion and generation requests.
//!
//! Sections appear in a fixed order and only when their guard condition
//! holds. The section labels and the cursor marker are shared constants:
//! downstream extraction and tests key off the literal text.

use crate::error::Error;
use crate::types::{CodeContext, CompletionRequest, GenerationRequest};

/// Marker spliced into the source at the cursor offset.
pub const CURSOR_MARKER: &str = "<CURSOR>";
pub const CURRENT_FUNCTION_LABEL: &str = "Current function:";
pub const IMPORTS_LABEL: &str = "Imports:";
pub const PROJECT_TYPE_LABEL: &str = "Project type:";
pub const CODE_STYLE_LABEL: &str = "Code style:";
pub const GENERATE_HEADER: &str = "Generate code for:";

/// Build the instruction prompt for a completion request.
///
/// The source is spliced as `source[..cursor] + "<CURSOR>" + source[cursor..]`,
/// so the cursor must lie within the source and on a character boundary;
/// violations are a caller contract error, checked before any network call.
pub fn build_completion_prompt(request: &CompletionRequest) -> Result<String, Error> {
    let source = &request.source;
    let cursor = request.cursor;
    if cursor > source.len() || !source.is_char_boundary(cursor) {
        return Err(Error::CursorOutOfRange {
            cursor,
            len: source.len(),
        });
    }

    let mut prompt = format!(
        "You are an expert {} programmer. Complete the code at the cursor marker. \
         Return only code, no explanations or prose.\n",
        request.language
    );
    push_context(&mut prompt, &request.context);

    prompt.push_str("\nCode:\n");
    prompt.push_str(&source[..cursor]);
    prompt.push_str(CURSOR_MARKER);
    prompt.push_str(&source[cursor..]);
    prompt.push_str("\n\nComplete the code at the marker position.");

    Ok(prompt)
}

/// Build the instruction prompt for a generation request.
pub fn build_generation_prompt(request: &GenerationRequest) -> String {
    let mut prompt = format!(
        "You are an expert {} programmer. Generate the requested code. \
         Return only code, no explanations or prose.\n",
        request.language
    );
    push_context(&mut prompt, &request.context);

    prompt.push('\n');
    prompt.push_str(GENERATE_HEADER);
    prompt.push('\n');
    prompt.push_str(&request.prompt);
    prompt
}

/// Append the guarded context sections, in their fixed order.
fn push_context(prompt: &mut String, context: &CodeContext) {
    if let Some(function) = context
        .current_function
        .as_deref()
        .filter(|f| !f.is_empty())
    {
        prompt.push_str(&format!("{CURRENT_FUNCTION_LABEL} {function}\n"));
    }
    if !context.imports.is_empty() {
        prompt.push_str(IMPORTS_LABEL);
        prompt.push('\n');
        for import in &context.imports {
            prompt.push_str(&format!("- {import}\n"));
        }
    }
    if let Some(project) = context.project_type.as_deref().filter(|p| !p.is_empty()) {
        prompt.push_str(&format!("{PROJECT_TYPE_LABEL} {project}\n"));
    }
    if let Some(style) = &context.style {
        prompt.push_str(&format!(
            "{CODE_STYLE_LABEL} indentation={}, naming={}, linting={}, typed={}\n",
            style.indentation, style.naming_convention, style.uses_linting, style.uses_type_system
        ));
    }
}
