//! Normalization of provider responses into suggestions, code, and a
//! confidence score.
//!
//! Pure functions of [`WireResponse`]; only the first content block is
//! treated as primary output.

use crate::types::WireResponse;

/// Fence language tags that are dropped when they follow an opening fence.
const LANGUAGE_TAGS: &[&str] = &[
    "typescript", "javascript", "python", "go", "rust", "java", "c", "cpp", "csharp", "ruby",
    "php", "swift", "kotlin", "ts", "js", "py", "rs",
];

/// Split the primary output into trimmed, non-empty suggestion lines.
///
/// Never returns nothing for non-empty input: if every line trims away but
/// the original text was non-empty, the whole text comes back as a single
/// suggestion.
pub fn extract_suggestions(response: &WireResponse) -> Vec<String> {
    let Some(text) = response.primary_text() else {
        return Vec::new();
    };

    let suggestions: Vec<String> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect();

    if suggestions.is_empty() && !text.is_empty() {
        return vec![text.to_string()];
    }
    suggestions
}

/// Strip code-fence markup from the primary output.
///
/// A leading ``` fence is removed; if the text right after it is a recognized
/// language tag, that tag line goes too. A trailing ``` fence is removed.
/// Unfenced text passes through trimmed.
pub fn extract_code(response: &WireResponse) -> String {
    let Some(text) = response.primary_text() else {
        return String::new();
    };

    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```") {
        body = match rest.split_once('\n') {
            Some((first, tail))
                if first.trim().is_empty() || LANGUAGE_TAGS.contains(&first.trim()) =>
            {
                tail
            }
            _ => rest,
        };
    }
    let body = body.trim_end().strip_suffix("```").unwrap_or(body);
    body.trim().to_string()
}

/// Heuristic quality estimate in [0.0, 1.0] from response metadata.
///
/// Base 0.7, adjusted by the stop reason, plus a bump for substantial output.
/// Unrecognized stop reasons leave the base unchanged. Not a calibrated
/// probability.
pub fn calculate_confidence(response: &WireResponse) -> f32 {
    let mut score: f32 = 0.7;

    score += match response.stop_reason.as_str() {
        // Natural completion (Claude-style / OpenAI-style names).
        "end_turn" | "stop" => 0.2,
        // Truncated by the output-token budget.
        "max_tokens" | "length" => -0.1,
        "stop_sequence" => 0.1,
        _ => 0.0,
    };

    if response.primary_text().is_some_and(|t| t.len() > 50) {
        score += 0.1;
    }

    score.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ContentBlock;

    fn text_response(text: &str, stop_reason: &str) -> WireResponse {
        WireResponse {
            content: vec![ContentBlock {
                kind: "text".into(),
                text: text.into(),
            }],
            stop_reason: stop_reason.into(),
            ..Default::default()
        }
    }

    #[test]
    fn suggestions_split_trim_and_drop_blanks() {
        let resp = text_response("console.log('World');\nreturn true;", "end_turn");
        assert_eq!(
            extract_suggestions(&resp),
            vec!["console.log('World');", "return true;"]
        );

        let resp = text_response("  first  \n\n   \n  second  ", "end_turn");
        assert_eq!(extract_suggestions(&resp), vec!["first", "second"]);
    }

    #[test]
    fn no_content_means_no_suggestions() {
        assert!(extract_suggestions(&WireResponse::default()).is_empty());
    }

    #[test]
    fn whitespace_only_lines_fall_back_to_whole_text() {
        // Non-empty input must never normalize to nothing.
        let resp = text_response("   \n  \n", "end_turn");
        assert_eq!(extract_suggestions(&resp), vec!["   \n  \n"]);
    }

    #[test]
    fn only_first_block_is_primary() {
        let resp = WireResponse {
            content: vec![
                ContentBlock {
                    kind: "text".into(),
                    text: "one".into(),
                },
                ContentBlock {
                    kind: "text".into(),
                    text: "two".into(),
                },
            ],
            ..Default::default()
        };
        assert_eq!(extract_suggestions(&resp), vec!["one"]);
    }

    #[test]
    fn code_fence_with_language_tag_is_stripped() {
        let resp = text_response(
            "```typescript\nfunction add(a: number, b: number): number { return a + b; }\n```",
            "end_turn",
        );
        assert_eq!(
            extract_code(&resp),
            "function add(a: number, b: number): number { return a + b; }"
        );
    }

    #[test]
    fn bare_fence_is_stripped() {
        let resp = text_response("```\nlet x = 1;\n```", "end_turn");
        assert_eq!(extract_code(&resp), "let x = 1;");
    }

    #[test]
    fn unrecognized_tag_line_is_kept() {
        let resp = text_response("```brainfuck\n+++\n```", "end_turn");
        assert_eq!(extract_code(&resp), "brainfuck\n+++");
    }

    #[test]
    fn unfenced_text_passes_through_trimmed() {
        let resp = text_response("  const a = 1;  ", "end_turn");
        assert_eq!(extract_code(&resp), "const a = 1;");
        assert_eq!(extract_code(&WireResponse::default()), "");
    }

    #[test]
    fn confidence_rewards_natural_stop_and_length() {
        let long = "x".repeat(60);
        let score = calculate_confidence(&text_response(&long, "end_turn"));
        assert!((0.8..=1.0).contains(&score), "score={score}");

        // OpenAI-style name for the same outcome.
        let score = calculate_confidence(&text_response(&long, "stop"));
        assert!((0.8..=1.0).contains(&score));
    }

    #[test]
    fn confidence_penalizes_truncation() {
        let score = calculate_confidence(&text_response("short", "max_tokens"));
        assert!((0.5..=0.7).contains(&score), "score={score}");

        let score = calculate_confidence(&text_response("short", "length"));
        assert!((0.5..=0.7).contains(&score));
    }

    #[test]
    fn confidence_unrecognized_reason_keeps_base() {
        let score = calculate_confidence(&text_response("short", "tool_use"));
        assert!((score - 0.7).abs() < 1e-6);
    }

    #[test]
    fn confidence_stop_sequence_bonus() {
        let score = calculate_confidence(&text_response("short", "stop_sequence"));
        assert!((score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn confidence_is_clamped() {
        let long = "x".repeat(200);
        let score = calculate_confidence(&text_response(&long, "end_turn"));
        assert!(score <= 1.0);
        assert!(calculate_confidence(&WireResponse::default()) >= 0.0);
    }
}
