//! Answer Extraction
//!
//! Pulls the generated text out of a successful response body and cleans
//! the formatting noise models commonly wrap around JSON:
//! - Markdown code fence wrapping (```json ... ```)
//! - Byte order marks and surrounding whitespace

use serde_json::Value;
use tracing::debug;

use crate::ai::provider::ContentResponse;

/// Text carried by a successful response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedAnswer {
    /// First candidate part of a generation envelope
    Candidate(String),
    /// Body was not a generation envelope; taken verbatim
    Raw(String),
    /// Envelope without any candidate text (e.g. blocked prompt)
    Empty,
}

/// Extract the answer text from a successful response body
///
/// A body counts as a generation envelope when it is a JSON object carrying
/// `candidates` or `promptFeedback`. Anything else is the answer itself.
pub fn extract_answer(body: &str) -> ExtractedAnswer {
    let envelope = serde_json::from_str::<Value>(body)
        .ok()
        .filter(|value| {
            value
                .as_object()
                .is_some_and(|obj| obj.contains_key("candidates") || obj.contains_key("promptFeedback"))
        });

    let Some(value) = envelope else {
        if body.trim().is_empty() {
            return ExtractedAnswer::Empty;
        }
        debug!("Response body is not a generation envelope, using it verbatim");
        return ExtractedAnswer::Raw(body.to_string());
    };

    match serde_json::from_value::<ContentResponse>(value) {
        Ok(envelope) => match envelope.first_text() {
            Some(text) if !text.trim().is_empty() => {
                if let Some(usage) = &envelope.usage_metadata {
                    debug!(
                        input_tokens = usage.prompt_token_count,
                        output_tokens = usage.candidates_token_count,
                        total_tokens = usage.total_token_count,
                        "Generation token usage"
                    );
                }
                ExtractedAnswer::Candidate(text.to_string())
            }
            _ => {
                debug!(
                    block_reason = ?envelope.block_reason(),
                    "Generation envelope carried no candidate text"
                );
                ExtractedAnswer::Empty
            }
        },
        Err(e) => {
            debug!(error = %e, "Envelope-like body did not decode, using it verbatim");
            ExtractedAnswer::Raw(body.to_string())
        }
    }
}

/// Strip markdown code fences and a leading BOM
pub fn strip_code_fences(text: &str) -> &str {
    let mut s = text.trim().trim_start_matches('\u{feff}').trim();

    if s.starts_with("```") {
        s = match s.find('\n') {
            Some(first_newline) => &s[first_newline + 1..],
            None => s.trim_start_matches('`'),
        };
    }

    if let Some(stripped) = s.trim_end().strip_suffix("```") {
        s = stripped;
    }

    s.trim()
}
