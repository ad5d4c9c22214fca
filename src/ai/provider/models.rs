//! Generation endpoint wire models
//!
//! Field names follow the endpoint's camelCase JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ai::request::{GenerationRequest, Role, Turn};
use crate::constants::gemini::JSON_MIME_TYPE;

/// `generateContent` request body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub system_instruction: SystemInstruction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Build the outbound payload: history, then the latest user turn, plus
    /// the response schema when the request carries a contract
    pub fn from_request(request: &GenerationRequest) -> Self {
        let contents = request
            .history()
            .iter()
            .map(Content::from)
            .chain(std::iter::once(Content::new(
                Role::User,
                request.latest_user_text(),
            )))
            .collect();

        let generation_config = request.contract().map(|contract| GenerationConfig {
            response_mime_type: JSON_MIME_TYPE.to_string(),
            response_schema: contract.to_schema(),
        });

        Self {
            contents,
            system_instruction: SystemInstruction {
                parts: vec![Part::new(request.system_instruction())],
            },
            generation_config,
        }
    }
}

/// One conversation entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Content {
    pub role: Role,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part::new(text)],
        }
    }
}

impl From<&Turn> for Content {
    fn from(turn: &Turn) -> Self {
        Content::new(turn.role, turn.text.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    pub text: String,
}

impl Part {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemInstruction {
    pub parts: Vec<Part>,
}

/// Output constraints sent when a contract is requested
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
}

/// `generateContent` response body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

impl ContentResponse {
    /// Text of the first part of the first candidate
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
    #[serde(default)]
    pub total_token_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::contract::ResponseContract;
    use serde_json::json;

    #[test]
    fn test_payload_without_contract() {
        let request = GenerationRequest::builder("Summarize venues.")
            .user_text("Summary for: Nook")
            .build()
            .unwrap();

        let payload = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        assert_eq!(
            payload,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "Summary for: Nook"}]}],
                "systemInstruction": {"parts": [{"text": "Summarize venues."}]}
            })
        );
    }

    #[test]
    fn test_payload_with_history_and_contract() {
        let request = GenerationRequest::builder("Recommend venues.")
            .history([Turn::model("Hi!"), Turn::user("Bars?"), Turn::model("Nook.")])
            .user_text("Quieter?")
            .contract(ResponseContract::with_text_field("text").list_field("mentionedIds"))
            .build()
            .unwrap();

        let payload = serde_json::to_value(GenerateContentRequest::from_request(&request)).unwrap();

        let contents = payload["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 4);
        assert_eq!(contents[0]["role"], "model");
        assert_eq!(contents[1]["parts"][0]["text"], "Bars?");
        assert_eq!(contents[3], json!({"role": "user", "parts": [{"text": "Quieter?"}]}));

        let config = &payload["generationConfig"];
        assert_eq!(config["responseMimeType"], "application/json");
        assert_eq!(
            config["responseSchema"]["propertyOrdering"],
            json!(["text", "mentionedIds"])
        );
    }

    #[test]
    fn test_response_first_text() {
        let response: ContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "hello"}]}, "finishReason": "STOP"}]
        }))
        .unwrap();
        assert_eq!(response.first_text(), Some("hello"));
        assert_eq!(response.candidates[0].finish_reason.as_deref(), Some("STOP"));

        let empty: ContentResponse = serde_json::from_value(json!({"candidates": []})).unwrap();
        assert_eq!(empty.first_text(), None);
    }
}
