//! Venue Assistant
//!
//! Recommendation chat and venue summaries built on the structured
//! generation client.

pub mod chat;
pub mod prompt;
pub mod summary;

pub use chat::{
    ChatAssistant, ChatReply, ChatSession, MENTIONED_IDS_FIELD, TEXT_FIELD,
    recommendation_contract,
};
pub use prompt::{PromptBuilder, PromptTemplates};
pub use summary::{summarize_venue, summary_request};
