//! Venue Chat
//!
//! Multi-turn recommendation chat over a [`VenueCatalog`]. Every answer is
//! requested under the recommendation contract, and the venue ids the model
//! mentions are resolved against the catalog.

use std::sync::Arc;

use tracing::{debug, instrument};

use super::prompt::PromptTemplates;
use crate::ai::{
    GenerationRequest, GenerationResult, ResponseContract, RetryPolicy, StructuredClient, Turn,
};
use crate::constants::messages;
use crate::types::Result;
use crate::venue::{Venue, VenueCatalog};

/// Field carrying the conversational answer
pub const TEXT_FIELD: &str = "text";
/// Field carrying the ids of recommended venues
pub const MENTIONED_IDS_FIELD: &str = "mentionedPlacesIds";

/// Contract every chat answer is requested under
pub fn recommendation_contract() -> ResponseContract {
    ResponseContract::with_text_field(TEXT_FIELD)
        .describe(TEXT_FIELD, "The assistant's conversational answer (short and concise).")
        .list_field(MENTIONED_IDS_FIELD)
        .describe(
            MENTIONED_IDS_FIELD,
            "Ids (strings) of the venues recommended or mentioned.",
        )
}

/// Conversation state owned by the caller
#[derive(Debug, Clone)]
pub struct ChatSession {
    turns: Vec<Turn>,
}

impl ChatSession {
    /// Start a session whose first turn is the model's greeting
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::model(greeting)],
        }
    }

    /// All turns so far, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn greeting(&self) -> &str {
        self.turns.first().map(|t| t.text.as_str()).unwrap_or_default()
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new(messages::GREETING)
    }
}

/// One assistant answer
#[derive(Debug, Clone)]
pub struct ChatReply {
    pub text: String,
    /// Recommended venues, in the order the model listed them
    pub venues: Vec<Venue>,
    pub result: GenerationResult,
}

/// Recommendation assistant bound to one catalog
#[derive(Debug, Clone)]
pub struct ChatAssistant {
    client: StructuredClient,
    catalog: Arc<VenueCatalog>,
    policy: RetryPolicy,
    system_instruction: String,
    contract: ResponseContract,
    greeting: String,
}

impl ChatAssistant {
    pub fn new(
        client: StructuredClient,
        catalog: Arc<VenueCatalog>,
        policy: RetryPolicy,
    ) -> Result<Self> {
        let snapshot = catalog.reference_snapshot()?;
        let system_instruction = PromptTemplates::venue_chat(&snapshot, MENTIONED_IDS_FIELD);
        debug!(
            venues = catalog.len(),
            instruction_len = system_instruction.len(),
            "Chat assistant ready"
        );

        Ok(Self {
            client,
            catalog,
            policy,
            system_instruction,
            contract: recommendation_contract(),
            greeting: messages::GREETING.to_string(),
        })
    }

    /// Greeting used by [`Self::new_session`]
    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = greeting.into();
        self
    }

    pub fn new_session(&self) -> ChatSession {
        ChatSession::new(self.greeting.clone())
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Send one user message
    ///
    /// Blank input is ignored and returns `None`. Otherwise both the user
    /// turn and the answer are appended to `session`, whatever the outcome.
    #[instrument(skip_all, fields(turns = session.turns().len()))]
    pub async fn send(&self, session: &mut ChatSession, text: &str) -> Result<Option<ChatReply>> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }

        let request = GenerationRequest::builder(self.system_instruction.as_str())
            .history(session.turns.iter().cloned())
            .user_text(text)
            .contract(self.contract.clone())
            .build()?;

        let result = self.client.generate(&request, &self.policy).await;

        let fields = result.structured_fields();
        let venues: Vec<Venue> = fields
            .list(MENTIONED_IDS_FIELD)
            .map(|ids| self.catalog.resolve(ids).into_iter().cloned().collect())
            .unwrap_or_default();
        debug!(mentioned = venues.len(), "Chat answer resolved");

        session.turns.push(Turn::user(text));
        session.turns.push(Turn::model(result.text.clone()));

        Ok(Some(ChatReply {
            text: result.text.clone(),
            venues,
            result,
        }))
    }
}
