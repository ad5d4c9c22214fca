//! Generation Requests
//!
//! A [`GenerationRequest`] is everything one call to the structured
//! generation client needs: the system instruction (with any reference data
//! embedded), prior conversation turns, the new user turn and an optional
//! response contract. Requests are immutable once built.

use serde::{Deserialize, Serialize};

use super::contract::ResponseContract;
use crate::types::{AssistError, Result};

/// Speaker of a conversation turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One turn of conversation history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Immutable input to one generation call
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    system_instruction: String,
    history: Vec<Turn>,
    latest_user_text: String,
    contract: Option<ResponseContract>,
}

impl GenerationRequest {
    /// Start building a request around a system instruction
    pub fn builder(system_instruction: impl Into<String>) -> GenerationRequestBuilder {
        GenerationRequestBuilder {
            system_instruction: system_instruction.into(),
            history: Vec::new(),
            latest_user_text: String::new(),
            contract: None,
        }
    }

    pub fn system_instruction(&self) -> &str {
        &self.system_instruction
    }

    /// Prior turns, oldest first
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    pub fn latest_user_text(&self) -> &str {
        &self.latest_user_text
    }

    pub fn contract(&self) -> Option<&ResponseContract> {
        self.contract.as_ref()
    }
}

/// Builder for [`GenerationRequest`]
#[derive(Debug, Clone)]
pub struct GenerationRequestBuilder {
    system_instruction: String,
    history: Vec<Turn>,
    latest_user_text: String,
    contract: Option<ResponseContract>,
}

impl GenerationRequestBuilder {
    /// Append prior turns (oldest first)
    pub fn history(mut self, turns: impl IntoIterator<Item = Turn>) -> Self {
        self.history.extend(turns);
        self
    }

    /// Append a single prior turn
    pub fn turn(mut self, turn: Turn) -> Self {
        self.history.push(turn);
        self
    }

    /// Set the new user turn sent after the history
    pub fn user_text(mut self, text: impl Into<String>) -> Self {
        self.latest_user_text = text.into();
        self
    }

    /// Ask the endpoint to constrain its output to a contract
    pub fn contract(mut self, contract: ResponseContract) -> Self {
        self.contract = Some(contract);
        self
    }

    pub fn build(self) -> Result<GenerationRequest> {
        if self.system_instruction.trim().is_empty() {
            return Err(AssistError::InvalidRequest(
                "system instruction must not be empty".to_string(),
            ));
        }
        if self.latest_user_text.trim().is_empty() {
            return Err(AssistError::InvalidRequest(
                "latest user text must not be empty".to_string(),
            ));
        }

        Ok(GenerationRequest {
            system_instruction: self.system_instruction,
            history: self.history,
            latest_user_text: self.latest_user_text,
            contract: self.contract,
        })
    }
}
