//! Venue Summaries
//!
//! Single-shot, plain-text summary of one venue.

use tracing::instrument;

use super::prompt::PromptTemplates;
use crate::ai::{GenerationRequest, GenerationResult, RetryPolicy, StructuredClient};
use crate::types::Result;
use crate::venue::Venue;

/// Summary request for `venue`: no history, no contract
pub fn summary_request(venue: &Venue) -> Result<GenerationRequest> {
    GenerationRequest::builder(PromptTemplates::venue_summary())
        .user_text(format!("Summary for: {}", venue.summary_json()?))
        .build()
}

/// Generate a short paragraph describing `venue`
///
/// The answer is plain text. When every attempt fails, the result carries
/// `client`'s fallback message.
#[instrument(skip_all, fields(venue = %venue.id))]
pub async fn summarize_venue(
    client: &StructuredClient,
    venue: &Venue,
    policy: &RetryPolicy,
) -> Result<GenerationResult> {
    let request = summary_request(venue)?;
    Ok(client.generate(&request, policy).await)
}
