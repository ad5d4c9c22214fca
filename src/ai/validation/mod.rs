//! AI Response Validation
//!
//! Turns a successful response body into answer text. Contract validation
//! itself lives in [`crate::ai::contract`].

mod extract;

pub use extract::{ExtractedAnswer, extract_answer, strip_code_fences};
