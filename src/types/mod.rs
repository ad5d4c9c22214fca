pub mod error;

pub use error::{AssistError, ErrorCategory, ErrorClassifier, LlmError, Result};
