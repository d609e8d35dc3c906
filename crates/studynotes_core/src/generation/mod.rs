//! Generative-text integration boundary.
//!
//! # Responsibility
//! - Build outbound prompts and fixed sampling parameters.
//! - Decode provider responses into generated text or a typed failure.
//! - Define the client port the pipeline calls; transports live outside core.
//!
//! # Invariants
//! - One attempt per user action; core never retries.
//! - Credentials arrive through [`config::GenerationConfig`] only.

pub mod assistant;
pub mod config;
pub mod request;
pub mod response;

use request::GenerationPayload;
use response::GenerationError;

/// Transport port for the generative-text provider.
pub trait GenerationClient {
    /// Sends one payload and returns the generated text.
    fn generate(&self, payload: &GenerationPayload) -> Result<String, GenerationError>;
}

impl<C: GenerationClient + ?Sized> GenerationClient for &C {
    fn generate(&self, payload: &GenerationPayload) -> Result<String, GenerationError> {
        (**self).generate(payload)
    }
}
