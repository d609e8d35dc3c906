//! Generation error taxonomy and response decoding.
//!
//! # Invariants
//! - A response without generated text is a hard failure, never an empty note.
//! - Error messages never include credentials or prompt text.

use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of one generation attempt; surfaced to the user as one message.
#[derive(Debug)]
pub enum GenerationError {
    /// No credential was configured for the provider.
    MissingCredentials,
    /// Request could not be sent or the body could not be read.
    Transport(String),
    /// Provider answered with a non-success status.
    Status { status: u16, body: String },
    /// Body was not the expected JSON envelope.
    InvalidResponse(serde_json::Error),
    /// Envelope parsed but carried no generated text.
    MissingContent,
}

impl GenerationError {
    /// Message suitable for a user-visible notification.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::MissingCredentials => {
                "Generation is not configured. Set an API key and try again."
            }
            _ => "Failed to generate notes. Please try again.",
        }
    }
}

impl Display for GenerationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "generation api key is not configured"),
            Self::Transport(message) => write!(f, "generation request failed: {message}"),
            Self::Status { status, body } => {
                write!(f, "generation service returned status {status}: {body}")
            }
            Self::InvalidResponse(err) => write!(f, "generation response is malformed: {err}"),
            Self::MissingContent => write!(f, "generation response contained no content"),
        }
    }
}

impl Error for GenerationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidResponse(err) => Some(err),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Extracts `candidates[0].content.parts[0].text` from a response body.
pub fn extract_generated_text(body: &str) -> Result<String, GenerationError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(GenerationError::InvalidResponse)?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .filter(|text| !text.trim().is_empty())
        .ok_or(GenerationError::MissingContent)
}

#[cfg(test)]
mod tests {
    use super::{extract_generated_text, GenerationError};

    #[test]
    fn extracts_first_candidate_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"<h2>Block 1: A</h2>"},{"text":"ignored"}]}}]}"#;
        assert_eq!(extract_generated_text(body).unwrap(), "<h2>Block 1: A</h2>");
    }

    #[test]
    fn missing_or_blank_text_is_a_failure() {
        for body in [
            r#"{}"#,
            r#"{"candidates":[]}"#,
            r#"{"candidates":[{"finishReason":"SAFETY"}]}"#,
            r#"{"candidates":[{"content":{"parts":[{"text":"  "}]}}]}"#,
        ] {
            assert!(
                matches!(extract_generated_text(body), Err(GenerationError::MissingContent)),
                "body: {body}"
            );
        }
    }

    #[test]
    fn non_json_body_is_invalid_response() {
        assert!(matches!(
            extract_generated_text("<html>502</html>"),
            Err(GenerationError::InvalidResponse(_))
        ));
    }
}
