//! Generation request model and prompt builder.
//!
//! # Responsibility
//! - Describe one user-initiated generation action.
//! - Render it into prompt text plus fixed sampling parameters.
//! - Render the provider wire body for `generateContent`.
//!
//! # Invariants
//! - Building is pure: no I/O, no failure modes.
//! - Full-curriculum prompts always demand `<h2>Block N: ...</h2>` headings so
//!   marker-based segmentation has a reliable target.

use crate::model::subject::{BlockNumber, Subject, BLOCKS_PER_SUBJECT};
use serde::Serialize;
use serde_json::{json, Value};

/// Sampling parameters for content formatting: determinism-leaning.
pub const CONTENT_PARAMETERS: GenerationParameters = GenerationParameters {
    temperature: 0.2,
    top_p: 0.8,
    max_output_tokens: 8000,
};

/// What the generation should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationMode {
    /// Split a whole curriculum into six blocks.
    FullCurriculum,
    /// Format content for one target block.
    SingleBlock(BlockNumber),
}

impl GenerationMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FullCurriculum => "full",
            Self::SingleBlock(_) => "single",
        }
    }
}

/// One generation action; consumed once by the builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub subject: Subject,
    pub mode: GenerationMode,
    /// Raw pasted or extracted source text.
    pub source_text: String,
}

impl GenerationRequest {
    pub fn full_curriculum(subject: Subject, source_text: impl Into<String>) -> Self {
        Self {
            subject,
            mode: GenerationMode::FullCurriculum,
            source_text: source_text.into(),
        }
    }

    pub fn single_block(
        subject: Subject,
        block: BlockNumber,
        source_text: impl Into<String>,
    ) -> Self {
        Self {
            subject,
            mode: GenerationMode::SingleBlock(block),
            source_text: source_text.into(),
        }
    }
}

/// Fixed tuning values sent with every request of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

/// Outbound payload: prompt text plus parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationPayload {
    pub prompt_text: String,
    pub parameters: GenerationParameters,
}

impl GenerationPayload {
    /// Renders the `generateContent` JSON body.
    pub fn to_request_body(&self) -> Value {
        json!({
            "contents": [
                { "parts": [ { "text": self.prompt_text } ] }
            ],
            "generationConfig": self.parameters,
        })
    }
}

/// Builds the prompt and parameters for one generation request.
pub fn build_generation_request(request: &GenerationRequest) -> GenerationPayload {
    let subject = request.subject.display_name();
    let task = match request.mode {
        GenerationMode::FullCurriculum => format!(
            "Take the full curriculum notes below for {subject} and split them into exactly \
             {BLOCKS_PER_SUBJECT} blocks, in order. Every block must be present even if short."
        ),
        GenerationMode::SingleBlock(block) => format!(
            "Format the notes below into clear study notes for {subject} Block {block}. \
             Summarize where helpful but keep every fact."
        ),
    };
    let heading_rule = match request.mode {
        GenerationMode::FullCurriculum => {
            "Start every block with an <h2> heading written exactly as \
             \"<h2>Block N: Title</h2>\" where N is the block number from 1 to 6."
                .to_string()
        }
        GenerationMode::SingleBlock(block) => format!(
            "Start with one <h2> heading written exactly as \"<h2>Block {block}: Title</h2>\"."
        ),
    };

    let prompt_text = format!(
        "You are an expert study notes organizer for {subject}.\n\
         {task}\n\n\
         Output HTML only, following these rules strictly:\n\
         1. {heading_rule}\n\
         2. Use <h3> for subsections inside a block.\n\
         3. Use <table>, <thead>, <tbody>, <tr>, <th> and <td> for tabular data.\n\
         4. Use <ul> and <li> for bullet points.\n\
         5. Use <strong> for key terms and definitions.\n\
         6. Separate consecutive blocks with a single <hr> divider line.\n\
         7. Do not wrap the output in code fences.\n\n\
         Notes:\n\n{source}",
        source = request.source_text
    );

    GenerationPayload {
        prompt_text,
        parameters: CONTENT_PARAMETERS,
    }
}

#[cfg(test)]
mod tests {
    use super::{build_generation_request, GenerationRequest, CONTENT_PARAMETERS};
    use crate::model::subject::{BlockNumber, Subject};

    #[test]
    fn full_curriculum_prompt_names_subject_mode_and_marker_format() {
        let request = GenerationRequest::full_curriculum(Subject::Chemistry, "atoms and bonds");
        let payload = build_generation_request(&request);

        assert!(payload.prompt_text.contains("Chemistry"));
        assert!(payload.prompt_text.contains("exactly 6 blocks"));
        assert!(payload.prompt_text.contains("<h2>Block N: Title</h2>"));
        assert!(payload.prompt_text.contains("<hr>"));
        assert!(payload.prompt_text.ends_with("atoms and bonds"));
        assert_eq!(payload.parameters, CONTENT_PARAMETERS);
    }

    #[test]
    fn single_block_prompt_targets_the_block() {
        let block = BlockNumber::new(4).unwrap();
        let request = GenerationRequest::single_block(Subject::Ict, block, "networks");
        let payload = build_generation_request(&request);

        assert!(payload.prompt_text.contains("ICT Block 4"));
        assert!(payload.prompt_text.contains("<h2>Block 4: Title</h2>"));
        assert!(!payload.prompt_text.contains("split them"));
    }

    #[test]
    fn request_body_uses_provider_field_names() {
        let request = GenerationRequest::full_curriculum(Subject::Maths, "algebra");
        let body = build_generation_request(&request).to_request_body();

        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("algebra"));
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 8000);
        assert!(body["generationConfig"]["topP"].is_number());
        assert!(body["generationConfig"]["temperature"].is_number());
    }
}
