//! Study assistant prompt builder.
//!
//! Answers free-form questions grounded in one subject's stored notes.

use crate::generation::request::{GenerationParameters, GenerationPayload};
use crate::model::notes::NotesStore;
use crate::model::subject::Subject;

/// Sampling parameters for short conversational answers.
pub const ASSISTANT_PARAMETERS: GenerationParameters = GenerationParameters {
    temperature: 0.3,
    top_p: 0.8,
    max_output_tokens: 800,
};

/// Builds a question-answering payload with the subject's notes as context.
pub fn build_assistant_request(
    store: &NotesStore,
    subject: Subject,
    question: &str,
) -> GenerationPayload {
    let name = subject.display_name();
    let mut context = format!("Here are the relevant notes for {name}:\n\n");
    for (block, content) in store.subject(subject).iter() {
        context.push_str(&format!("Block {block}:\n{content}\n\n"));
    }

    let prompt_text = format!(
        "You are a study assistant helping a student with {name}.\n\
         Use the following context from their notes to give accurate answers.\n\n\
         {context}\
         Question: {question}\n\n\
         If the question is not covered by the notes, answer from general knowledge \
         and point the student back to their notes. Keep the answer concise and friendly.",
        question = question.trim()
    );

    GenerationPayload {
        prompt_text,
        parameters: ASSISTANT_PARAMETERS,
    }
}
