//! Prompt templates for the two supported actions.
//!
//! The extracted document text is embedded verbatim. There is no
//! truncation or chunking; oversized documents are the backend's problem.

pub const ABBREVIATION_INSTRUCTION: &str =
    "Extract abbreviations, in a bulleted list, format 'ABBR: full term':";

/// Build the question-answering prompt. With no document context the
/// question passes through untouched.
pub fn question_prompt(document_text: &str, question: &str) -> String {
    if document_text.is_empty() {
        question.to_string()
    } else {
        format!(
            "{}\n\nAnswer this question only: {}\n\nAnswer:",
            document_text, question
        )
    }
}

/// Build the abbreviation-index prompt. Callers must supply document text;
/// the command layer rejects the action when no document is loaded.
pub fn abbreviation_prompt(document_text: &str) -> String {
    format!("{}\n\n{}", ABBREVIATION_INSTRUCTION, document_text)
}
