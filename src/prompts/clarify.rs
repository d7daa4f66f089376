use crate::curriculum::Curriculum;
use crate::request::ClarifyRequest;

use super::{PromptError, context_clause, grade_label, language_directive};

/// Prompt answering a follow-up question about earlier generated content.
pub fn build_clarify_prompt(
    curriculum: &Curriculum,
    request: &ClarifyRequest,
) -> Result<String, PromptError> {
    let label = grade_label(curriculum, &request.grade)?;
    let context = context_clause(label, None);
    let language = language_directive(request.language);

    Ok(format!(
        "A learner has a follow-up question about material they were given. {context}.\n\n\
         Previous content:\n\"\"\"\n{previous}\n\"\"\"\n\n\
         Question: {question}\n\n\
         Answer the question {language}, using simple words a {label} learner understands. \
         Refer back to the previous content where it helps, and give one short example.",
        previous = request.previous_content,
        question = request.question,
    ))
}
