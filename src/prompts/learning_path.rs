use crate::curriculum::Curriculum;
use crate::request::LearningPathRequest;

use super::{PromptError, grade_label, language_directive};

/// Prompt describing how a topic develops from one grade to another.
pub fn build_learning_path_prompt(
    curriculum: &Curriculum,
    request: &LearningPathRequest,
) -> Result<String, PromptError> {
    let start = grade_label(curriculum, &request.start_grade)?;
    let end = grade_label(curriculum, &request.end_grade)?;
    let language = language_directive(request.language);
    let subject = request
        .subject
        .as_deref()
        .map(|s| format!(" in {s}"))
        .unwrap_or_default();

    Ok(format!(
        "Create a learning path for \"{topic}\"{subject} in the Kenyan CBC curriculum, from {start} to {end}, written {language}.\n\n\
         For each grade along the way, give:\n\
         - The concepts learners should master at that grade\n\
         - How they build on the previous grade\n\
         - One suggested activity\n\
         - Signs that a learner is ready to move on",
        topic = request.topic,
    ))
}
