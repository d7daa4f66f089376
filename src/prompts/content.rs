use crate::curriculum::Curriculum;
use crate::request::{ContentType, GenerationRequest};

use super::{PromptError, context_clause, grade_label, language_directive};

/// Shared closing instruction appended to every content template.
const CBC_ALIGNMENT: &str = "Make sure the content is age-appropriate, uses examples familiar to Kenyan learners, and is aligned with CBC core competencies.";

/// Build the `/api/generate` prompt for a validated request.
pub fn build_content_prompt(
    curriculum: &Curriculum,
    request: &GenerationRequest,
) -> Result<String, PromptError> {
    let label = grade_label(curriculum, &request.grade)?;
    let context = context_clause(label, request.subject.as_deref());
    let language = language_directive(request.language);
    let topic = &request.topic;

    let body = match request.content_type {
        ContentType::LessonSummary => format!(
            "Create a clear and engaging lesson summary about \"{topic}\" {language}. {context}.\n\n\
             Include:\n\
             - Key learning outcomes\n\
             - The main concepts explained simply\n\
             - Important vocabulary with short definitions\n\
             - A short recap learners can revise from"
        ),
        ContentType::Quiz => format!(
            "Create a quiz of 5 multiple-choice questions about \"{topic}\" {language}. {context}.\n\n\
             For each question:\n\
             - Number the question\n\
             - Give 4 options labeled A), B), C), D)\n\
             - Mark the correct answer on its own line as \"Correct answer: <letter>\"\n\
             - Add a one-sentence explanation of why it is correct"
        ),
        ContentType::Activity => format!(
            "Design a hands-on learning activity about \"{topic}\" {language}. {context}.\n\n\
             Structure the activity with these parts:\n\
             - Objective: what learners will achieve\n\
             - Materials: locally available items needed\n\
             - Steps: numbered instructions learners follow\n\
             - Expected outcome: what learners should observe or produce\n\
             - Real-world link: how the activity connects to everyday life in Kenya"
        ),
        ContentType::Assessment => format!(
            "Create an assessment task about \"{topic}\" {language}. {context}.\n\n\
             Include:\n\
             - Clear instructions for the learner\n\
             - A mix of questions testing knowledge, application, and reasoning\n\
             - A rubric with four performance levels: Exceeding Expectations, Meeting Expectations, Approaching Expectations, Below Expectations\n\
             - The criteria for each level"
        ),
        ContentType::Explanation => format!(
            "Explain the concept of \"{topic}\" {language}. {context}.\n\n\
             Use:\n\
             - Simple language suited to the learners' level\n\
             - At least two worked examples from everyday Kenyan life\n\
             - A step-by-step breakdown of any process involved\n\
             - A short check-for-understanding question at the end"
        ),
    };

    Ok(format!("{body}\n\n{CBC_ALIGNMENT}"))
}
