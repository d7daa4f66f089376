use crate::curriculum::Curriculum;
use crate::request::TeacherMaterialsRequest;

use super::{PromptError, context_clause, grade_label, language_directive};

const SECTIONS: &[&str] = &[
    "Lesson plan: specific learning outcomes, key inquiry question, and a timed lesson flow (introduction, development, conclusion)",
    "Teaching strategies suited to learner-centred CBC classrooms",
    "Differentiation for learners who need support and for those ready for extension",
    "Assessment ideas for checking progress during and after the lesson",
    "Learning resources, including low-cost local materials",
    "Core competencies and values the lesson develops",
];

/// Prompt for teacher-facing preparation material.
pub fn build_teacher_prompt(
    curriculum: &Curriculum,
    request: &TeacherMaterialsRequest,
) -> Result<String, PromptError> {
    let label = grade_label(curriculum, &request.grade)?;
    let context = context_clause(label, request.subject.as_deref());
    let language = language_directive(request.language);

    let sections = SECTIONS
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{}. {s}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    Ok(format!(
        "Prepare teacher materials for teaching \"{topic}\" {language}. {context}.\n\n\
         Write for the teacher, not the learners. Cover:\n{sections}",
        topic = request.topic,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Language;

    fn request() -> TeacherMaterialsRequest {
        TeacherMaterialsRequest {
            topic: "Fractions".to_string(),
            grade: "grade4".to_string(),
            subject: Some("Mathematics".to_string()),
            language: Language::English,
        }
    }

    #[test]
    fn prompt_covers_every_section() {
        let prompt = build_teacher_prompt(&Curriculum::kenyan_cbc(), &request()).unwrap();
        for section in SECTIONS {
            assert!(prompt.contains(section));
        }
        assert!(prompt.contains("6. Core competencies"));
    }

    #[test]
    fn prompt_carries_context() {
        let prompt = build_teacher_prompt(&Curriculum::kenyan_cbc(), &request()).unwrap();
        assert!(prompt.contains("\"Fractions\" in English"));
        assert!(prompt.contains("at Grade 4 in Mathematics"));
    }
}
