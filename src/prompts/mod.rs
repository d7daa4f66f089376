//! Prompt composition.
//!
//! Every builder is a pure function: the same validated request always
//! yields the same prompt text.

pub mod clarify;
pub mod content;
pub mod learning_path;
pub mod simple;
pub mod teacher;

use thiserror::Error;

use crate::curriculum::Curriculum;
use crate::request::Language;

pub use clarify::build_clarify_prompt;
pub use content::build_content_prompt;
pub use learning_path::build_learning_path_prompt;
pub use simple::build_simple_prompt;
pub use teacher::build_teacher_prompt;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PromptError {
    /// The grade passed validation but has no label. Indicates a bug.
    #[error("no label for grade code: {0}")]
    UnknownGradeLabel(String),
}

/// Resolve a grade code to its display label.
pub fn grade_label(curriculum: &Curriculum, code: &str) -> Result<&'static str, PromptError> {
    curriculum
        .grade_label(code)
        .ok_or_else(|| PromptError::UnknownGradeLabel(code.to_string()))
}

/// `This is for the Kenyan CBC curriculum at {label}[ in {subject}]`
pub fn context_clause(grade_label: &str, subject: Option<&str>) -> String {
    match subject {
        Some(subject) => {
            format!("This is for the Kenyan CBC curriculum at {grade_label} in {subject}")
        }
        None => format!("This is for the Kenyan CBC curriculum at {grade_label}"),
    }
}

/// `in English` / `in Kiswahili`
pub fn language_directive(language: Language) -> String {
    format!("in {}", language.as_str())
}
