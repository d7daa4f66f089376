//! Request validation.
//!
//! Every validator is a pure function from a JSON payload to a typed
//! request or a [`ValidationError`]. Rules are checked in a fixed order and
//! the first violation wins.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::curriculum::Curriculum;

/// The pedagogical artifact a client asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    #[default]
    LessonSummary,
    Quiz,
    Activity,
    Assessment,
    Explanation,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        ContentType::LessonSummary,
        ContentType::Quiz,
        ContentType::Activity,
        ContentType::Assessment,
        ContentType::Explanation,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ContentType::LessonSummary => "lesson-summary",
            ContentType::Quiz => "quiz",
            ContentType::Activity => "activity",
            ContentType::Assessment => "assessment",
            ContentType::Explanation => "explanation",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentType::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(ValidationError::invalid_content_type)
    }
}

/// Output language for generated material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Language {
    #[default]
    English,
    Kiswahili,
}

impl Language {
    pub const ALL: [Language; 2] = [Language::English, Language::Kiswahili];

    pub fn as_str(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Kiswahili => "Kiswahili",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(ValidationError::invalid_language)
    }
}

/// Client-caused request errors. Each maps to HTTP 400.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Topic is required and must be a non-empty string")]
    InvalidTopic,
    #[error("Valid grade is required. Valid grades: {valid}")]
    InvalidGrade { valid: String },
    #[error("Subject must be a string")]
    InvalidSubject,
    #[error("Invalid content type. Valid types: {valid}")]
    InvalidContentType { valid: String },
    #[error("Invalid language. Valid languages: {valid}")]
    InvalidLanguage { valid: String },
    /// Required fields of a supplementary endpoint are absent or blank.
    #[error("{0}")]
    MissingFields(&'static str),
}

impl ValidationError {
    fn invalid_grade(curriculum: &Curriculum) -> Self {
        ValidationError::InvalidGrade {
            valid: curriculum.grade_codes().join(", "),
        }
    }

    fn invalid_content_type() -> Self {
        ValidationError::InvalidContentType {
            valid: join(ContentType::ALL.iter().map(|c| c.as_str())),
        }
    }

    fn invalid_language() -> Self {
        ValidationError::InvalidLanguage {
            valid: join(Language::ALL.iter().map(|l| l.as_str())),
        }
    }
}

fn join<'a>(items: impl Iterator<Item = &'a str>) -> String {
    items.collect::<Vec<_>>().join(", ")
}

/// A validated `/api/generate` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub grade: String,
    pub subject: Option<String>,
    pub content_type: ContentType,
    pub language: Language,
}

/// A validated `/api/teacher-materials` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeacherMaterialsRequest {
    pub topic: String,
    pub grade: String,
    pub subject: Option<String>,
    pub language: Language,
}

/// A validated `/api/clarify` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClarifyRequest {
    pub previous_content: String,
    pub question: String,
    pub grade: String,
    pub language: Language,
}

/// A validated `/api/learning-path` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearningPathRequest {
    pub topic: String,
    pub start_grade: String,
    pub end_grade: String,
    pub subject: Option<String>,
    pub language: Language,
}

/// Get a field, treating JSON `null` as absent.
fn field<'a>(payload: &'a Value, name: &str) -> Option<&'a Value> {
    payload.get(name).filter(|v| !v.is_null())
}

/// A present, string-typed, non-blank field, trimmed.
fn required_text(payload: &Value, name: &str) -> Option<String> {
    field(payload, name)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn optional_subject(payload: &Value) -> Result<Option<String>, ValidationError> {
    match field(payload, "subject") {
        None => Ok(None),
        Some(Value::String(s)) => {
            let s = s.trim();
            Ok((!s.is_empty()).then(|| s.to_string()))
        }
        Some(_) => Err(ValidationError::InvalidSubject),
    }
}

fn optional_language(payload: &Value) -> Result<Language, ValidationError> {
    match field(payload, "language") {
        None => Ok(Language::default()),
        Some(v) => v
            .as_str()
            .ok_or_else(ValidationError::invalid_language)?
            .parse(),
    }
}

fn optional_content_type(payload: &Value) -> Result<ContentType, ValidationError> {
    match field(payload, "contentType") {
        None => Ok(ContentType::default()),
        Some(v) => v
            .as_str()
            .ok_or_else(ValidationError::invalid_content_type)?
            .parse(),
    }
}

/// A grade field that was supplied at all: not absent, `null`, or `""`.
fn grade_value<'a>(payload: &'a Value, name: &str) -> Option<&'a Value> {
    field(payload, name).filter(|v| v.as_str() != Some(""))
}

/// Resolve a grade field to a known code. Codes match exactly, untrimmed,
/// on every endpoint.
fn required_grade(
    curriculum: &Curriculum,
    payload: &Value,
    name: &str,
) -> Result<String, ValidationError> {
    grade_value(payload, name)
        .and_then(Value::as_str)
        .filter(|code| curriculum.is_known_grade(code))
        .map(str::to_string)
        .ok_or_else(|| ValidationError::invalid_grade(curriculum))
}

/// Validate a `/api/generate` payload.
pub fn validate_generation(
    curriculum: &Curriculum,
    payload: &Value,
) -> Result<GenerationRequest, ValidationError> {
    let topic = required_text(payload, "topic").ok_or(ValidationError::InvalidTopic)?;

    let grade = required_grade(curriculum, payload, "grade")?;

    let subject = optional_subject(payload)?;
    let content_type = optional_content_type(payload)?;
    let language = optional_language(payload)?;

    Ok(GenerationRequest {
        topic,
        grade,
        subject,
        content_type,
        language,
    })
}

/// Extract the topic of a legacy `/api/gemini` payload.
/// Returns `None` when the topic is missing, not a string, or blank.
pub fn simple_topic(payload: &Value) -> Option<String> {
    required_text(payload, "topic")
}

pub fn validate_teacher_materials(
    curriculum: &Curriculum,
    payload: &Value,
) -> Result<TeacherMaterialsRequest, ValidationError> {
    const MISSING: &str = "Topic and grade are required";

    let (Some(topic), Some(_)) = (
        required_text(payload, "topic"),
        grade_value(payload, "grade"),
    ) else {
        return Err(ValidationError::MissingFields(MISSING));
    };

    Ok(TeacherMaterialsRequest {
        topic,
        grade: required_grade(curriculum, payload, "grade")?,
        subject: optional_subject(payload)?,
        language: optional_language(payload)?,
    })
}

pub fn validate_clarify(
    curriculum: &Curriculum,
    payload: &Value,
) -> Result<ClarifyRequest, ValidationError> {
    const MISSING: &str = "Previous content, question, and grade are required";

    let (Some(previous_content), Some(question), Some(_)) = (
        required_text(payload, "previousContent"),
        required_text(payload, "question"),
        grade_value(payload, "grade"),
    ) else {
        return Err(ValidationError::MissingFields(MISSING));
    };

    Ok(ClarifyRequest {
        previous_content,
        question,
        grade: required_grade(curriculum, payload, "grade")?,
        language: optional_language(payload)?,
    })
}

pub fn validate_learning_path(
    curriculum: &Curriculum,
    payload: &Value,
) -> Result<LearningPathRequest, ValidationError> {
    const MISSING: &str = "Topic, start grade, and end grade are required";

    let (Some(topic), Some(_), Some(_)) = (
        required_text(payload, "topic"),
        grade_value(payload, "startGrade"),
        grade_value(payload, "endGrade"),
    ) else {
        return Err(ValidationError::MissingFields(MISSING));
    };

    Ok(LearningPathRequest {
        topic,
        start_grade: required_grade(curriculum, payload, "startGrade")?,
        end_grade: required_grade(curriculum, payload, "endGrade")?,
        subject: optional_subject(payload)?,
        language: optional_language(payload)?,
    })
}
