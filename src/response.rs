//! Outbound JSON envelopes.
//!
//! Rich endpoints answer with `{success, data, metadata}` or
//! `{success: false, error, details}`. The legacy `/api/gemini` route uses
//! the bare `{output}` / `{error}` shapes.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::consts::{CURRICULUM_NAME, HEALTH_MESSAGE};
use crate::curriculum::{Curriculum, CurriculumLevel, Grade};
use crate::request::{
    ClarifyRequest, ContentType, GenerationRequest, Language, LearningPathRequest,
    TeacherMaterialsRequest,
};

/// Subject reported when the client did not send one.
pub const DEFAULT_SUBJECT: &str = "General";

const FEATURES: &[&str] = &[
    "Lesson summaries",
    "Multiple-choice quizzes",
    "Hands-on activities",
    "Rubric-based assessments",
    "Example-driven explanations",
    "Teacher materials",
    "Follow-up clarification",
    "Cross-grade learning paths",
    "English and Kiswahili output",
];

/// ISO-8601 UTC timestamp with millisecond precision, e.g. `2024-05-01T08:30:00.000Z`.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl<T> Success<T> {
    pub fn new(data: T, metadata: Option<Metadata>) -> Self {
        Self {
            success: true,
            data,
            metadata,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub model: String,
    pub curriculum: &'static str,
    pub input_token_count: u64,
}

impl Metadata {
    pub fn new(model: &str, input_token_count: u64) -> Self {
        Self {
            model: model.to_string(),
            curriculum: CURRICULUM_NAME,
            input_token_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Failure {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl Failure {
    pub fn new(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details,
        }
    }
}

/// The 429 body. `message` is the limiter's text, passed through untouched.
pub fn too_many_requests(message: &str) -> Failure {
    Failure::new(message, None)
}

#[derive(Debug, Serialize)]
pub struct LegacyOutput {
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct LegacyError {
    pub error: String,
}

impl LegacyError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedContent {
    pub topic: String,
    pub grade: String,
    pub grade_label: &'static str,
    pub subject: String,
    pub content_type: ContentType,
    pub language: Language,
    pub content: String,
    pub generated_at: String,
    pub cbc_aligned: bool,
}

impl GeneratedContent {
    pub fn new(request: &GenerationRequest, grade_label: &'static str, content: String) -> Self {
        Self {
            topic: request.topic.clone(),
            grade: request.grade.clone(),
            grade_label,
            subject: subject_or_default(request.subject.as_deref()),
            content_type: request.content_type,
            language: request.language,
            content,
            generated_at: timestamp(),
            cbc_aligned: true,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherMaterials {
    pub topic: String,
    pub grade: String,
    pub grade_label: &'static str,
    pub subject: String,
    pub language: Language,
    pub materials: String,
    pub generated_at: String,
    pub cbc_aligned: bool,
}

impl TeacherMaterials {
    pub fn new(
        request: &TeacherMaterialsRequest,
        grade_label: &'static str,
        materials: String,
    ) -> Self {
        Self {
            topic: request.topic.clone(),
            grade: request.grade.clone(),
            grade_label,
            subject: subject_or_default(request.subject.as_deref()),
            language: request.language,
            materials,
            generated_at: timestamp(),
            cbc_aligned: true,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Clarification {
    pub question: String,
    pub grade: String,
    pub grade_label: &'static str,
    pub language: Language,
    pub clarification: String,
    pub generated_at: String,
}

impl Clarification {
    pub fn new(request: &ClarifyRequest, grade_label: &'static str, clarification: String) -> Self {
        Self {
            question: request.question.clone(),
            grade: request.grade.clone(),
            grade_label,
            language: request.language,
            clarification,
            generated_at: timestamp(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningPath {
    pub topic: String,
    pub start_grade: String,
    pub start_grade_label: &'static str,
    pub end_grade: String,
    pub end_grade_label: &'static str,
    pub subject: String,
    pub language: Language,
    pub learning_path: String,
    pub generated_at: String,
}

impl LearningPath {
    pub fn new(
        request: &LearningPathRequest,
        labels: (&'static str, &'static str),
        learning_path: String,
    ) -> Self {
        Self {
            topic: request.topic.clone(),
            start_grade: request.start_grade.clone(),
            start_grade_label: labels.0,
            end_grade: request.end_grade.clone(),
            end_grade_label: labels.1,
            subject: subject_or_default(request.subject.as_deref()),
            language: request.language,
            learning_path,
            generated_at: timestamp(),
        }
    }
}

fn subject_or_default(subject: Option<&str>) -> String {
    subject.unwrap_or(DEFAULT_SUBJECT).to_string()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurriculumListing<'a> {
    pub curriculum: &'static str,
    pub levels: &'a [CurriculumLevel],
    pub supported_grades: Vec<&'static str>,
    pub grades: &'a [Grade],
    pub content_types: Vec<&'static str>,
    pub languages: Vec<&'static str>,
    pub features: &'static [&'static str],
}

/// The `/api/metadata` body: a pure read of the curriculum table.
pub fn metadata(curriculum: &Curriculum) -> Success<CurriculumListing<'_>> {
    Success::new(
        CurriculumListing {
            curriculum: curriculum.name,
            levels: &curriculum.levels,
            supported_grades: curriculum.grade_codes(),
            grades: curriculum.grades(),
            content_types: ContentType::ALL.iter().map(|c| c.as_str()).collect(),
            languages: Language::ALL.iter().map(|l| l.as_str()).collect(),
            features: FEATURES,
        },
        None,
    )
}

#[derive(Debug, Serialize)]
pub struct RootStatus {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: String,
}

/// `GET /` body.
pub fn root_status() -> RootStatus {
    RootStatus {
        message: HEALTH_MESSAGE,
    }
}

/// `GET /api/health` body.
pub fn health() -> HealthStatus {
    HealthStatus {
        success: true,
        message: HEALTH_MESSAGE,
        timestamp: timestamp(),
    }
}
