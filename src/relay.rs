//! The request pipeline: validate, compose a prompt, call the gateway,
//! wrap the reply. One [`Relay`] is shared by every HTTP handler.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::{info, warn};

use crate::curriculum::Curriculum;
use crate::gateway::{Completion, Gateway, GenerationFailure};
use crate::prompts::{self, PromptError};
use crate::request::{self, ValidationError};
use crate::response::{
    Clarification, GeneratedContent, LearningPath, Metadata, Success, TeacherMaterials,
};

#[derive(Debug, Error)]
pub enum RelayError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Prompt(#[from] PromptError),
    #[error(transparent)]
    Generation(#[from] GenerationFailure),
}

/// Wires the curriculum table to a completion gateway.
pub struct Relay {
    curriculum: Arc<Curriculum>,
    gateway: Arc<dyn Gateway>,
}

impl Relay {
    pub fn new(curriculum: Arc<Curriculum>, gateway: Arc<dyn Gateway>) -> Self {
        Self {
            curriculum,
            gateway,
        }
    }

    pub fn curriculum(&self) -> &Curriculum {
        &self.curriculum
    }

    pub fn model(&self) -> &str {
        self.gateway.model()
    }

    fn metadata(&self, completion: &Completion) -> Option<Metadata> {
        Some(Metadata::new(self.model(), completion.input_tokens()))
    }

    /// `/api/generate`: structured content for one content type.
    pub async fn generate(
        &self,
        payload: &Value,
    ) -> Result<Success<GeneratedContent>, RelayError> {
        let request = request::validate_generation(&self.curriculum, payload)
            .inspect_err(|e| warn!(error = %e, "generate request rejected"))?;
        let label = prompts::grade_label(&self.curriculum, &request.grade)?;
        let prompt = prompts::build_content_prompt(&self.curriculum, &request)?;

        info!(
            topic = %request.topic,
            grade = %request.grade,
            content_type = %request.content_type,
            language = %request.language,
            "generating content"
        );
        let completion = self.gateway.generate(&prompt).await?;
        let metadata = self.metadata(&completion);

        Ok(Success::new(
            GeneratedContent::new(&request, label, completion.text),
            metadata,
        ))
    }

    /// `/api/gemini`: the fixed three-section material for a bare topic.
    pub async fn quick(&self, topic: &str) -> Result<String, GenerationFailure> {
        info!(%topic, "generating quick material");
        let completion = self.gateway.generate(&prompts::build_simple_prompt(topic)).await?;
        Ok(completion.text)
    }

    /// `/api/teacher-materials`
    pub async fn teacher_materials(
        &self,
        payload: &Value,
    ) -> Result<Success<TeacherMaterials>, RelayError> {
        let request = request::validate_teacher_materials(&self.curriculum, payload)
            .inspect_err(|e| warn!(error = %e, "teacher-materials request rejected"))?;
        let label = prompts::grade_label(&self.curriculum, &request.grade)?;
        let prompt = prompts::build_teacher_prompt(&self.curriculum, &request)?;

        info!(topic = %request.topic, grade = %request.grade, "generating teacher materials");
        let completion = self.gateway.generate(&prompt).await?;
        let metadata = self.metadata(&completion);

        Ok(Success::new(
            TeacherMaterials::new(&request, label, completion.text),
            metadata,
        ))
    }

    /// `/api/clarify`
    pub async fn clarify(&self, payload: &Value) -> Result<Success<Clarification>, RelayError> {
        let request = request::validate_clarify(&self.curriculum, payload)
            .inspect_err(|e| warn!(error = %e, "clarify request rejected"))?;
        let label = prompts::grade_label(&self.curriculum, &request.grade)?;
        let prompt = prompts::build_clarify_prompt(&self.curriculum, &request)?;

        info!(grade = %request.grade, "generating clarification");
        let completion = self.gateway.generate(&prompt).await?;
        let metadata = self.metadata(&completion);

        Ok(Success::new(
            Clarification::new(&request, label, completion.text),
            metadata,
        ))
    }

    /// `/api/learning-path`
    pub async fn learning_path(
        &self,
        payload: &Value,
    ) -> Result<Success<LearningPath>, RelayError> {
        let request = request::validate_learning_path(&self.curriculum, payload)
            .inspect_err(|e| warn!(error = %e, "learning-path request rejected"))?;
        let start = prompts::grade_label(&self.curriculum, &request.start_grade)?;
        let end = prompts::grade_label(&self.curriculum, &request.end_grade)?;
        let prompt = prompts::build_learning_path_prompt(&self.curriculum, &request)?;

        info!(
            topic = %request.topic,
            start = %request.start_grade,
            end = %request.end_grade,
            "generating learning path"
        );
        let completion = self.gateway.generate(&prompt).await?;
        let metadata = self.metadata(&completion);

        Ok(Success::new(
            LearningPath::new(&request, (start, end), completion.text),
            metadata,
        ))
    }
}
