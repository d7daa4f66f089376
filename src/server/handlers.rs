use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use tracing::error;

use crate::relay::{Relay, RelayError};
use crate::request;
use crate::response::{
    self, Clarification, Failure, GeneratedContent, HealthStatus, LearningPath, LegacyError,
    LegacyOutput, RootStatus, Success, TeacherMaterials,
};

const GENERATION_FAILED: &str = "Failed to generate content";
const MISSING_TOPIC: &str = "Please provide a topic.";
const INVALID_BODY: &str = "Invalid JSON body";

type Body = Result<Json<Value>, JsonRejection>;

/// Everything a rich handler can fail with.
pub(crate) enum ApiError {
    Body(JsonRejection),
    Relay(RelayError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Body(rejection)
    }
}

impl From<RelayError> for ApiError {
    fn from(e: RelayError) -> Self {
        ApiError::Relay(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, failure) = match self {
            ApiError::Body(rejection) => (
                StatusCode::BAD_REQUEST,
                Failure::new(INVALID_BODY, Some(rejection.body_text())),
            ),
            ApiError::Relay(RelayError::Validation(e)) => {
                (StatusCode::BAD_REQUEST, Failure::new(e.to_string(), None))
            }
            ApiError::Relay(RelayError::Prompt(e)) => {
                error!(error = %e, "prompt composition failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Failure::new(GENERATION_FAILED, Some(e.to_string())),
                )
            }
            ApiError::Relay(RelayError::Generation(e)) => {
                error!(detail = %e.detail, "generation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Failure::new(GENERATION_FAILED, Some(e.detail)),
                )
            }
        };
        (status, Json(failure)).into_response()
    }
}

/// Unwrap the JSON body. A request without a JSON content type is read as
/// an empty object, so missing-field rules report what is missing.
fn payload(body: Body) -> Result<Value, JsonRejection> {
    match body {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(Value::Object(Default::default())),
        Err(rejection) => Err(rejection),
    }
}

pub(crate) async fn root() -> Json<RootStatus> {
    Json(response::root_status())
}

pub(crate) async fn health() -> Json<HealthStatus> {
    Json(response::health())
}

pub(crate) async fn metadata(State(relay): State<Arc<Relay>>) -> Response {
    Json(response::metadata(relay.curriculum())).into_response()
}

pub(crate) async fn not_found() -> (StatusCode, Json<Failure>) {
    (
        StatusCode::NOT_FOUND,
        Json(Failure::new("Route not found", None)),
    )
}

/// Legacy topic-only route with the bare `{output}` / `{error}` shapes.
pub(crate) async fn gemini(State(relay): State<Arc<Relay>>, body: Body) -> Response {
    let Ok(payload) = payload(body) else {
        return (StatusCode::BAD_REQUEST, Json(LegacyError::new(INVALID_BODY))).into_response();
    };
    let Some(topic) = request::simple_topic(&payload) else {
        return (StatusCode::BAD_REQUEST, Json(LegacyError::new(MISSING_TOPIC))).into_response();
    };

    match relay.quick(&topic).await {
        Ok(output) => Json(LegacyOutput { output }).into_response(),
        Err(e) => {
            error!(detail = %e.detail, "generation failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(LegacyError::new(GENERATION_FAILED)),
            )
                .into_response()
        }
    }
}

pub(crate) async fn generate(
    State(relay): State<Arc<Relay>>,
    body: Body,
) -> Result<Json<Success<GeneratedContent>>, ApiError> {
    let payload = payload(body)?;
    Ok(Json(relay.generate(&payload).await?))
}

pub(crate) async fn teacher_materials(
    State(relay): State<Arc<Relay>>,
    body: Body,
) -> Result<Json<Success<TeacherMaterials>>, ApiError> {
    let payload = payload(body)?;
    Ok(Json(relay.teacher_materials(&payload).await?))
}

pub(crate) async fn clarify(
    State(relay): State<Arc<Relay>>,
    body: Body,
) -> Result<Json<Success<Clarification>>, ApiError> {
    let payload = payload(body)?;
    Ok(Json(relay.clarify(&payload).await?))
}

pub(crate) async fn learning_path(
    State(relay): State<Arc<Relay>>,
    body: Body,
) -> Result<Json<Success<LearningPath>>, ApiError> {
    let payload = payload(body)?;
    Ok(Json(relay.learning_path(&payload).await?))
}
