//! End-to-end tests over a real listener. The gateway is scripted, so no
//! network access is needed.

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::net::TcpListener;

use somo::consts::RATE_LIMIT_MESSAGE;
use somo::curriculum::Curriculum;
use somo::gateway::mock::MockGateway;
use somo::relay::Relay;
use somo::server::limiter::{RateLimitConfig, RateLimiter};
use somo::server::{cors_layer, router, serve_on_listener};

/// Bind to a random port and serve in the background. Returns the base URL.
async fn spawn_server(gateway: Arc<MockGateway>, rate_limit: RateLimitConfig) -> String {
    spawn_with_cors(gateway, rate_limit, None).await
}

async fn spawn_with_cors(
    gateway: Arc<MockGateway>,
    rate_limit: RateLimitConfig,
    cors_origin: Option<&str>,
) -> String {
    let relay = Arc::new(Relay::new(Arc::new(Curriculum::kenyan_cbc()), gateway));
    let app = router(
        relay,
        Arc::new(RateLimiter::new(rate_limit)),
        cors_layer(cors_origin).unwrap(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve_on_listener(listener, app, std::future::pending()));
    format!("http://{addr}")
}

async fn spawn_default(gateway: Arc<MockGateway>) -> String {
    spawn_server(gateway, RateLimitConfig::default()).await
}

async fn post(base: &str, path: &str, body: Value) -> (StatusCode, Value) {
    let resp = reqwest::Client::new()
        .post(format!("{base}{path}"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

async fn get(base: &str, path: &str) -> (StatusCode, Value) {
    let resp = reqwest::get(format!("{base}{path}")).await.unwrap();
    let status = resp.status();
    (status, resp.json().await.unwrap())
}

// ── /api/generate ────────────────────────────────────────────────

#[tokio::test]
async fn generate_quiz_scenario() {
    let gateway = Arc::new(MockGateway::replying("Q1) ..."));
    let base = spawn_default(gateway.clone()).await;

    let (status, body) = post(
        &base,
        "/api/generate",
        json!({"topic": "Photosynthesis", "grade": "grade6", "contentType": "quiz", "language": "English"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let data = &body["data"];
    assert_eq!(data["topic"], "Photosynthesis");
    assert_eq!(data["grade"], "grade6");
    assert_eq!(data["gradeLabel"], "Grade 6");
    assert_eq!(data["subject"], "General");
    assert_eq!(data["contentType"], "quiz");
    assert_eq!(data["language"], "English");
    assert_eq!(data["content"], "Q1) ...");
    assert_eq!(data["cbcAligned"], true);
    assert!(data["generatedAt"].is_string());
    assert_eq!(body["metadata"]["model"], "mock-model");
    assert_eq!(body["metadata"]["inputTokenCount"], 0);
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn generate_invalid_grade_lists_codes() {
    let gateway = Arc::new(MockGateway::replying("unused"));
    let base = spawn_default(gateway.clone()).await;

    let (status, body) = post(
        &base,
        "/api/generate",
        json!({"topic": "X", "grade": "invalidgrade", "contentType": "quiz", "language": "English"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    let error = body["error"].as_str().unwrap();
    for code in Curriculum::kenyan_cbc().grade_codes() {
        assert!(error.contains(code), "{error} should list {code}");
    }
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn generate_blank_topic_rejected() {
    let gateway = Arc::new(MockGateway::replying("unused"));
    let base = spawn_default(gateway.clone()).await;

    let (status, body) = post(&base, "/api/generate", json!({"topic": "  ", "grade": "grade6"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Topic is required and must be a non-empty string");
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn generate_transport_error_is_500_with_details() {
    let base = spawn_default(Arc::new(MockGateway::failing("error sending request: connection refused"))).await;

    let (status, body) = post(&base, "/api/generate", json!({"topic": "Soil", "grade": "grade4"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Failed to generate content");
    assert!(!body["details"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_400() {
    let base = spawn_default(Arc::new(MockGateway::replying("unused"))).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/generate"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid JSON body");
}

#[tokio::test]
async fn metadata_grades_round_trip_through_generate() {
    let base = spawn_default(Arc::new(MockGateway::replying("ok"))).await;

    let (status, metadata) = get(&base, "/api/metadata").await;
    assert_eq!(status, StatusCode::OK);
    let grades = metadata["data"]["supportedGrades"].as_array().unwrap().clone();
    assert!(!grades.is_empty());

    for grade in grades {
        let (status, body) = post(&base, "/api/generate", json!({"topic": "Water", "grade": grade})).await;
        assert_eq!(status, StatusCode::OK, "grade {grade} rejected: {body}");
    }
}

// ── /api/gemini (legacy) ─────────────────────────────────────────

#[tokio::test]
async fn gemini_without_topic_is_400() {
    let base = spawn_default(Arc::new(MockGateway::replying("unused"))).await;

    let (status, body) = post(&base, "/api/gemini", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Please provide a topic."}));
}

#[tokio::test]
async fn gemini_without_json_content_type_is_400() {
    let base = spawn_default(Arc::new(MockGateway::replying("unused"))).await;

    let resp = reqwest::Client::new()
        .post(format!("{base}/api/gemini"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"error": "Please provide a topic."}));
}

#[tokio::test]
async fn gemini_returns_output() {
    let base = spawn_default(Arc::new(MockGateway::replying("SUMMARY: ..."))).await;

    let (status, body) = post(&base, "/api/gemini", json!({"topic": "Soil"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"output": "SUMMARY: ..."}));
}

#[tokio::test]
async fn gemini_transport_error_is_generic_500() {
    let base = spawn_default(Arc::new(MockGateway::failing("timeout"))).await;

    let (status, body) = post(&base, "/api/gemini", json!({"topic": "Soil"})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to generate content"}));
}

// ── supplementary endpoints ──────────────────────────────────────

#[tokio::test]
async fn teacher_materials_endpoint() {
    let base = spawn_default(Arc::new(MockGateway::replying("Lesson plan"))).await;

    let (status, body) = post(&base, "/api/teacher-materials", json!({"topic": "Fractions"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Topic and grade are required");

    let (status, body) = post(
        &base,
        "/api/teacher-materials",
        json!({"topic": "Fractions", "grade": "grade4"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["materials"], "Lesson plan");
    assert_eq!(body["data"]["gradeLabel"], "Grade 4");
}

#[tokio::test]
async fn clarify_endpoint() {
    let base = spawn_default(Arc::new(MockGateway::replying("Because..."))).await;

    let (status, body) = post(&base, "/api/clarify", json!({"question": "Why?", "grade": "grade5"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Previous content, question, and grade are required");

    let (status, body) = post(
        &base,
        "/api/clarify",
        json!({"previousContent": "Plants make food.", "question": "Why?", "grade": "grade5", "language": "Kiswahili"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["clarification"], "Because...");
    assert_eq!(body["data"]["language"], "Kiswahili");
}

#[tokio::test]
async fn learning_path_endpoint() {
    let base = spawn_default(Arc::new(MockGateway::replying("Grade 4: ..."))).await;

    let (status, body) = post(&base, "/api/learning-path", json!({"topic": "Energy", "startGrade": "grade4"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Topic, start grade, and end grade are required");

    let (status, body) = post(
        &base,
        "/api/learning-path",
        json!({"topic": "Energy", "startGrade": "grade4", "endGrade": "grade9"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["learningPath"], "Grade 4: ...");
    assert_eq!(body["data"]["endGradeLabel"], "Grade 9");
}

// ── static endpoints ─────────────────────────────────────────────

#[tokio::test]
async fn health_endpoints() {
    let base = spawn_default(Arc::new(MockGateway::replying("unused"))).await;

    let (status, body) = get(&base, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = get(&base, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn unknown_route_is_404() {
    let base = spawn_default(Arc::new(MockGateway::replying("unused"))).await;

    let (status, body) = get(&base, "/api/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let base = spawn_default(Arc::new(MockGateway::replying("unused"))).await;

    let resp = reqwest::Client::new()
        .get(format!("{base}/api/health"))
        .header("origin", "https://school.example")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn cors_echoes_only_the_configured_origin() {
    let base = spawn_with_cors(
        Arc::new(MockGateway::replying("unused")),
        RateLimitConfig::default(),
        Some("https://school.example"),
    )
    .await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/api/health"))
        .header("origin", "https://school.example")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers().get("access-control-allow-origin").unwrap(),
        "https://school.example"
    );

    let resp = client
        .get(format!("{base}/api/health"))
        .header("origin", "https://elsewhere.example")
        .send()
        .await
        .unwrap();
    let allowed = resp.headers().get("access-control-allow-origin");
    assert_ne!(
        allowed.and_then(|v| v.to_str().ok()),
        Some("https://elsewhere.example")
    );
    assert_ne!(allowed.and_then(|v| v.to_str().ok()), Some("*"));

    let preflight = client
        .request(reqwest::Method::OPTIONS, format!("{base}/api/generate"))
        .header("origin", "https://school.example")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert!(preflight.status().is_success());
    assert_eq!(
        preflight.headers().get("access-control-allow-origin").unwrap(),
        "https://school.example"
    );
}

// ── rate limiting & concurrency ──────────────────────────────────

#[tokio::test]
async fn rate_limit_rejects_with_verbatim_message() {
    let base = spawn_server(
        Arc::new(MockGateway::replying("ok")),
        RateLimitConfig {
            max_requests: 2,
            window: Duration::from_secs(60),
        },
    )
    .await;

    for _ in 0..2 {
        let (status, _) = get(&base, "/api/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    let resp = reqwest::get(format!("{base}/api/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(resp.headers().get("retry-after").is_some());
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({"success": false, "error": RATE_LIMIT_MESSAGE}));

    // The root route is outside /api and stays reachable.
    let (status, _) = get(&base, "/").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn slow_generation_does_not_block_other_requests() {
    let gateway = Arc::new(MockGateway::replying("slow").with_delay(Duration::from_secs(2)));
    let base = spawn_default(gateway).await;

    let slow_base = base.clone();
    let slow = tokio::spawn(async move {
        post(&slow_base, "/api/generate", json!({"topic": "Soil", "grade": "grade4"})).await
    });

    // Give the slow request time to reach the gateway.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let health = tokio::time::timeout(Duration::from_millis(1000), get(&base, "/api/health"))
        .await
        .expect("health check should not wait for generation");
    assert_eq!(health.0, StatusCode::OK);

    let (status, body) = slow.await.unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["content"], "slow");
}

#[tokio::test]
async fn concurrent_requests_are_independent() {
    let base = spawn_default(Arc::new(MockGateway::replying("ok"))).await;

    let requests = ["grade1", "grade5", "nope", "grade9"].map(|grade| {
        let base = base.clone();
        async move { post(&base, "/api/generate", json!({"topic": "Maps", "grade": grade})).await }
    });
    let results = futures::future::join_all(requests).await;

    let statuses: Vec<StatusCode> = results.iter().map(|(s, _)| *s).collect();
    assert_eq!(
        statuses,
        vec![
            StatusCode::OK,
            StatusCode::OK,
            StatusCode::BAD_REQUEST,
            StatusCode::OK
        ]
    );
}
