//! HTTP surface (axum).
//!
//! Routes every endpoint to a thin handler over the shared [`Relay`],
//! with CORS, request tracing, and per-IP rate limiting on `/api/*`.
//!
//! **Public API**: [`router`], [`serve_on_listener`], [`run`].

mod handlers;
pub mod limiter;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::middleware;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::relay::Relay;

use limiter::RateLimiter;

/// CORS policy: one configured origin, or any origin when `None`.
pub fn cors_layer(origin: Option<&str>) -> Result<CorsLayer> {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(match origin {
        Some(origin) => layer.allow_origin(
            HeaderValue::from_str(origin)
                .with_context(|| format!("invalid CORS origin: {origin}"))?,
        ),
        None => layer.allow_origin(Any),
    })
}

/// Build the application router.
pub fn router(relay: Arc<Relay>, rate_limiter: Arc<RateLimiter>, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health))
        .route("/metadata", get(handlers::metadata))
        .route("/gemini", post(handlers::gemini))
        .route("/generate", post(handlers::generate))
        .route("/teacher-materials", post(handlers::teacher_materials))
        .route("/clarify", post(handlers::clarify))
        .route("/learning-path", post(handlers::learning_path))
        .route_layer(middleware::from_fn_with_state(rate_limiter, limiter::enforce));

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

/// Serve `app` on an already-bound listener until `shutdown` resolves.
/// Tests bind `127.0.0.1:0` and pass the listener in.
pub async fn serve_on_listener<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!("listening on http://{}", addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
    .context("server error")
}

/// Bind the configured address and serve until Ctrl-C.
pub async fn run(config: &Config, relay: Arc<Relay>) -> Result<()> {
    let cors = cors_layer(config.cors_origin.as_deref())?;
    let rate_limiter = Arc::new(RateLimiter::new(config.rate_limit));
    let app = router(relay, rate_limiter, cors);

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind {}", config.listen))?;

    serve_on_listener(listener, app, shutdown_signal()).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
