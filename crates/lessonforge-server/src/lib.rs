//! lessonforge-server — JSON HTTP API over the lesson service.
//!
//! Routes:
//! - `POST /api/generate-questions` → `{"questions": [...]}`
//! - `POST /api/analyze-content` → `{"analytics": {...}}`
//! - `POST /api/generate-content` → `{"content": "..."}`
//! - `GET /health` → `{"status": "ok"}`
//!
//! Failures are `{"error": "..."}` with 400 for caller mistakes and 500 for
//! everything that went wrong upstream or in normalization.

mod error;
mod routes;

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;

use lessonforge_core::service::LessonService;

pub use error::ApiError;
pub use routes::{AnalyzeBody, ContentBody, QuestionsBody};

/// Build the API router around a shared service.
pub fn router(service: Arc<LessonService>) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/api/generate-questions", post(routes::generate_questions))
        .route("/api/analyze-content", post(routes::analyze_content))
        .route("/api/generate-content", post(routes::generate_content))
        .with_state(service)
}

/// Bind `addr` and serve until `shutdown` resolves.
pub async fn serve(
    addr: &str,
    service: Arc<LessonService>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    serve_on(listener, service, shutdown).await
}

/// Serve on an already-bound listener.
pub async fn serve_on(
    listener: TcpListener,
    service: Arc<LessonService>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let local = listener.local_addr()?;
    tracing::info!(
        provider = service.client().provider_name(),
        model = %service.client().config().model,
        "listening on http://{local}"
    );
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;
    tracing::info!("server stopped");
    Ok(())
}
