//! Stakeholder comment analysis dashboard.
//!
//! A CSV of comments is uploaded through the dashboard (or posted straight to
//! `/api/analyze`), relayed to an external analysis backend, and the returned
//! sentiment, urgency and word cloud results are rendered server-side.
//!
//! # Configuration
//!
//! | Variable             | Default                          |
//! |----------------------|----------------------------------|
//! | `PYTHON_BACKEND_URL` | `http://localhost:8000/analyze`  |
//! | `PORT`               | `3000`                           |
//! | `RELAY_TIMEOUT_SECS` | unset (no timeout)               |
//! | `MAX_UPLOAD_BYTES`   | `10485760`                       |
//! | `STATIC_DIR`         | `static`                         |
//! | `RUST_LOG`           | `info`                           |

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod relay;
pub mod render;
pub mod state;
pub mod upload;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::{error, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(relay::analyze),
    components(
        schemas(
            relay::UploadForm,
            error::ErrorBody,
            model::AnalysisResult,
            model::SentimentCounts,
            model::UrgencyCounts,
            model::CommentSummary,
            model::WordCloud,
            model::WordCloudImage,
            model::WordFrequency
        )
    ),
    tags(
        (name = "analysis", description = "CSV comment analysis relay")
    )
)]
pub struct ApiDoc;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST]);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/", get(dashboard::index))
        .route("/upload", post(dashboard::upload))
        .route("/analyze", post(dashboard::analyze))
        .route("/health", get(dashboard::health))
        .route("/api/analyze", post(relay::analyze))
        .nest_service("/static", ServeDir::new(&state.config.static_dir))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
