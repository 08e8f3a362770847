use crate::config::AppConfig;
use crate::error::ExtractError;
use crate::model::ExtractionResult;
use crate::pipeline::ExtractionPipeline;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

/// Shared application state
pub struct AppState {
    pub pipeline: ExtractionPipeline,
}

/// Error responses carry a flat `{"error": string}` body with the status
/// from the pipeline's failure taxonomy.
pub struct ApiError(ExtractError);

impl From<ExtractError> for ApiError {
    fn from(err: ExtractError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ExtractError::InvalidInput => StatusCode::BAD_REQUEST,
            ExtractError::Auth(_) | ExtractError::Fetch { .. } => StatusCode::BAD_GATEWAY,
            ExtractError::Parse => StatusCode::UNPROCESSABLE_ENTITY,
            ExtractError::Model(_)
            | ExtractError::Http(_)
            | ExtractError::Url(_)
            | ExtractError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("Extraction failed: {}", self.0);
        }

        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

/// POST /api/extract
///
/// Body validation is by hand so a missing or non-string `url` maps to 400
/// rather than axum's typed-extractor rejection.
async fn extract(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ExtractionResult>, ApiError> {
    let Ok(Json(body)) = body else {
        return Err(ExtractError::InvalidInput.into());
    };
    let url = body
        .get("url")
        .and_then(Value::as_str)
        .ok_or(ExtractError::InvalidInput)?;

    let result = state.pipeline.extract(url).await?;
    Ok(Json(result))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the router with routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/extract", post(extract))
        .route("/health", get(health))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server; blocks until SIGTERM or Ctrl+C.
pub async fn start_server(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let timeout = Duration::from_secs(config.server.timeout);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;

    let state = Arc::new(AppState {
        pipeline: ExtractionPipeline::new(&config),
    });

    let app = build_router(state).layer(TimeoutLayer::new(timeout));

    info!("Starting barbuddy-extract on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}
