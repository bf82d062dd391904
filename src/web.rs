//! Web server for the deck form
//!
//! `POST /api/deck` takes the form fields as JSON and answers with the TTS
//! document as a file download, or with the list of cards that could not be
//! found.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::error::DeckError;
use crate::pipeline::{BuildOutcome, DeckBuilder, DeckRequest};
use crate::sink::sanitize_file_name;

/// Shared application state
#[derive(Clone)]
struct AppState {
    builder: DeckBuilder,
}

/// API error wrapper
#[derive(Serialize)]
struct ApiResponse {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ApiResponse {
    fn error(message: String) -> Json<Self> {
        Json(Self {
            success: false,
            error: Some(message),
        })
    }
}

/// Header values must be visible ASCII
fn content_disposition(file_name: &str) -> String {
    let ascii: String = sanitize_file_name(file_name)
        .chars()
        .map(|c| if c.is_ascii() { c } else { '_' })
        .collect();
    format!("attachment; filename=\"{}\"", ascii)
}

/// GET /health
async fn health_handler() -> &'static str {
    "ok"
}

/// POST /api/deck
async fn deck_handler(
    State(state): State<AppState>,
    Json(request): Json<DeckRequest>,
) -> Response {
    match state.builder.build(&request).await {
        Ok(BuildOutcome::Empty) => StatusCode::NO_CONTENT.into_response(),
        Ok(BuildOutcome::Unresolved(names)) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiResponse::error(names.to_string()),
        )
            .into_response(),
        Ok(BuildOutcome::Built(deck)) => (
            [(
                header::CONTENT_DISPOSITION,
                content_disposition(&deck.file_name),
            )],
            Json(deck.document),
        )
            .into_response(),
        Err(e @ DeckError::DeckTooLarge(_)) => {
            (StatusCode::PAYLOAD_TOO_LARGE, ApiResponse::error(e.to_string())).into_response()
        }
        Err(e) => {
            log::warn!("Deck build failed: {}", e);
            (StatusCode::BAD_GATEWAY, ApiResponse::error(e.to_string())).into_response()
        }
    }
}

/// Build the web server router
pub fn create_router(builder: DeckBuilder) -> Router {
    let state = AppState { builder };

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/deck", post(deck_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the web server (async)
///
/// Binds to 0.0.0.0 (all interfaces) to work with Docker port mapping.
pub async fn serve(builder: DeckBuilder, port: u16) -> crate::error::Result<()> {
    let app = create_router(builder);
    let addr = format!("0.0.0.0:{}", port);

    log::info!("Web server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
