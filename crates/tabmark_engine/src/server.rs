use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use tabmark_logging::tabmark_info;
use thiserror::Error;

use crate::convert::LocalConverter;
use crate::wire::{ConvertRequest, ConvertResponse};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(std::io::Error),
}

/// Router exposing `POST /convert`.
pub fn router(converter: LocalConverter) -> Router {
    Router::new()
        .route("/convert", post(convert_handler))
        .with_state(Arc::new(converter))
}

async fn convert_handler(
    State(converter): State<Arc<LocalConverter>>,
    Json(request): Json<ConvertRequest>,
) -> Json<ConvertResponse> {
    tabmark_info!("POST /convert text_len={}", request.text.len());
    Json(ConvertResponse {
        markdown_text: converter.convert_now(&request.text),
    })
}

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, converter: LocalConverter) -> Result<(), ServerError> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    if let Ok(local) = listener.local_addr() {
        tabmark_info!("Listening on http://{}/convert", local);
    }

    axum::serve(listener, router(converter))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tabmark_info!("Shutting down");
}
