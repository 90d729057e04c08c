use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::response::sse::{Event, KeepAlive, Sse};
use tokio_stream::StreamExt;

use crate::error::ServerError;
use crate::state::AppState;

/// Client script injected into pages when live reload is enabled.
const RELOAD_SCRIPT: &str = include_str!("../assets/reload.js");

/// SSE endpoint for live reload events.
///
/// Registers a new subscriber on the hub and streams one SSE message per
/// reload event. The subscriber unregisters itself when the client
/// disconnects and the stream is dropped.
pub async fn sse_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServerError> {
    let Some(hub) = &state.hub else {
        return Err(ServerError::StreamingUnavailable);
    };

    let subscriber = hub.register();
    tracing::debug!(id = subscriber.id(), "Live reload client connected");

    let stream = subscriber.map(|event| {
        let data = serde_json::to_string(&event).unwrap_or_else(|_| "{}".to_owned());
        Ok::<_, Infallible>(Event::default().data(data))
    });

    let sse = Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    );

    Ok(([(header::CACHE_CONTROL, "no-cache")], sse))
}

/// Serve the reload client script.
pub async fn reload_script() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/javascript"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        RELOAD_SCRIPT,
    )
}
