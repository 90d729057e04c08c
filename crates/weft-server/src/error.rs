use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Errors produced while handling requests.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The live reload event stream was requested but live reload is
    /// disabled, so no hub exists to subscribe to.
    #[error("Streaming not supported")]
    StreamingUnavailable,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::StreamingUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
        };
        tracing::error!(error = %self, "Request failed");
        (status, self.to_string()).into_response()
    }
}
