use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::live_reload;
use crate::state::AppState;

/// Create the axum router.
///
/// Routes, in match order:
/// - `/__weft/events` (SSE; answers 500 when live reload is disabled)
///   and `/__weft/reload.js`
/// - `/static/` serving files from the public directory
/// - a catch-all fallback rendering the page tree for every other path
pub fn create_router(state: &Arc<AppState>) -> Router {
    Router::new()
        .route("/__weft/events", get(live_reload::sse_handler))
        .route("/__weft/reload.js", get(live_reload::reload_script))
        .nest_service("/static", ServeDir::new(&state.public_dir))
        .fallback(get(handlers::pages::get_page))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::clone(state))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;

    fn test_state(live_reload: bool) -> Arc<AppState> {
        Arc::new(AppState {
            hub: live_reload.then(weft_watch::ReloadHub::new),
            public_dir: PathBuf::from("public"),
            verbose: false,
        })
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_root_serves_page() {
        let app = create_router(&test_state(false));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("<h1>Welcome to Weft</h1>"));
    }

    #[tokio::test]
    async fn test_arbitrary_path_serves_page() {
        let app = create_router(&test_state(false));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/some/deep/path")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Requested path: /some/deep/path"));
    }

    #[tokio::test]
    async fn test_reload_script_injected_only_when_enabled() {
        let app = create_router(&test_state(true));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_string(response).await;
        assert!(body.contains("src=\"/__weft/reload.js\""));

        let app = create_router(&test_state(false));
        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_string(response).await;
        assert!(!body.contains("reload.js"));
    }

    #[tokio::test]
    async fn test_reload_script_route() {
        let app = create_router(&test_state(true));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/__weft/reload.js")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/javascript"
        );
        let body = body_string(response).await;
        assert!(body.contains("EventSource"));
    }

    #[tokio::test]
    async fn test_events_endpoint_errors_when_disabled() {
        // With live reload off there is no hub to subscribe to; the
        // stream cannot be served.
        let app = create_router(&test_state(false));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/__weft/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_string(response).await;
        assert_eq!(body, "Streaming not supported");
    }

    #[tokio::test]
    async fn test_sse_endpoint_responds_with_event_stream() {
        let app = create_router(&test_state(true));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/__weft/events")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/event-stream"
        );
    }

    #[tokio::test]
    async fn test_static_missing_file_is_404() {
        let temp = tempfile::tempdir().unwrap();
        let state = Arc::new(AppState {
            hub: None,
            public_dir: temp.path().to_path_buf(),
            verbose: false,
        });
        let app = create_router(&state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/static/missing.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_static_serves_file() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(temp.path().join("site.css"), "body { margin: 0 }").unwrap();
        let state = Arc::new(AppState {
            hub: None,
            public_dir: temp.path().to_path_buf(),
            verbose: false,
        });
        let app = create_router(&state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/static/site.css")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert_eq!(body, "body { margin: 0 }");
    }
}
