//! HTTP routing: the reload socket plus static files for everything else.

use crate::server::connection::ws_handler;
use crate::server::context::SharedContext;
use crate::server::inject::inject_script;
use crate::server::resolve::{ResolveError, ResolvedFile, resolve};
use axum::{
    Router,
    body::Body,
    extract::{Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use std::path::Path;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, warn};

/// Path of the reload WebSocket endpoint.
pub const RELOAD_PATH: &str = "/ws";

/// Build the application router.
///
/// `/ws` upgrades to a reload connection; every other path is resolved
/// under the served root. HTML pages get the reload script injected,
/// other files are streamed as-is with a guessed content type.
pub fn build_router(ctx: SharedContext) -> Router {
    Router::new()
        .route(RELOAD_PATH, get(ws_handler))
        .fallback(serve_path)
        .layer(TraceLayer::new_for_http())
        .with_state(ctx)
}

async fn serve_path(State(ctx): State<SharedContext>, request: Request) -> Response {
    let path = request.uri().path().to_owned();

    let file = match resolve(ctx.root(), &path) {
        Ok(file) => file,
        Err(e) if e.is_not_found() => {
            if matches!(e, ResolveError::OutsideRoot) {
                warn!("Rejected path outside root: {}", path);
            } else {
                debug!("Not found: {}", path);
            }
            return not_found();
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to resolve path");
            return internal_error();
        }
    };

    if file.is_html() {
        serve_html(file.path(), ctx.reload_script()).await
    } else {
        serve_static(&file, request).await
    }
}

/// Read an HTML page and inject `script`. A failed read is a 500.
async fn serve_html(path: &Path, script: &str) -> Response {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(file = %path.display(), error = %e, "Failed to read HTML file");
            return internal_error();
        }
    };

    let body = inject_script(&bytes, script).into_owned();

    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        body,
    )
        .into_response()
}

async fn serve_static(file: &ResolvedFile, request: Request) -> Response {
    match ServeFile::new(file.path()).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "404 page not found").into_response()
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_serve_html_injects_script() {
        let temp = TempDir::new().unwrap();
        let page = temp.path().join("index.html");
        std::fs::write(&page, "<html><head></head></html>").unwrap();

        let response = serve_html(&page, "<script>r</script>").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], b"<html><head><script>r</script></head></html>");
    }

    #[tokio::test]
    async fn test_serve_html_read_failure_is_500() {
        let temp = TempDir::new().unwrap();
        // Resolved earlier, gone by the time it is read.
        let page = temp.path().join("deleted.html");

        let response = serve_html(&page, "<script>r</script>").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
