//! Shared helpers for integration tests.

#![allow(dead_code)]

use live_server::server::{ServerContext, SharedContext, build_router};
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;

pub const INDEX_HTML: &str = "<html><head><title>Test</title></head><body>hi</body></html>";

/// A small site: index page, stylesheet, subdirectory with its own index,
/// and an empty subdirectory.
pub fn create_site() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();

    fs::write(root.join("index.html"), INDEX_HTML).unwrap();
    fs::write(root.join("style.css"), "body { color: red; }").unwrap();
    fs::create_dir_all(root.join("docs")).unwrap();
    fs::write(root.join("docs/index.html"), "<p>no head here</p>").unwrap();
    fs::create_dir_all(root.join("empty")).unwrap();

    temp
}

pub fn context_for(root: &Path) -> SharedContext {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    ServerContext::new(root, addr).unwrap().into_shared()
}

/// Run the router on an ephemeral port.
pub async fn start_server(root: &Path) -> (SharedContext, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let ctx = ServerContext::new(root, addr).unwrap().into_shared();

    let app = build_router(ctx.clone());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (ctx, addr)
}

/// Poll `condition` until it holds or `timeout` passes.
pub async fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
