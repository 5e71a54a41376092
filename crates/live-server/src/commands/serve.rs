//! The serve command: watch a directory and serve it with live reload.

use crate::cli::Cli;
use crate::config::{ConfigOverrides, ServerConfig};
use crate::error::{CliError, Result, ResultExt};
use crate::server::{
    ChangeDetector, ServerContext, WatchOptions, build_router, collect_dirs, relay_changes,
};
use crate::ui;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{debug, warn};

/// Pause between binding the listener and launching the browser.
const BROWSER_DELAY: Duration = Duration::from_millis(50);

/// How many watched directories to name in the startup summary.
const WATCH_SUMMARY_LIMIT: usize = 5;

/// Execute the serve command.
///
/// # Errors
///
/// Returns errors for:
/// - Invalid configuration or a missing watch directory
/// - Directory enumeration or watcher registration failures
/// - Listener bind failures
/// - The server stopping with an error
pub async fn execute(cli: Cli) -> Result<()> {
    // Step 1: Load and validate configuration
    let overrides = ConfigOverrides::from(&cli);
    let config = ServerConfig::load(&overrides, cli.config.as_deref())?;
    config.validate()?;
    let addr = config.listen_addr()?;
    debug!(?config, "Resolved configuration");

    // Step 2: Shared context
    let ctx = ServerContext::new(&config.watch_dir, addr)?.into_shared();

    // Step 3: Watch every directory that exists now
    let dirs = collect_dirs(ctx.root())?;
    let detector = ChangeDetector::new(
        &dirs,
        WatchOptions {
            watch_new_dirs: config.watch_new_dirs,
        },
    )?;
    ui::info(&format!(
        "Watching {}",
        ui::watch_summary(detector.watched(), WATCH_SUMMARY_LIMIT)
    ));

    // Step 4: Bind before announcing anything
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| CliError::Bind { addr, source })?;
    let local_addr = listener
        .local_addr()
        .context("Failed to read the listening address")?;
    ui::success(&format!(
        "Serving {} at http://{}",
        ctx.root().display(),
        display_addr(local_addr)
    ));

    // Step 5: Relay file changes to connected pages
    let relay = tokio::spawn({
        let ctx = Arc::clone(&ctx);
        let debounce = config.debounce();
        async move {
            relay_changes(detector.into_stream(), ctx.registry(), ctx.signal(), debounce).await;
        }
    });

    // Step 6: Serve until Ctrl+C
    let app = build_router(Arc::clone(&ctx));
    let shutdown_ctx = Arc::clone(&ctx);
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal().await;
                ui::info("Shutting down...");
                let closed = shutdown_ctx.close_all().await;
                debug!(closed, "Closed reload connections");
            })
            .await
    });

    // Step 7: Open the browser once the listener is up
    if config.browser {
        tokio::time::sleep(BROWSER_DELAY).await;
        open_browser(&browser_url(local_addr, config.open_file.as_deref()));
    }

    ui::info("Press Ctrl+C to stop");

    let result = server.await;
    relay.abort();

    match result {
        Ok(Ok(())) => {
            ui::success("Server stopped");
            Ok(())
        }
        Ok(Err(e)) => Err(CliError::Server(e.to_string())),
        Err(e) => Err(CliError::Server(format!("server task failed: {}", e))),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

/// Host part for URLs shown to the user; wildcard and loopback binds print as localhost.
fn display_addr(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() || addr.ip().is_loopback() {
        format!("localhost:{}", addr.port())
    } else {
        addr.to_string()
    }
}

/// URL opened in the browser: the server root, or `open_file` under it.
///
/// `open_file` has already been validated as a relative path.
fn browser_url(addr: SocketAddr, open_file: Option<&str>) -> String {
    format!("http://{}/{}", display_addr(addr), open_file.unwrap_or(""))
}

fn open_browser(url: &str) {
    use std::process::Command;

    let result = if cfg!(target_os = "macos") {
        Command::new("open").arg(url).spawn()
    } else if cfg!(target_os = "windows") {
        Command::new("cmd").args(["/C", "start", url]).spawn()
    } else {
        Command::new("xdg-open").arg(url).spawn()
    };

    match result {
        Ok(_) => ui::info(&format!("Opened browser at {}", url)),
        Err(e) => ui::warning(&format!("Failed to open browser: {}", e)),
    }
}
