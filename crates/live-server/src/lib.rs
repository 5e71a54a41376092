//! live-server - a development web server with live reloading.
//!
//! Serves a directory over HTTP and tells every open page to reload when a
//! file under it is written or removed.
//!
//! # Architecture
//!
//! - [`server`] - Routing, file resolution, script injection, the reload
//!   socket, the change watcher and the broadcast between them
//! - [`config`] - Settings merged from defaults, `live-server.json`,
//!   `LIVE_SERVER_*` variables and CLI flags
//! - [`cli`] / [`commands`] - Argument parsing and the serve command
//! - [`error`] - Error types with actionable messages
//! - [`logger`] - Structured logging with tracing
//! - [`ui`] - Status lines for the terminal
//!
//! # Example
//!
//! ```rust,no_run
//! use live_server::server::{ServerContext, build_router};
//!
//! # async fn run() -> live_server::Result<()> {
//! let addr = "127.0.0.1:8080".parse().unwrap();
//! let ctx = ServerContext::new("./public", addr)?.into_shared();
//! let listener = tokio::net::TcpListener::bind(addr).await?;
//! axum::serve(listener, build_router(ctx)).await?;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod server;
pub mod ui;

pub use error::{CliError, ConfigError, Result, ResultExt, SendError};
