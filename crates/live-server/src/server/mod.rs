//! The live-reload server.
//!
//! - [`router`]: static files with reload script injection, `/ws` upgrades
//! - [`watcher`]: native file events filtered to writes and removals
//! - [`broadcast`]: change relay, reload signal and fan-out
//! - [`registry`] / [`connection`]: the set of connected pages and their lifecycle

pub mod broadcast;
pub mod client;
pub mod connection;
pub mod context;
pub mod fs;
pub mod inject;
pub mod registry;
pub mod resolve;
pub mod router;
pub mod watcher;

#[cfg(test)]
pub(crate) mod testing;

pub use broadcast::{FanOutReport, ReloadSignal, fan_out, relay_changes};
pub use client::{ClientId, RELOAD_MESSAGE, ReloadClient, WsClient};
pub use connection::{CloseReason, Connection, ConnectionState};
pub use context::{ServerContext, SharedContext};
pub use fs::collect_dirs;
pub use inject::{RELOAD_SCRIPT, inject_script};
pub use registry::ConnectionRegistry;
pub use resolve::{INDEX_DOCUMENT, ResolveError, ResolvedFile, resolve};
pub use router::{RELOAD_PATH, build_router};
pub use watcher::{ChangeDetector, ChangeEvent, ChangeKind, WatchOptions};
