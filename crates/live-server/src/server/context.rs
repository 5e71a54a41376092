//! Shared state handed to every request handler and connection task.

use crate::error::{CliError, Result};
use crate::server::broadcast::ReloadSignal;
use crate::server::client::{ReloadClient, WsClient};
use crate::server::inject::RELOAD_SCRIPT;
use crate::server::registry::ConnectionRegistry;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Shared handle to the server context.
pub type SharedContext = Arc<ServerContext>;

/// Process-wide server state.
///
/// Created once at startup and never replaced.
#[derive(Debug)]
pub struct ServerContext {
    root: PathBuf,
    addr: SocketAddr,
    registry: ConnectionRegistry<WsClient>,
    signal: ReloadSignal,
    reload_script: &'static str,
}

impl ServerContext {
    /// Build a context serving `root`.
    ///
    /// # Errors
    ///
    /// Returns [`CliError::DirectoryNotFound`] if `root` is not an existing
    /// directory.
    pub fn new(root: impl AsRef<Path>, addr: SocketAddr) -> Result<Self> {
        let root = root.as_ref();
        let root = root
            .canonicalize()
            .ok()
            .filter(|p| p.is_dir())
            .ok_or_else(|| CliError::DirectoryNotFound(root.to_path_buf()))?;

        Ok(Self {
            root,
            addr,
            registry: ConnectionRegistry::new(),
            signal: ReloadSignal::new(),
            reload_script: RELOAD_SCRIPT,
        })
    }

    pub fn into_shared(self) -> SharedContext {
        Arc::new(self)
    }

    /// Canonical served directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn registry(&self) -> &ConnectionRegistry<WsClient> {
        &self.registry
    }

    pub fn signal(&self) -> &ReloadSignal {
        &self.signal
    }

    pub fn reload_script(&self) -> &str {
        self.reload_script
    }

    pub fn client_count(&self) -> usize {
        self.registry.len()
    }

    /// Close every connected client. Used on shutdown.
    pub async fn close_all(&self) -> usize {
        let clients = self.registry.drain();
        let count = clients.len();
        for client in clients {
            client.close().await;
        }
        count
    }
}
