//! Registry of connected reload clients.

use crate::server::client::{ClientId, ReloadClient};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Thread-safe set of live clients, keyed by [`ClientId`].
///
/// Every operation takes the lock briefly; callbacks and sends always run
/// on a snapshot after the lock is released.
#[derive(Debug)]
pub struct ConnectionRegistry<C> {
    clients: RwLock<HashMap<ClientId, C>>,
}

impl<C> Default for ConnectionRegistry<C> {
    fn default() -> Self {
        Self {
            clients: RwLock::new(HashMap::new()),
        }
    }
}

impl<C: ReloadClient> ConnectionRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a client. Returns `false` if it was already registered.
    pub fn register(&self, client: C) -> bool {
        let mut clients = self.clients.write();
        let id = client.id();
        if clients.contains_key(&id) {
            return false;
        }
        clients.insert(id, client);
        true
    }

    /// Remove a client, returning it if it was still registered.
    ///
    /// Removing an absent client is a no-op.
    pub fn remove(&self, id: ClientId) -> Option<C> {
        self.clients.write().remove(&id)
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.clients.read().contains_key(&id)
    }

    /// Visit every client registered at the time of the call.
    ///
    /// `f` may register or remove clients; those changes do not affect the
    /// current visit.
    pub fn for_each(&self, mut f: impl FnMut(&C)) {
        for client in self.snapshot() {
            f(&client);
        }
    }

    /// Clients currently registered, ordered by id.
    pub fn snapshot(&self) -> Vec<C> {
        let mut clients: Vec<C> = self.clients.read().values().cloned().collect();
        clients.sort_by_key(|c| c.id());
        clients
    }

    /// Remove and return every client.
    pub fn drain(&self) -> Vec<C> {
        let mut clients: Vec<C> = self.clients.write().drain().map(|(_, c)| c).collect();
        clients.sort_by_key(|c| c.id());
        clients
    }

    pub fn len(&self) -> usize {
        self.clients.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.read().is_empty()
    }
}
