//! In-memory reload client for unit tests.

use crate::error::SendError;
use crate::server::client::{ClientId, ReloadClient};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    Deliver,
    Disconnected,
    Broken,
}

#[derive(Debug, Clone)]
pub struct MockClient {
    id: ClientId,
    behavior: Behavior,
    state: Arc<MockState>,
}

#[derive(Debug, Default)]
struct MockState {
    sent: AtomicUsize,
    closes: AtomicUsize,
    closed: AtomicBool,
}

impl MockClient {
    pub fn new() -> Self {
        Self::with_behavior(Behavior::Deliver)
    }

    pub fn with_behavior(behavior: Behavior) -> Self {
        Self {
            id: ClientId::next(),
            behavior,
            state: Arc::default(),
        }
    }

    pub fn sent(&self) -> usize {
        self.state.sent.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }

    pub fn close_calls(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReloadClient for MockClient {
    fn id(&self) -> ClientId {
        self.id
    }

    async fn send_reload(&self) -> Result<(), SendError> {
        match self.behavior {
            Behavior::Deliver => {
                self.state.sent.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
            Behavior::Disconnected => Err(SendError::Disconnected),
            Behavior::Broken => Err(SendError::Transport("connection reset".into())),
        }
    }

    async fn close(&self) {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        self.state.closed.store(true, Ordering::SeqCst);
    }
}
