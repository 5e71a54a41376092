//! Reload broadcasting.
//!
//! Change events do not talk to sockets directly. The relay publishes onto a
//! [`ReloadSignal`]; one connection task picks the signal up and runs a
//! [`fan_out`] pass over the registry. A publish with no waiting task is
//! kept as a single pending permit, so bursts collapse instead of queueing
//! and the watcher never blocks on slow clients.

use crate::server::client::ReloadClient;
use crate::server::registry::ConnectionRegistry;
use crate::server::watcher::ChangeEvent;
use futures_util::{Stream, StreamExt, future};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Single-slot "a reload is due" signal shared by all connection tasks.
#[derive(Debug, Default)]
pub struct ReloadSignal {
    notify: Notify,
    published: AtomicU64,
}

impl ReloadSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wake one waiting connection task, or leave a permit for the next one.
    ///
    /// Never blocks. Publishing again before the permit is taken is a no-op.
    pub fn publish(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
        self.notify.notify_one();
    }

    /// Wait for the next published reload.
    pub async fn wait(&self) {
        self.notify.notified().await;
    }

    /// Number of publishes so far.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

/// Outcome of one fan-out pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FanOutReport {
    pub delivered: usize,
    pub disconnected: usize,
    pub failed: usize,
}

impl FanOutReport {
    pub fn total(&self) -> usize {
        self.delivered + self.disconnected + self.failed
    }
}

/// Send one reload notice to every registered client, then drop them all.
///
/// Each client is removed from the registry before its send, so a client
/// is served by at most one pass and never hears from this server again.
/// Sends run concurrently; a slow client does not hold up the others.
pub async fn fan_out<C: ReloadClient>(registry: &ConnectionRegistry<C>) -> FanOutReport {
    let mut targets = Vec::new();
    registry.for_each(|client| {
        if let Some(client) = registry.remove(client.id()) {
            targets.push(client);
        }
    });

    let outcomes = future::join_all(targets.into_iter().map(|client| async move {
        let result = client.send_reload().await;
        client.close().await;
        (client.id(), result)
    }))
    .await;

    let mut report = FanOutReport::default();
    for (id, result) in outcomes {
        match result {
            Ok(()) => {
                report.delivered += 1;
                debug!(client = %id, "Reload sent");
            }
            Err(e) if e.is_disconnect() => {
                report.disconnected += 1;
                debug!(client = %id, "Client left before reload");
            }
            Err(e) => {
                report.failed += 1;
                warn!(client = %id, error = %e, "Failed to send reload");
            }
        }
    }

    report
}

/// Turn change events into reload publishes until `changes` ends.
///
/// A burst starts at its first event and lasts `debounce`; everything seen
/// inside that window becomes one publish. The window is not extended by
/// later events, so a file that never stops changing still triggers a
/// reload every `debounce`. Changes seen while nobody is connected are
/// dropped.
pub async fn relay_changes<S, C>(
    changes: S,
    registry: &ConnectionRegistry<C>,
    signal: &ReloadSignal,
    debounce: Duration,
) where
    S: Stream<Item = ChangeEvent>,
    C: ReloadClient,
{
    let mut changes = std::pin::pin!(changes);

    while let Some(change) = changes.next().await {
        info!("Modified file: {}", change);

        let mut burst = 1usize;
        let mut ended = false;
        if !debounce.is_zero() {
            let deadline = Instant::now() + debounce;
            loop {
                match tokio::time::timeout_at(deadline, changes.next()).await {
                    Ok(Some(change)) => {
                        burst += 1;
                        debug!("Modified file: {}", change);
                    }
                    Ok(None) => {
                        ended = true;
                        break;
                    }
                    Err(_) => break,
                }
            }
        }

        if registry.is_empty() {
            debug!(events = burst, "No clients connected, skipping reload");
        } else {
            debug!(events = burst, clients = registry.len(), "Publishing reload");
            signal.publish();
        }

        if ended {
            break;
        }
    }
}
