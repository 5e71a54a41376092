//! Change detection over the set of watched directories.
//!
//! Each directory is watched non-recursively; the caller passes the full
//! list produced by [`crate::server::fs::collect_dirs`]. Only content writes
//! and removals count as changes. Creates, renames, attribute changes and
//! access events are ignored.

use crate::error::{CliError, Result};
use futures_util::Stream;
use notify::event::{CreateKind, ModifyKind};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Room for native events between the watcher thread and the consumer.
const EVENT_BUFFER: usize = 256;

/// What happened to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Content was written
    Write,
    /// The file was removed
    Remove,
}

/// A relevant file change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    kind: ChangeKind,
    path: Option<PathBuf>,
}

impl ChangeEvent {
    pub fn new(kind: ChangeKind, path: Option<PathBuf>) -> Self {
        Self { kind, path }
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    /// Path reported by the platform, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Map a native event to a change, if it is one we care about.
    pub fn from_event(event: &Event) -> Option<Self> {
        let kind = match event.kind {
            EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any) => {
                ChangeKind::Write
            }
            EventKind::Remove(_) => ChangeKind::Remove,
            _ => return None,
        };

        Some(Self::new(kind, event.paths.first().cloned()))
    }
}

impl fmt::Display for ChangeEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self.kind {
            ChangeKind::Write => "write",
            ChangeKind::Remove => "remove",
        };
        match &self.path {
            Some(path) => write!(f, "{} ({})", path.display(), verb),
            None => write!(f, "<unknown> ({})", verb),
        }
    }
}

/// Options for [`ChangeDetector`].
#[derive(Debug, Clone, Copy, Default)]
pub struct WatchOptions {
    /// Register directories created after startup as they appear
    pub watch_new_dirs: bool,
}

/// Native file watcher turned into a stream of [`ChangeEvent`]s.
pub struct ChangeDetector {
    watcher: RecommendedWatcher,
    events: mpsc::Receiver<notify::Result<Event>>,
    watched: Vec<PathBuf>,
    options: WatchOptions,
}

impl ChangeDetector {
    /// Watch every directory in `dirs`.
    ///
    /// # Errors
    ///
    /// Fails if the platform watcher cannot be created or any directory
    /// cannot be registered (missing, unreadable, watch limit reached).
    pub fn new(dirs: &[PathBuf], options: WatchOptions) -> Result<Self> {
        let (tx, events) = mpsc::channel(EVENT_BUFFER);

        // Runs on the watcher's own thread, never inside the runtime.
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let _ = tx.blocking_send(res);
        })?;

        for dir in dirs {
            watcher
                .watch(dir, RecursiveMode::NonRecursive)
                .map_err(|source| CliError::WatchPath {
                    path: dir.clone(),
                    source,
                })?;
            debug!(dir = %dir.display(), "Watching directory");
        }

        info!(count = dirs.len(), "Watching directories");

        Ok(Self {
            watcher,
            events,
            watched: dirs.to_vec(),
            options,
        })
    }

    /// Directories registered at startup.
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Consume the detector as an endless stream of changes.
    ///
    /// Watcher errors are logged and skipped. Dropping the stream stops
    /// watching.
    pub fn into_stream(self) -> impl Stream<Item = ChangeEvent> + Send {
        let Self {
            mut watcher,
            mut events,
            options,
            ..
        } = self;

        async_stream::stream! {
            while let Some(res) = events.recv().await {
                match res {
                    Ok(event) => {
                        if options.watch_new_dirs {
                            watch_created_dirs(&mut watcher, &event);
                        }
                        if let Some(change) = ChangeEvent::from_event(&event) {
                            yield change;
                        }
                    }
                    Err(e) => warn!(error = %e, "File watcher error"),
                }
            }
        }
    }
}

fn watch_created_dirs(watcher: &mut RecommendedWatcher, event: &Event) {
    if !matches!(
        event.kind,
        EventKind::Create(CreateKind::Folder) | EventKind::Create(CreateKind::Any)
    ) {
        return;
    }

    for path in event.paths.iter().filter(|p| p.is_dir()) {
        match watcher.watch(path, RecursiveMode::NonRecursive) {
            Ok(()) => info!("Watching new directory: {}", path.display()),
            Err(e) => warn!(dir = %path.display(), error = %e, "Failed to watch new directory"),
        }
    }
}
