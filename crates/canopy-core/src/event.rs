//! Explorer change notifications.
//!
//! ## Learning: Observer Pattern in Rust
//!
//! Instead of storing callbacks, the explorer broadcasts event values over a
//! `tokio::sync::broadcast` channel. Each subscriber gets its own copy, and a
//! slow subscriber never blocks the explorer.

use tokio::sync::broadcast;

/// Events emitted after a successful explorer operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorerEvent {
    /// A file was created at this path
    FileCreated(String),
    /// A folder was created at this path
    FolderCreated(String),
    /// A file's content was replaced
    ContentChanged(String),
    /// A node (and its subtree) was removed
    ItemDeleted(String),
    /// A node was renamed
    ItemRenamed { from: String, to: String },
    /// A folder was expanded or collapsed
    FolderToggled { path: String, expanded: bool },
    /// A file became the active editor
    FileOpened(String),
    /// An archive finished compressing
    ArchiveExported { entries: usize, bytes: usize },
}

/// Event bus for broadcasting explorer events.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ExplorerEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(256);
        Self { sender }
    }

    /// Emits an event to all subscribers.
    pub fn emit(&self, event: ExplorerEvent) {
        // No receivers is fine
        let _ = self.sender.send(event);
    }

    /// Subscribes to all future events.
    pub fn subscribe(&self) -> broadcast::Receiver<ExplorerEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper for consuming events in a task.
///
/// ```ignore
/// let mut handler = EventHandler::new(workbench.subscribe());
/// tokio::spawn(async move {
///     while let Some(event) = handler.next().await {
///         tracing::debug!(?event, "explorer changed");
///     }
/// });
/// ```
pub struct EventHandler {
    receiver: broadcast::Receiver<ExplorerEvent>,
}

impl EventHandler {
    /// Creates a new event handler.
    pub fn new(receiver: broadcast::Receiver<ExplorerEvent>) -> Self {
        Self { receiver }
    }

    /// Waits for the next event, skipping over lag.
    pub async fn next(&mut self) -> Option<ExplorerEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!("Event handler lagged, missed {} events", n);
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }
}
