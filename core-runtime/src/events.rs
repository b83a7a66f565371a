//! # Event Bus System
//!
//! Provides an event-driven architecture for the Field Photo Core using
//! `tokio::sync::broadcast`. Presentation layers subscribe to typed events
//! instead of holding callbacks into the domain state.
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, NavEvent};
//!
//! let event_bus = EventBus::new(100);
//! let mut stream = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Nav(NavEvent::AutoSelected {
//!         names: vec!["בקרת ביצוע".to_string()],
//!     }))
//!     .ok();
//! ```
//!
//! ## Error Handling
//!
//! The bus uses `tokio::sync::broadcast`:
//! - `RecvError::Lagged(n)` - subscriber missed `n` events; non-fatal.
//! - `RecvError::Closed` - all senders dropped; treat as shutdown.
//!
//! Emitting with no subscribers is not an error worth surfacing; callers
//! `.ok()` the result.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// Re-export commonly used types
pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    /// Navigation-related events
    Nav(NavEvent),
    /// Upload-related events
    Upload(UploadEvent),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Nav(e) => e.description(),
            CoreEvent::Upload(e) => e.description(),
        }
    }
}

/// Events emitted by the navigation state machine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum NavEvent {
    /// One or more folders were chosen automatically after a project
    /// selection.
    AutoSelected {
        /// Names of the auto-selected folders, in selection order.
        names: Vec<String>,
    },
    /// The machine redirected into a photos folder found among the children.
    RedirectedToPhotos {
        /// Id of the photos folder that became the current location.
        folder_id: String,
    },
    /// A load failed; the breadcrumb stack is preserved and retry is
    /// available.
    LoadFailed {
        /// Human-readable error message.
        message: String,
    },
    /// A saved location was restored from the local cache.
    LocationRestored {
        /// Depth of the restored breadcrumb stack.
        depth: usize,
    },
    /// A saved location was rejected by the remote; navigation fell back to
    /// the root.
    LocationRestoreRejected,
}

impl NavEvent {
    fn description(&self) -> &str {
        match self {
            NavEvent::AutoSelected { .. } => "Folders auto-selected",
            NavEvent::RedirectedToPhotos { .. } => "Redirected into photos folder",
            NavEvent::LoadFailed { .. } => "Folder load failed",
            NavEvent::LocationRestored { .. } => "Saved location restored",
            NavEvent::LocationRestoreRejected => "Saved location rejected",
        }
    }
}

/// Events emitted by the intake queue and upload orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum UploadEvent {
    /// A queued photo changed status.
    PhotoStatusChanged {
        /// Position of the photo in the intake queue.
        index: usize,
        /// New status, as its wire string (`pending`, `converting`,
        /// `uploading`, `done`, `error`).
        status: String,
    },
    /// A batch upload started.
    BatchStarted {
        /// Number of photos in the batch.
        total: usize,
    },
    /// A batch upload finished; every item settled.
    BatchCompleted {
        succeeded: usize,
        failed: usize,
        total: usize,
    },
}

impl UploadEvent {
    fn description(&self) -> &str {
        match self {
            UploadEvent::PhotoStatusChanged { .. } => "Photo status changed",
            UploadEvent::BatchStarted { .. } => "Upload batch started",
            UploadEvent::BatchCompleted { .. } => "Upload batch completed",
        }
    }
}

/// Central broadcast channel for publishing core events.
///
/// Cloning is cheap; clones share the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Create a new event bus with the given buffer size.
    pub fn new(buffer_size: usize) -> Self {
        let (sender, _) = broadcast::channel(buffer_size);
        Self { sender }
    }

    /// Publish an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error when there are none; callers typically ignore both.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Subscribe to all future events.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_emit_and_receive() {
        let bus = EventBus::new(10);
        let mut stream = bus.subscribe();

        bus.emit(CoreEvent::Upload(UploadEvent::BatchStarted { total: 3 }))
            .unwrap();

        let event = stream.recv().await.unwrap();
        assert_eq!(
            event,
            CoreEvent::Upload(UploadEvent::BatchStarted { total: 3 })
        );
    }

    #[tokio::test]
    async fn test_emit_without_subscribers_is_an_ignorable_error() {
        let bus = EventBus::new(10);
        assert!(bus
            .emit(CoreEvent::Nav(NavEvent::LocationRestoreRejected))
            .is_err());
    }

    #[tokio::test]
    async fn test_multiple_subscribers_each_receive() {
        let bus = EventBus::new(10);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        assert_eq!(bus.subscriber_count(), 2);

        bus.emit(CoreEvent::Nav(NavEvent::AutoSelected {
            names: vec!["דוחות 2024".to_string()],
        }))
        .unwrap();

        assert!(a.recv().await.is_ok());
        assert!(b.recv().await.is_ok());
    }

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = CoreEvent::Upload(UploadEvent::BatchCompleted {
            succeeded: 2,
            failed: 1,
            total: 3,
        });

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains(r#""type":"Upload""#));
        assert!(json.contains(r#""event":"BatchCompleted""#));
    }
}
