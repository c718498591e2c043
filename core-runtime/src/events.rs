//! # Event Bus System
//!
//! Typed broadcast events built on `tokio::sync::broadcast`.
//!
//! ## Overview
//!
//! - **Event Types**: one enum per domain, wrapped by [`CoreEvent`]
//! - **EventBus**: cloneable broadcast sender shared by the core crates
//! - **EventStream**: receiver wrapper with an optional filter
//!
//! User-facing toasts travel on the same bus as
//! [`CoreEvent::Notification`]. Delivery is fire-and-forget: emitting with no
//! subscribers is not an error for callers that ignore the result.
//!
//! ```text
//! ┌────────────────┐  emit   ┌───────────┐  subscribe  ┌────────────┐
//! │ Player session ├────────>│           ├────────────>│ UI toasts  │
//! └────────────────┘         │ EventBus  │             └────────────┘
//! ┌────────────────┐  emit   │           │  subscribe  ┌────────────┐
//! │ Playlist store ├────────>│           ├────────────>│ Telemetry  │
//! └────────────────┘         └───────────┘             └────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use core_runtime::events::{CoreEvent, EventBus, Notification};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let event_bus = EventBus::new(100);
//! let mut subscriber = event_bus.subscribe();
//!
//! event_bus
//!     .emit(CoreEvent::Notification(Notification::success("Playlist created!")))
//!     .ok();
//!
//! let event = subscriber.recv().await.unwrap();
//! assert_eq!(event.description(), "Notification");
//! # }
//! ```
//!
//! ## Error Handling
//!
//! - **`RecvError::Lagged(n)`**: the subscriber missed `n` events and can keep
//!   receiving.
//! - **`RecvError::Closed`**: every sender was dropped; treat as shutdown.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for the event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 100;

// ============================================================================
// Core Event Types
// ============================================================================

/// Top-level event enum encompassing all event categories.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "payload")]
pub enum CoreEvent {
    Auth(AuthEvent),
    Library(LibraryEvent),
    Playback(PlaybackEvent),
    /// A message meant for the user
    Notification(Notification),
}

impl CoreEvent {
    /// Returns a human-readable description of the event.
    pub fn description(&self) -> &str {
        match self {
            CoreEvent::Auth(e) => e.description(),
            CoreEvent::Library(e) => e.description(),
            CoreEvent::Playback(e) => e.description(),
            CoreEvent::Notification(_) => "Notification",
        }
    }

    /// Returns the severity level of the event.
    pub fn severity(&self) -> EventSeverity {
        match self {
            CoreEvent::Notification(n) => match n.level {
                NotificationLevel::Error => EventSeverity::Error,
                NotificationLevel::Success | NotificationLevel::Info => EventSeverity::Info,
            },
            CoreEvent::Auth(_) => EventSeverity::Info,
            CoreEvent::Library(LibraryEvent::TrackDeleted { .. }) => EventSeverity::Warning,
            CoreEvent::Library(LibraryEvent::CatalogLoaded { .. }) => EventSeverity::Debug,
            CoreEvent::Library(_) => EventSeverity::Info,
            CoreEvent::Playback(_) => EventSeverity::Debug,
        }
    }
}

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    Debug,
    Info,
    Warning,
    Error,
}

// ============================================================================
// Authentication Events
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum AuthEvent {
    SignedIn {
        user_id: String,
        /// Whether the principal holds the admin role
        is_admin: bool,
    },
    SignedOut {
        user_id: String,
    },
}

impl AuthEvent {
    pub fn description(&self) -> &str {
        match self {
            AuthEvent::SignedIn { .. } => "User signed in",
            AuthEvent::SignedOut { .. } => "User signed out",
        }
    }
}

// ============================================================================
// Library Events
// ============================================================================

/// Catalog and playlist changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum LibraryEvent {
    CatalogLoaded {
        track_count: usize,
        /// Rows dropped because they failed validation
        skipped: usize,
    },
    TrackUploaded {
        track_id: String,
        title: String,
    },
    TrackDeleted {
        track_id: String,
    },
    PlaylistCreated {
        playlist_id: String,
        name: String,
    },
    TrackAddedToPlaylist {
        playlist_id: String,
        track_id: String,
    },
    TrackRemovedFromPlaylist {
        playlist_id: String,
        track_id: String,
    },
}

impl LibraryEvent {
    pub fn description(&self) -> &str {
        match self {
            LibraryEvent::CatalogLoaded { .. } => "Catalog loaded",
            LibraryEvent::TrackUploaded { .. } => "Track uploaded",
            LibraryEvent::TrackDeleted { .. } => "Track deleted",
            LibraryEvent::PlaylistCreated { .. } => "Playlist created",
            LibraryEvent::TrackAddedToPlaylist { .. } => "Track added to playlist",
            LibraryEvent::TrackRemovedFromPlaylist { .. } => "Track removed from playlist",
        }
    }
}

// ============================================================================
// Playback Events
// ============================================================================

/// Which way the session moved.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SkipDirection {
    Next,
    Previous,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event")]
pub enum PlaybackEvent {
    /// A track was explicitly started
    NowPlaying { track_id: String, title: String },
    /// The session moved to another track via next/previous
    TrackChanged {
        direction: SkipDirection,
        track_id: String,
        title: String,
    },
    HistoryCleared,
}

impl PlaybackEvent {
    pub fn description(&self) -> &str {
        match self {
            PlaybackEvent::NowPlaying { .. } => "Playback started",
            PlaybackEvent::TrackChanged {
                direction: SkipDirection::Next,
                ..
            } => "Skipped to next track",
            PlaybackEvent::TrackChanged {
                direction: SkipDirection::Previous,
                ..
            } => "Returned to previous track",
            PlaybackEvent::HistoryCleared => "History cleared",
        }
    }
}

// ============================================================================
// Notifications
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A short message for the user, typically rendered as a toast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

// ============================================================================
// Event Bus
// ============================================================================

/// Central event bus for publishing and subscribing to events.
///
/// Clones share the same channel. Each `subscribe()` creates an independent
/// receiver; slow subscribers get `RecvError::Lagged` rather than blocking
/// publishers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CoreEvent>,
}

impl EventBus {
    /// Creates a new event bus buffering up to `capacity` events per
    /// subscriber.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an
    /// error if there are none.
    pub fn emit(&self, event: CoreEvent) -> Result<usize, SendError<CoreEvent>> {
        self.sender.send(event)
    }

    /// Shorthand for emitting a [`CoreEvent::Notification`], ignoring the
    /// absence of subscribers.
    pub fn notify(&self, notification: Notification) {
        self.emit(CoreEvent::Notification(notification)).ok();
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<CoreEvent> {
        self.sender.subscribe()
    }

    /// Subscribe through an [`EventStream`].
    pub fn stream(&self) -> EventStream {
        EventStream::new(self.subscribe())
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter = Box<dyn Fn(&CoreEvent) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```rust
/// use core_runtime::events::{CoreEvent, EventBus};
///
/// let event_bus = EventBus::new(100);
/// let toasts = event_bus
///     .stream()
///     .filter(|event| matches!(event, CoreEvent::Notification(_)));
/// ```
pub struct EventStream {
    receiver: Receiver<CoreEvent>,
    filter: Option<EventFilter>,
}

impl EventStream {
    pub fn new(receiver: Receiver<CoreEvent>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&CoreEvent) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    fn accepts(&self, event: &CoreEvent) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n`
    /// events and `RecvError::Closed` once all senders are gone.
    pub async fn recv(&mut self) -> Result<CoreEvent, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without blocking.
    ///
    /// Returns `None` if no matching event is currently available.
    pub fn try_recv(&mut self) -> Option<Result<CoreEvent, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl fmt::Debug for EventStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now_playing(track_id: &str) -> CoreEvent {
        CoreEvent::Playback(PlaybackEvent::NowPlaying {
            track_id: track_id.to_string(),
            title: format!("Title {}", track_id),
        })
    }

    #[tokio::test]
    async fn test_event_bus_subscription() {
        let bus = EventBus::new(10);
        assert_eq!(bus.subscriber_count(), 0);

        let _sub1 = bus.subscribe();
        let _sub2 = bus.stream();
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[tokio::test]
    async fn test_event_emission_no_subscribers() {
        let bus = EventBus::new(10);
        assert!(bus.emit(now_playing("t1")).is_err());

        // notify swallows the missing-subscriber error
        bus.notify(Notification::info("nobody listening"));
    }

    #[tokio::test]
    async fn test_multiple_subscribers_receive_same_event() {
        let bus = EventBus::new(10);
        let mut sub1 = bus.subscribe();
        let mut sub2 = bus.subscribe();

        let event = CoreEvent::Library(LibraryEvent::PlaylistCreated {
            playlist_id: "p1".to_string(),
            name: "Favorites".to_string(),
        });
        assert_eq!(bus.emit(event.clone()).unwrap(), 2);

        assert_eq!(sub1.recv().await.unwrap(), event);
        assert_eq!(sub2.recv().await.unwrap(), event);
    }

    #[tokio::test]
    async fn test_event_stream_with_filter() {
        let bus = EventBus::new(10);
        let mut toasts = bus
            .stream()
            .filter(|event| matches!(event, CoreEvent::Notification(_)));

        bus.emit(now_playing("t1")).ok();
        bus.notify(Notification::success("Now playing: Title t1"));

        let received = toasts.recv().await.unwrap();
        assert_eq!(
            received,
            CoreEvent::Notification(Notification::success("Now playing: Title t1"))
        );
    }

    #[tokio::test]
    async fn test_lagged_subscriber() {
        let bus = EventBus::new(2);
        let mut sub = bus.subscribe();

        for i in 0..5 {
            bus.emit(now_playing(&format!("t{}", i))).ok();
        }

        assert!(matches!(sub.recv().await, Err(RecvError::Lagged(_))));
    }

    #[test]
    fn test_event_severity() {
        let error = CoreEvent::Notification(Notification::error("Failed to create playlist"));
        assert_eq!(error.severity(), EventSeverity::Error);

        let success = CoreEvent::Notification(Notification::success("Song added to playlist!"));
        assert_eq!(success.severity(), EventSeverity::Info);

        let deleted = CoreEvent::Library(LibraryEvent::TrackDeleted {
            track_id: "t1".to_string(),
        });
        assert_eq!(deleted.severity(), EventSeverity::Warning);

        assert_eq!(now_playing("t1").severity(), EventSeverity::Debug);
    }

    #[test]
    fn test_event_description() {
        let event = CoreEvent::Playback(PlaybackEvent::TrackChanged {
            direction: SkipDirection::Previous,
            track_id: "t1".to_string(),
            title: "Title".to_string(),
        });
        assert_eq!(event.description(), "Returned to previous track");

        let event = CoreEvent::Auth(AuthEvent::SignedOut {
            user_id: "u1".to_string(),
        });
        assert_eq!(event.description(), "User signed out");
    }

    #[tokio::test]
    async fn test_concurrent_publishers() {
        let bus = EventBus::new(100);
        let mut stream = bus.stream();

        let bus1 = bus.clone();
        let bus2 = bus.clone();

        let handle1 = tokio::spawn(async move {
            for i in 0..10 {
                bus1.emit(now_playing(&format!("a{}", i))).ok();
            }
        });

        let handle2 = tokio::spawn(async move {
            for i in 0..10 {
                bus2.notify(Notification::info(format!("message {}", i)));
            }
        });

        handle1.await.ok();
        handle2.await.ok();

        let mut count = 0;
        while let Some(Ok(_)) = stream.try_recv() {
            count += 1;
        }
        assert_eq!(count, 20);
    }

    #[test]
    fn test_event_serialization() {
        let event = CoreEvent::Notification(Notification::error("Song already in this playlist"));

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "Notification");
        assert_eq!(json["payload"]["level"], "error");

        let deserialized: CoreEvent = serde_json::from_value(json).unwrap();
        assert_eq!(deserialized, event);
    }

    #[test]
    fn test_try_recv_empty() {
        let bus = EventBus::new(10);
        let mut stream = bus.stream();
        assert!(stream.try_recv().is_none());
    }
}
