//! Player session
//!
//! Tracks the current track and moves between tracks:
//!
//! - `play` starts any track and records it in the history
//! - `next` takes the front of the queue
//! - `previous` returns to the track played before the current one, i.e. the
//!   second history entry
//!
//! `next` and `previous` leave the history untouched and do nothing while
//! the session is idle.

use core_library::Track;
use core_runtime::events::{
    CoreEvent, EventBus, Notification, PlaybackEvent, SkipDirection,
};
use tracing::{debug, info};

use crate::history::HistoryLedger;
use crate::queue::PlaybackQueue;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlayerState {
    /// Nothing has been played yet
    #[default]
    Idle,
    Playing(Track),
}

impl PlayerState {
    pub fn current(&self) -> Option<&Track> {
        match self {
            PlayerState::Idle => None,
            PlayerState::Playing(track) => Some(track),
        }
    }

    pub fn is_playing(&self) -> bool {
        matches!(self, PlayerState::Playing(_))
    }
}

pub struct PlayerSession {
    state: PlayerState,
    queue: PlaybackQueue,
    history: HistoryLedger,
    events: Option<EventBus>,
}

impl PlayerSession {
    pub fn new(history: HistoryLedger) -> Self {
        Self {
            state: PlayerState::Idle,
            queue: PlaybackQueue::new(),
            history,
            events: None,
        }
    }

    /// Publish playback events and notifications on `bus`
    pub fn with_events(mut self, bus: EventBus) -> Self {
        self.events = Some(bus);
        self
    }

    /// Reload the persisted history. The session stays idle.
    pub async fn restore(&mut self) -> &[Track] {
        self.history.load().await
    }

    /// Start `track`, whatever the current state.
    pub async fn play(&mut self, track: Track) -> &PlayerState {
        info!(track_id = %track.id, "Now playing");

        self.history.record(track.clone()).await;
        self.emit(CoreEvent::Playback(PlaybackEvent::NowPlaying {
            track_id: track.id.clone(),
            title: track.title.clone(),
        }));
        if let Some(bus) = &self.events {
            bus.notify(Notification::success(format!("Now playing: {}", track.title)));
        }

        self.state = PlayerState::Playing(track);
        &self.state
    }

    /// Advance to the front of the queue.
    pub fn next(&mut self) -> &PlayerState {
        if !self.state.is_playing() {
            debug!("Ignoring next while idle");
            return &self.state;
        }

        if let Some(track) = self.queue.dequeue_next() {
            self.switch_to(track, SkipDirection::Next);
        }
        &self.state
    }

    /// Go back to the previously played track.
    pub fn previous(&mut self) -> &PlayerState {
        if !self.state.is_playing() {
            debug!("Ignoring previous while idle");
            return &self.state;
        }

        if let Some(track) = self.history.get(1).cloned() {
            self.switch_to(track, SkipDirection::Previous);
        }
        &self.state
    }

    pub fn enqueue(&mut self, tracks: impl IntoIterator<Item = Track>) {
        self.queue.enqueue(tracks);
        debug!(pending = self.queue.len(), "Queued tracks");
    }

    pub async fn clear_history(&mut self) {
        self.history.clear().await;
        self.emit(CoreEvent::Playback(PlaybackEvent::HistoryCleared));
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn current(&self) -> Option<&Track> {
        self.state.current()
    }

    pub fn queue(&self) -> &PlaybackQueue {
        &self.queue
    }

    pub fn history(&self) -> &[Track] {
        self.history.entries()
    }

    fn switch_to(&mut self, track: Track, direction: SkipDirection) {
        debug!(track_id = %track.id, ?direction, "Changing track");

        self.emit(CoreEvent::Playback(PlaybackEvent::TrackChanged {
            direction,
            track_id: track.id.clone(),
            title: track.title.clone(),
        }));
        self.state = PlayerState::Playing(track);
    }

    fn emit(&self, event: CoreEvent) {
        if let Some(bus) = &self.events {
            bus.emit(event).ok();
        }
    }
}
