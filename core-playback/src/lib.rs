//! # Playback Session
//!
//! Client-side playback state: what is playing, what plays next, and what
//! was played recently.
//!
//! ## Overview
//!
//! - [`PlaybackQueue`] - FIFO of tracks waiting to play
//! - [`HistoryLedger`] - recent plays, deduplicated and capped, mirrored to a
//!   settings slot
//! - [`PlayerSession`] - the `Idle`/`Playing` state machine tying both
//!   together
//!
//! Nothing here returns an error to the caller. Storage failures are logged
//! and the session carries on with its in-memory state.
//!
//! ## Usage
//!
//! ```ignore
//! use core_playback::{HistoryLedger, PlayerSession};
//! use core_runtime::config::HistoryConfig;
//!
//! let ledger = HistoryLedger::new(settings_store, HistoryConfig::default());
//! let mut session = PlayerSession::new(ledger).with_events(event_bus);
//! session.restore().await;
//! session.play(track).await;
//! ```

pub mod error;
pub mod history;
pub mod queue;
pub mod session;

pub use error::{PlaybackError, Result};
pub use history::HistoryLedger;
pub use queue::PlaybackQueue;
pub use session::{PlayerSession, PlayerState};
