//! # Host Bridge Traits
//!
//! Capability traits the core needs from its host and from the hosted backend.
//!
//! ## Overview
//!
//! This crate defines the contract between the core crates and the adapters
//! that talk to the outside world. Each trait represents a capability that the
//! core requires but that is implemented elsewhere (desktop adapters, a hosted
//! backend client, test doubles).
//!
//! ## Traits
//!
//! ### Backend
//! - [`CatalogGateway`](gateway::CatalogGateway) - Tracks, playlists and asset
//!   uploads on the hosted persistence service
//!
//! ### Local State
//! - [`SettingsStore`](storage::SettingsStore) - Named durable slots
//!   (history mirror, preferences)
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Adapters should:
//!
//! - Convert transport and service errors to `BridgeError`
//! - Report a missing remote entity as `BridgeError::NotFound` so the core can
//!   tell "absent" apart from "unreachable"
//! - Include context (URL path, entity id) in messages
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so that adapters can be shared
//! across async tasks behind an `Arc`.
//!
//! ## Example
//!
//! ```ignore
//! use bridge_traits::gateway::{CatalogGateway, TrackRecord};
//! use bridge_traits::error::Result;
//!
//! async fn newest(gateway: &dyn CatalogGateway) -> Result<Option<TrackRecord>> {
//!     Ok(gateway.fetch_tracks().await?.into_iter().next())
//! }
//! ```

pub mod error;
pub mod gateway;
pub mod storage;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use gateway::{AssetKind, CatalogGateway, NewTrackRecord, PlaylistRecord, TrackRecord};
pub use storage::SettingsStore;
pub use time::{Clock, ConsoleLogger, LogEntry, LogLevel, LoggerSink, SystemClock};
