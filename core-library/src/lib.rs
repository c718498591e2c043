//! # Library Module
//!
//! Catalog and playlist logic on top of the
//! [`CatalogGateway`](bridge_traits::gateway::CatalogGateway).
//!
//! ## Overview
//!
//! - [`models`] - `Track`, `Playlist` and upload forms, with the mapping from
//!   backend rows
//! - [`filter`] - Pure catalog filtering by query, type and language
//! - [`catalog`] - Loading the catalog and the admin upload/delete path
//! - [`playlists`] - Creating playlists and editing their track lists
//!
//! Privileged operations take an explicit [`AuthState`](core_auth::AuthState)
//! rather than consulting any global flag.

pub mod catalog;
pub mod error;
pub mod filter;
pub mod models;
pub mod playlists;

pub use catalog::{CatalogService, LoadedCatalog};
pub use error::{ErrorKind, LibraryError, Result};
pub use filter::{filter_tracks, CatalogFilter, KindFilter, LanguageFilter};
pub use models::{AssetPayload, Playlist, Track, TrackKind, TrackUpload, SUGGESTED_LANGUAGES};
pub use playlists::{PlaylistStore, Removal};
