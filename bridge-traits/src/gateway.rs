//! Catalog/Playlist Gateway
//!
//! Boundary to the hosted persistence, auth and object-storage service.
//!
//! The gateway speaks in the backend's row shapes ([`TrackRecord`],
//! [`PlaylistRecord`]). Converting rows into domain models, and validating
//! them on the way in, is the job of `core-library`; adapters only move rows.
//!
//! ## Ordering
//!
//! - [`CatalogGateway::fetch_tracks`] returns tracks newest first by
//!   `created_at`.
//! - [`CatalogGateway::fetch_playlists`] returns playlists newest first.
//!
//! ## Authorization
//!
//! The gateway does not decide who may delete or upload. Callers check the
//! principal's role before invoking privileged operations.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;

/// Track row as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub id: String,
    pub song_name: String,
    pub artist_name: String,
    pub movie_name: String,
    /// Either `"Song"` or `"BGM"`; validated by the mapping layer.
    #[serde(rename = "type")]
    pub kind: String,
    pub language: String,
    pub image_url: String,
    pub audio_url: String,
    pub created_at: DateTime<Utc>,
    /// Principal that uploaded the track
    #[serde(default)]
    pub uploaded_by: Option<String>,
}

/// Fields for inserting a new track row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTrackRecord {
    pub song_name: String,
    pub artist_name: String,
    pub movie_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub language: String,
    pub image_url: String,
    pub audio_url: String,
    pub uploaded_by: String,
}

/// Playlist row as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistRecord {
    pub id: String,
    pub name: String,
    /// Ordered track ids
    #[serde(default)]
    pub song_ids: Vec<String>,
    /// Owning principal
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}

/// Binary asset categories accepted by the object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Image,
    Audio,
}

impl AssetKind {
    /// Storage bucket holding assets of this kind
    pub fn bucket(&self) -> &'static str {
        match self {
            AssetKind::Image => "song-images",
            AssetKind::Audio => "song-audio",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetKind::Image => write!(f, "image"),
            AssetKind::Audio => write!(f, "audio"),
        }
    }
}

/// Gateway to the hosted catalog/playlist backend.
///
/// # Errors
///
/// Implementations return `BridgeError::NotFound` when an addressed entity
/// does not exist and any other `BridgeError` variant for transport or
/// service failures.
///
/// # Example
///
/// ```ignore
/// use bridge_traits::gateway::CatalogGateway;
///
/// async fn rename_free_add(gateway: &dyn CatalogGateway, playlist_id: &str) -> Result<()> {
///     let playlist = gateway.fetch_playlist(playlist_id).await?.expect("exists");
///     let mut ids = playlist.song_ids.clone();
///     ids.push("track-1".to_string());
///     gateway.update_playlist_track_ids(playlist_id, &ids).await
/// }
/// ```
#[async_trait]
pub trait CatalogGateway: Send + Sync {
    /// All tracks, newest first
    async fn fetch_tracks(&self) -> Result<Vec<TrackRecord>>;

    /// Tracks with the given ids, in no particular order. Unknown ids are
    /// skipped rather than reported.
    async fn fetch_tracks_by_ids(&self, ids: &[String]) -> Result<Vec<TrackRecord>>;

    /// A single playlist, or `None` if it does not exist
    async fn fetch_playlist(&self, playlist_id: &str) -> Result<Option<PlaylistRecord>>;

    /// Playlists owned by `owner_id`, newest first
    async fn fetch_playlists(&self, owner_id: &str) -> Result<Vec<PlaylistRecord>>;

    /// Create an empty playlist
    async fn create_playlist(&self, owner_id: &str, name: &str) -> Result<PlaylistRecord>;

    /// Replace a playlist's track-id sequence
    ///
    /// Fails with `BridgeError::NotFound` if the playlist does not exist.
    async fn update_playlist_track_ids(&self, playlist_id: &str, track_ids: &[String])
        -> Result<()>;

    /// Delete a track row
    async fn delete_track(&self, track_id: &str) -> Result<()>;

    /// Upload a binary asset to `path` and return its public URI
    async fn upload_asset(&self, kind: AssetKind, path: &str, data: Bytes) -> Result<String>;

    /// Insert a track row and return it as stored
    async fn create_track_record(&self, record: NewTrackRecord) -> Result<TrackRecord>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_kind_buckets() {
        assert_eq!(AssetKind::Image.bucket(), "song-images");
        assert_eq!(AssetKind::Audio.bucket(), "song-audio");
        assert_eq!(AssetKind::Audio.to_string(), "audio");
    }

    #[test]
    fn test_track_record_uses_backend_column_names() {
        let json = r#"{
            "id": "t1",
            "song_name": "Vaathi Coming",
            "artist_name": "Anirudh",
            "movie_name": "Master",
            "type": "Song",
            "language": "Tamil",
            "image_url": "https://cdn/img.jpg",
            "audio_url": "https://cdn/audio.mp3",
            "created_at": "2024-03-01T10:00:00+00:00"
        }"#;

        let record: TrackRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, "Song");
        assert_eq!(record.uploaded_by, None);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["type"], "Song");
        assert!(value.get("kind").is_none());
    }

    #[test]
    fn test_playlist_record_defaults_missing_song_ids() {
        let json = r#"{
            "id": "p1",
            "name": "Favorites",
            "user_id": "u1",
            "created_at": "2024-03-01T10:00:00Z"
        }"#;

        let record: PlaylistRecord = serde_json::from_str(json).unwrap();
        assert!(record.song_ids.is_empty());
    }
}
