//! Domain models for the catalog and playlists
//!
//! Each entity has exactly one mapping from its backend row shape
//! (`bridge_traits::gateway`) and validates on the way in.

use bridge_traits::gateway::{NewTrackRecord, PlaylistRecord, TrackRecord};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use tracing::warn;

use crate::error::{LibraryError, Result};

/// Languages offered by the upload form. Not enforced; `Track::language` is
/// free text.
pub const SUGGESTED_LANGUAGES: &[&str] = &["Tamil", "Telugu", "Hindi", "Malayalam", "English"];

// =============================================================================
// Track
// =============================================================================

/// Catalog category of a track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrackKind {
    Song,
    /// Background score
    #[serde(rename = "BGM")]
    Bgm,
}

impl TrackKind {
    /// Wire value as stored by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Song => "Song",
            TrackKind::Bgm => "BGM",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrackKind {
    type Err = LibraryError;

    /// Case-sensitive, matching the backend's stored values.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Song" => Ok(TrackKind::Song),
            "BGM" => Ok(TrackKind::Bgm),
            other => Err(LibraryError::invalid_input(
                "type",
                format!("unknown track type '{}'", other),
            )),
        }
    }
}

/// A playable catalog entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub movie_or_album: String,
    pub kind: TrackKind,
    pub language: String,
    pub image_ref: String,
    pub audio_ref: String,
    pub created_at: DateTime<Utc>,
}

impl Track {
    /// Validate track data
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Track id cannot be empty".to_string());
        }

        if self.title.trim().is_empty() {
            return Err("Track title cannot be empty".to_string());
        }

        Ok(())
    }

    /// File name offered when the track is downloaded.
    ///
    /// ```
    /// # use core_library::models::{Track, TrackKind};
    /// # let track = Track {
    /// #     id: "t1".into(), title: "Vaathi Coming".into(), artist: "Anirudh".into(),
    /// #     movie_or_album: "Master".into(), kind: TrackKind::Song, language: "Tamil".into(),
    /// #     image_ref: String::new(), audio_ref: String::new(), created_at: chrono::Utc::now(),
    /// # };
    /// assert_eq!(track.download_file_name(), "Vaathi Coming - Anirudh.mp3");
    /// ```
    pub fn download_file_name(&self) -> String {
        format!("{} - {}.mp3", self.title, self.artist)
    }
}

impl TryFrom<TrackRecord> for Track {
    type Error = LibraryError;

    fn try_from(record: TrackRecord) -> Result<Self> {
        let invalid = |reason: String| LibraryError::InvalidRecord {
            entity_type: "track".to_string(),
            id: record.id.clone(),
            reason,
        };

        let kind = record
            .kind
            .parse::<TrackKind>()
            .map_err(|_| invalid(format!("unknown type '{}'", record.kind)))?;

        let track = Track {
            id: record.id.clone(),
            title: record.song_name.clone(),
            artist: record.artist_name.clone(),
            movie_or_album: record.movie_name.clone(),
            kind,
            language: record.language.clone(),
            image_ref: record.image_url.clone(),
            audio_ref: record.audio_url.clone(),
            created_at: record.created_at,
        };

        track.validate().map_err(invalid)?;
        Ok(track)
    }
}

// =============================================================================
// Playlist
// =============================================================================

/// A named, ordered list of track ids owned by one principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    /// Ordered, without duplicates
    pub track_ids: Vec<String>,
    pub owner_id: String,
    pub created_at: DateTime<Utc>,
}

impl Playlist {
    pub fn contains(&self, track_id: &str) -> bool {
        self.track_ids.iter().any(|id| id == track_id)
    }

    pub fn len(&self) -> usize {
        self.track_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.track_ids.is_empty()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_id == user_id
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Playlist id cannot be empty".to_string());
        }

        if self.name.trim().is_empty() {
            return Err("Playlist name cannot be empty".to_string());
        }

        let mut seen = HashSet::with_capacity(self.track_ids.len());
        if let Some(dup) = self.track_ids.iter().find(|id| !seen.insert(id.as_str())) {
            return Err(format!("Playlist lists track {} more than once", dup));
        }

        Ok(())
    }
}

impl TryFrom<PlaylistRecord> for Playlist {
    type Error = LibraryError;

    /// Repeated track ids keep their first position; concurrent writers can
    /// leave them behind and the row must stay editable.
    fn try_from(record: PlaylistRecord) -> Result<Self> {
        let listed = record.song_ids.len();
        let mut seen = HashSet::with_capacity(listed);
        let track_ids: Vec<String> = record
            .song_ids
            .into_iter()
            .filter(|id| seen.insert(id.clone()))
            .collect();
        if track_ids.len() < listed {
            warn!(
                playlist_id = %record.id,
                dropped = listed - track_ids.len(),
                "Dropping repeated track ids from playlist row"
            );
        }

        let playlist = Playlist {
            id: record.id,
            name: record.name,
            track_ids,
            owner_id: record.user_id,
            created_at: record.created_at,
        };

        playlist
            .validate()
            .map_err(|reason| LibraryError::InvalidRecord {
                entity_type: "playlist".to_string(),
                id: playlist.id.clone(),
                reason,
            })?;

        Ok(playlist)
    }
}

// =============================================================================
// Uploads
// =============================================================================

/// A binary file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetPayload {
    /// Original file name, used for its extension
    pub file_name: String,
    pub data: Bytes,
}

impl AssetPayload {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            data: data.into(),
        }
    }

    /// Lowercased extension of the file name, or `"bin"` if it has none
    pub fn extension(&self) -> String {
        match self.file_name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => ext.to_lowercase(),
            _ => "bin".to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Admin upload form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackUpload {
    pub title: String,
    pub artist: String,
    pub movie_or_album: String,
    pub kind: TrackKind,
    pub language: String,
    pub image: Option<AssetPayload>,
    pub audio: Option<AssetPayload>,
}

impl TrackUpload {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        movie_or_album: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            movie_or_album: movie_or_album.into(),
            kind: TrackKind::Song,
            language: SUGGESTED_LANGUAGES[0].to_string(),
            image: None,
            audio: None,
        }
    }

    pub fn with_kind(mut self, kind: TrackKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_image(mut self, image: AssetPayload) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_audio(mut self, audio: AssetPayload) -> Self {
        self.audio = Some(audio);
        self
    }

    /// Check every text field is filled and both files are attached.
    ///
    /// Returns the image and audio payloads on success.
    pub fn validate(&self) -> Result<(&AssetPayload, &AssetPayload)> {
        let text_fields = [
            ("song_name", &self.title),
            ("artist_name", &self.artist),
            ("movie_name", &self.movie_or_album),
        ];
        for (field, value) in text_fields {
            if value.trim().is_empty() {
                return Err(LibraryError::invalid_input(field, "must not be empty"));
            }
        }

        let image = self
            .image
            .as_ref()
            .filter(|asset| !asset.is_empty())
            .ok_or_else(|| LibraryError::invalid_input("image", "an image file is required"))?;
        let audio = self
            .audio
            .as_ref()
            .filter(|asset| !asset.is_empty())
            .ok_or_else(|| LibraryError::invalid_input("audio", "an audio file is required"))?;

        Ok((image, audio))
    }

    /// Row to insert once both assets are stored.
    pub(crate) fn into_record(
        self,
        image_url: String,
        audio_url: String,
        uploaded_by: &str,
    ) -> NewTrackRecord {
        NewTrackRecord {
            song_name: self.title.trim().to_string(),
            artist_name: self.artist.trim().to_string(),
            movie_name: self.movie_or_album.trim().to_string(),
            kind: self.kind.as_str().to_string(),
            language: self.language.trim().to_string(),
            image_url,
            audio_url,
            uploaded_by: uploaded_by.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, kind: &str) -> TrackRecord {
        TrackRecord {
            id: id.to_string(),
            song_name: "Kannaana Kanney".to_string(),
            artist_name: "Sid Sriram".to_string(),
            movie_name: "Viswasam".to_string(),
            kind: kind.to_string(),
            language: "Tamil".to_string(),
            image_url: "https://cdn/img.jpg".to_string(),
            audio_url: "https://cdn/a.mp3".to_string(),
            created_at: Utc::now(),
            uploaded_by: Some("admin-1".to_string()),
        }
    }

    #[test]
    fn test_track_kind_wire_values() {
        assert_eq!("BGM".parse::<TrackKind>().unwrap(), TrackKind::Bgm);
        assert!("bgm".parse::<TrackKind>().is_err());
        assert_eq!(serde_json::to_string(&TrackKind::Bgm).unwrap(), "\"BGM\"");
    }

    #[test]
    fn test_track_from_record() {
        let track = Track::try_from(record("t1", "BGM")).unwrap();

        assert_eq!(track.title, "Kannaana Kanney");
        assert_eq!(track.movie_or_album, "Viswasam");
        assert_eq!(track.kind, TrackKind::Bgm);
        assert_eq!(track.download_file_name(), "Kannaana Kanney - Sid Sriram.mp3");
    }

    #[test]
    fn test_track_record_with_unknown_kind_is_rejected() {
        let err = Track::try_from(record("t1", "Podcast")).unwrap_err();
        assert!(matches!(err, LibraryError::InvalidRecord { ref id, .. } if id == "t1"));
    }

    #[test]
    fn test_track_record_with_blank_title_is_rejected() {
        let mut row = record("t1", "Song");
        row.song_name = "   ".to_string();
        assert!(Track::try_from(row).is_err());
    }

    fn playlist_row(name: &str, song_ids: &[&str]) -> PlaylistRecord {
        PlaylistRecord {
            id: "p1".to_string(),
            name: name.to_string(),
            song_ids: song_ids.iter().map(|id| id.to_string()).collect(),
            user_id: "u1".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_playlist_from_record_keeps_first_of_repeated_ids() {
        let playlist = Playlist::try_from(playlist_row("Favorites", &["a", "b", "a"])).unwrap();
        assert_eq!(playlist.track_ids, vec!["a", "b"]);
    }

    #[test]
    fn test_playlist_from_record_rejects_blank_name() {
        let err = Playlist::try_from(playlist_row("  ", &["a"])).unwrap_err();
        assert!(matches!(err, LibraryError::InvalidRecord { ref id, .. } if id == "p1"));
    }

    #[test]
    fn test_playlist_validate_rejects_duplicate_ids() {
        let playlist = Playlist {
            id: "p1".to_string(),
            name: "Favorites".to_string(),
            track_ids: vec!["a".to_string(), "a".to_string()],
            owner_id: "u1".to_string(),
            created_at: Utc::now(),
        };

        assert!(playlist.validate().unwrap_err().contains("more than once"));
    }

    #[test]
    fn test_upload_allows_blank_language() {
        let upload = TrackUpload::new("Theme", "Anirudh", "Master")
            .with_language("")
            .with_image(AssetPayload::new("poster.jpg", vec![1]))
            .with_audio(AssetPayload::new("theme.mp3", vec![2]));

        assert!(upload.validate().is_ok());
    }

    #[test]
    fn test_playlist_helpers() {
        let playlist = Playlist {
            id: "p1".to_string(),
            name: "Road trip".to_string(),
            track_ids: vec!["t1".to_string()],
            owner_id: "u1".to_string(),
            created_at: Utc::now(),
        };

        assert!(playlist.contains("t1"));
        assert!(!playlist.contains("t2"));
        assert_eq!(playlist.len(), 1);
        assert!(playlist.is_owned_by("u1"));
    }

    #[test]
    fn test_asset_extension() {
        assert_eq!(AssetPayload::new("cover.JPG", vec![1]).extension(), "jpg");
        assert_eq!(AssetPayload::new("mix.final.mp3", vec![1]).extension(), "mp3");
        assert_eq!(AssetPayload::new("README", vec![1]).extension(), "bin");
        assert_eq!(AssetPayload::new(".hidden", vec![1]).extension(), "bin");
    }

    #[test]
    fn test_upload_validation() {
        let upload = TrackUpload::new("Title", "Artist", "Movie")
            .with_image(AssetPayload::new("a.png", vec![1, 2]))
            .with_audio(AssetPayload::new("a.mp3", Vec::new()));

        let err = upload.validate().unwrap_err();
        assert_eq!(err, LibraryError::invalid_input("audio", "an audio file is required"));

        let blank_artist = TrackUpload::new("Title", " ", "Movie");
        assert!(matches!(
            blank_artist.validate(),
            Err(LibraryError::InvalidInput { ref field, .. }) if field == "artist_name"
        ));
    }
}
