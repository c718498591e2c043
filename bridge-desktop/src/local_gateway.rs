//! In-process catalog gateway
//!
//! Keeps tracks, playlists and uploaded assets in memory. Used for offline
//! development, demos and integration tests; behaves like the hosted backend
//! for ordering and not-found reporting.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    gateway::{AssetKind, CatalogGateway, NewTrackRecord, PlaylistRecord, TrackRecord},
    time::{Clock, SystemClock},
};
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Row plus its insertion sequence, used to break `created_at` ties
#[derive(Debug, Clone)]
struct Stored<T> {
    seq: u64,
    row: T,
}

#[derive(Default)]
struct State {
    next_seq: u64,
    tracks: Vec<Stored<TrackRecord>>,
    playlists: Vec<Stored<PlaylistRecord>>,
    assets: HashMap<String, Bytes>,
}

impl State {
    fn seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}

/// Newest first by `created_at`, later inserts first on ties
fn newest_first<T: Clone>(rows: &[Stored<T>], created: impl Fn(&T) -> i64) -> Vec<T> {
    let mut sorted: Vec<&Stored<T>> = rows.iter().collect();
    sorted.sort_by(|a, b| {
        created(&b.row)
            .cmp(&created(&a.row))
            .then(b.seq.cmp(&a.seq))
    });
    sorted.into_iter().map(|s| s.row.clone()).collect()
}

/// Memory-backed [`CatalogGateway`]
pub struct LocalCatalogGateway {
    state: RwLock<State>,
    clock: Arc<dyn Clock>,
}

impl Default for LocalCatalogGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalCatalogGateway {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: RwLock::new(State::default()),
            clock,
        }
    }

    /// Insert track rows as-is, keeping their ids and timestamps
    pub async fn seed_tracks(&self, records: impl IntoIterator<Item = TrackRecord>) {
        let mut state = self.state.write().await;
        for row in records {
            let seq = state.seq();
            state.tracks.retain(|t| t.row.id != row.id);
            state.tracks.push(Stored { seq, row });
        }
    }

    /// Insert playlist rows as-is, keeping their ids and timestamps
    pub async fn seed_playlists(&self, records: impl IntoIterator<Item = PlaylistRecord>) {
        let mut state = self.state.write().await;
        for row in records {
            let seq = state.seq();
            state.playlists.retain(|p| p.row.id != row.id);
            state.playlists.push(Stored { seq, row });
        }
    }

    /// Bytes previously stored under `uri`
    pub async fn asset(&self, uri: &str) -> Option<Bytes> {
        self.state.read().await.assets.get(uri).cloned()
    }

    pub async fn track_count(&self) -> usize {
        self.state.read().await.tracks.len()
    }
}

fn asset_uri(kind: AssetKind, path: &str) -> String {
    format!("local://{}/{}", kind.bucket(), path.trim_start_matches('/'))
}

#[async_trait]
impl CatalogGateway for LocalCatalogGateway {
    async fn fetch_tracks(&self) -> Result<Vec<TrackRecord>> {
        let state = self.state.read().await;
        Ok(newest_first(&state.tracks, |t| {
            t.created_at.timestamp_nanos_opt().unwrap_or(i64::MIN)
        }))
    }

    async fn fetch_tracks_by_ids(&self, ids: &[String]) -> Result<Vec<TrackRecord>> {
        let state = self.state.read().await;
        Ok(state
            .tracks
            .iter()
            .filter(|t| ids.contains(&t.row.id))
            .map(|t| t.row.clone())
            .collect())
    }

    async fn fetch_playlist(&self, playlist_id: &str) -> Result<Option<PlaylistRecord>> {
        let state = self.state.read().await;
        Ok(state
            .playlists
            .iter()
            .find(|p| p.row.id == playlist_id)
            .map(|p| p.row.clone()))
    }

    async fn fetch_playlists(&self, owner_id: &str) -> Result<Vec<PlaylistRecord>> {
        let state = self.state.read().await;
        let owned: Vec<Stored<PlaylistRecord>> = state
            .playlists
            .iter()
            .filter(|p| p.row.user_id == owner_id)
            .cloned()
            .collect();

        Ok(newest_first(&owned, |p| {
            p.created_at.timestamp_nanos_opt().unwrap_or(i64::MIN)
        }))
    }

    async fn create_playlist(&self, owner_id: &str, name: &str) -> Result<PlaylistRecord> {
        let row = PlaylistRecord {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            song_ids: Vec::new(),
            user_id: owner_id.to_string(),
            created_at: self.clock.now(),
        };

        let mut state = self.state.write().await;
        let seq = state.seq();
        state.playlists.push(Stored {
            seq,
            row: row.clone(),
        });

        debug!(playlist_id = %row.id, "Created local playlist");
        Ok(row)
    }

    async fn update_playlist_track_ids(
        &self,
        playlist_id: &str,
        track_ids: &[String],
    ) -> Result<()> {
        let mut state = self.state.write().await;
        let playlist = state
            .playlists
            .iter_mut()
            .find(|p| p.row.id == playlist_id)
            .ok_or_else(|| BridgeError::NotFound(format!("playlist {}", playlist_id)))?;

        playlist.row.song_ids = track_ids.to_vec();
        Ok(())
    }

    async fn delete_track(&self, track_id: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let before = state.tracks.len();
        state.tracks.retain(|t| t.row.id != track_id);

        if state.tracks.len() == before {
            return Err(BridgeError::NotFound(format!("track {}", track_id)));
        }
        Ok(())
    }

    async fn upload_asset(&self, kind: AssetKind, path: &str, data: Bytes) -> Result<String> {
        let uri = asset_uri(kind, path);
        let mut state = self.state.write().await;

        if state.assets.contains_key(&uri) {
            return Err(BridgeError::Rejected(format!("asset already exists: {}", uri)));
        }
        state.assets.insert(uri.clone(), data);
        Ok(uri)
    }

    async fn create_track_record(&self, record: NewTrackRecord) -> Result<TrackRecord> {
        let row = TrackRecord {
            id: Uuid::new_v4().to_string(),
            song_name: record.song_name,
            artist_name: record.artist_name,
            movie_name: record.movie_name,
            kind: record.kind,
            language: record.language,
            image_url: record.image_url,
            audio_url: record.audio_url,
            created_at: self.clock.now(),
            uploaded_by: Some(record.uploaded_by),
        };

        let mut state = self.state.write().await;
        let seq = state.seq();
        state.tracks.push(Stored {
            seq,
            row: row.clone(),
        });
        Ok(row)
    }
}
