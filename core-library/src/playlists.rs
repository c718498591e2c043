//! User playlists
//!
//! Every operation goes straight to the gateway and treats its answer as the
//! source of truth; nothing is cached here. Mutations rewrite the whole
//! track-id sequence, so concurrent writers resolve as last-write-wins.

use bridge_traits::error::BridgeError;
use bridge_traits::gateway::CatalogGateway;
use core_auth::{AuthState, Principal};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

use crate::error::{LibraryError, Result};
use crate::models::{Playlist, Track};

/// Result of [`PlaylistStore::remove_track`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removal {
    pub playlist: Playlist,
    /// False when the track was not listed and nothing was written
    pub removed: bool,
}

pub struct PlaylistStore {
    gateway: Arc<dyn CatalogGateway>,
}

impl PlaylistStore {
    pub fn new(gateway: Arc<dyn CatalogGateway>) -> Self {
        Self { gateway }
    }

    /// Create an empty playlist owned by the signed-in principal.
    ///
    /// The name is checked before the session, so a blank name is reported
    /// as `InvalidInput` even when nobody is signed in.
    #[instrument(skip(self, auth))]
    pub async fn create_playlist(&self, auth: &AuthState, name: &str) -> Result<Playlist> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LibraryError::invalid_input(
                "name",
                "Please enter a playlist name",
            ));
        }

        let principal = auth.require_user()?;
        let record = self
            .gateway
            .create_playlist(principal.user_id(), name)
            .await
            .map_err(persistence)?;
        let playlist = Playlist::try_from(record)?;

        info!(playlist_id = %playlist.id, "Created playlist");
        Ok(playlist)
    }

    /// Append `track_id` to a playlist.
    ///
    /// Reports `Duplicate` without writing if the track is already listed.
    #[instrument(skip(self, auth))]
    pub async fn add_track(
        &self,
        auth: &AuthState,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<Playlist> {
        let principal = auth.require_user()?;
        let mut playlist = self.owned_playlist(principal, playlist_id).await?;

        if playlist.contains(track_id) {
            debug!("Track already in playlist");
            return Err(LibraryError::Duplicate {
                playlist_id: playlist_id.to_string(),
                track_id: track_id.to_string(),
            });
        }

        playlist.track_ids.push(track_id.to_string());
        self.write_track_ids(&playlist).await?;

        info!(len = playlist.len(), "Added track to playlist");
        Ok(playlist)
    }

    /// Remove `track_id` from a playlist. Removing an absent track succeeds
    /// without writing.
    #[instrument(skip(self, auth))]
    pub async fn remove_track(
        &self,
        auth: &AuthState,
        playlist_id: &str,
        track_id: &str,
    ) -> Result<Removal> {
        let principal = auth.require_user()?;
        let mut playlist = self.owned_playlist(principal, playlist_id).await?;

        let before = playlist.len();
        playlist.track_ids.retain(|id| id != track_id);
        if playlist.len() == before {
            debug!("Track not in playlist, nothing to remove");
            return Ok(Removal {
                playlist,
                removed: false,
            });
        }

        self.write_track_ids(&playlist).await?;

        info!(len = playlist.len(), "Removed track from playlist");
        Ok(Removal {
            playlist,
            removed: true,
        })
    }

    /// Playlists of the signed-in principal, newest first.
    #[instrument(skip(self, auth))]
    pub async fn list_playlists(&self, auth: &AuthState) -> Result<Vec<Playlist>> {
        let principal = auth.require_user()?;
        let records = self
            .gateway
            .fetch_playlists(principal.user_id())
            .await
            .map_err(persistence)?;

        let mut playlists = Vec::with_capacity(records.len());
        for record in records {
            match Playlist::try_from(record) {
                Ok(playlist) => playlists.push(playlist),
                Err(err) => warn!(error = %err, "Skipping invalid playlist row"),
            }
        }
        playlists.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(playlists)
    }

    /// A single playlist.
    pub async fn get_playlist(&self, auth: &AuthState, playlist_id: &str) -> Result<Playlist> {
        auth.require_user()?;
        self.fetch(playlist_id).await
    }

    /// Resolve a playlist's track ids into tracks, in playlist order.
    ///
    /// Ids the catalog no longer knows are dropped. An empty playlist
    /// resolves without a catalog lookup.
    #[instrument(skip(self, auth))]
    pub async fn list_tracks_of(&self, auth: &AuthState, playlist_id: &str) -> Result<Vec<Track>> {
        let playlist = self.get_playlist(auth, playlist_id).await?;
        if playlist.is_empty() {
            return Ok(Vec::new());
        }

        let records = self
            .gateway
            .fetch_tracks_by_ids(&playlist.track_ids)
            .await
            .map_err(persistence)?;

        let mut by_id: HashMap<String, Track> = HashMap::with_capacity(records.len());
        for record in records {
            match Track::try_from(record) {
                Ok(track) => {
                    by_id.insert(track.id.clone(), track);
                }
                Err(err) => warn!(error = %err, "Skipping invalid track row"),
            }
        }

        let tracks: Vec<Track> = playlist
            .track_ids
            .iter()
            .filter_map(|id| by_id.remove(id))
            .collect();

        if tracks.len() < playlist.len() {
            debug!(
                missing = playlist.len() - tracks.len(),
                "Some playlist tracks are no longer in the catalog"
            );
        }
        Ok(tracks)
    }

    async fn fetch(&self, playlist_id: &str) -> Result<Playlist> {
        let record = self
            .gateway
            .fetch_playlist(playlist_id)
            .await
            .map_err(persistence)?
            .ok_or_else(|| LibraryError::not_found("playlist", playlist_id))?;

        Playlist::try_from(record)
    }

    async fn owned_playlist(&self, principal: &Principal, playlist_id: &str) -> Result<Playlist> {
        let playlist = self.fetch(playlist_id).await?;
        if !playlist.is_owned_by(principal.user_id()) {
            return Err(LibraryError::Forbidden(format!(
                "playlist {} belongs to another user",
                playlist_id
            )));
        }
        Ok(playlist)
    }

    async fn write_track_ids(&self, playlist: &Playlist) -> Result<()> {
        self.gateway
            .update_playlist_track_ids(&playlist.id, &playlist.track_ids)
            .await
            .map_err(|err| match err {
                e if e.is_not_found() => LibraryError::not_found("playlist", &playlist.id),
                e => persistence(e),
            })
    }
}

/// Gateway failures while reading or writing playlists are all persistence
/// problems from the caller's point of view.
fn persistence(err: BridgeError) -> LibraryError {
    LibraryError::Persistence(err.to_string())
}
