//! The [`CoreService`] façade

use core_auth::{AuthState, Principal, SessionClaims};
use core_library::{
    filter_tracks, CatalogService, LibraryError, Playlist, PlaylistStore, Track, TrackUpload,
};
use core_playback::{HistoryLedger, PlayerSession};
use core_runtime::config::CoreConfig;
use core_runtime::events::{AuthEvent, CoreEvent, EventBus, EventStream, LibraryEvent, Notification};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, instrument, warn};

use crate::error::{CoreError, Result};
use crate::notifications;

/// What a host needs to start a track download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Suggested file name, `"<title> - <artist>.mp3"`
    pub file_name: String,
    pub url: String,
}

struct Inner {
    config: CoreConfig,
    events: EventBus,
    auth: RwLock<AuthState>,
    catalog: CatalogService,
    tracks: RwLock<Vec<Track>>,
    playlists: PlaylistStore,
    player: Mutex<PlayerSession>,
}

/// Primary façade exposed to host applications.
///
/// Clones share state. Every user-triggered operation publishes a
/// [`Notification`] on the event bus, whether it succeeds or fails; the
/// `Result` carries the same outcome for callers that branch on it.
#[derive(Clone)]
pub struct CoreService {
    inner: Arc<Inner>,
}

impl CoreService {
    /// Build the service and restore the persisted play history.
    pub async fn new(config: CoreConfig) -> Result<Self> {
        config.validate()?;

        let events = EventBus::new(config.event_buffer_size);
        let ledger = HistoryLedger::new(config.settings_store.clone(), config.history.clone());
        let mut player = PlayerSession::new(ledger).with_events(events.clone());
        let restored = player.restore().await.len();

        let inner = Inner {
            catalog: CatalogService::new(config.gateway.clone()),
            playlists: PlaylistStore::new(config.gateway.clone()),
            events,
            auth: RwLock::new(AuthState::Anonymous),
            tracks: RwLock::new(Vec::new()),
            player: Mutex::new(player),
            config,
        };

        info!(restored_history = restored, "Core service ready");
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    pub fn config(&self) -> &CoreConfig {
        &self.inner.config
    }

    pub fn events(&self) -> &EventBus {
        &self.inner.events
    }

    pub fn subscribe(&self) -> EventStream {
        self.inner.events.stream()
    }

    fn notify(&self, notification: Notification) {
        self.inner.events.notify(notification);
    }

    fn emit(&self, event: CoreEvent) {
        self.inner.events.emit(event).ok();
    }

    async fn auth(&self) -> AuthState {
        self.inner.auth.read().await.clone()
    }

    // ------------------------------------------------------------------
    // Session
    // ------------------------------------------------------------------

    pub async fn sign_in(&self, principal: Principal) {
        info!(user_id = %principal.user_id(), role = %principal.role(), "Signed in");

        let event = AuthEvent::SignedIn {
            user_id: principal.user_id().to_string(),
            is_admin: principal.is_admin(),
        };
        *self.inner.auth.write().await = AuthState::Authenticated(principal);
        self.emit(CoreEvent::Auth(event));
        self.notify(Notification::success(notifications::LOGIN_SUCCEEDED));
    }

    /// Sign in from decoded backend session claims.
    pub async fn sign_in_with_claims(&self, claims: SessionClaims) -> Result<Principal> {
        match claims.into_principal() {
            Ok(principal) => {
                self.sign_in(principal.clone()).await;
                Ok(principal)
            }
            Err(err) => {
                warn!(error = %err, "Rejected session claims");
                self.notify(Notification::error(notifications::LOGIN_FAILED));
                Err(err.into())
            }
        }
    }

    pub async fn sign_out(&self) {
        let previous = std::mem::take(&mut *self.inner.auth.write().await);

        if let AuthState::Authenticated(principal) = previous {
            info!(user_id = %principal.user_id(), "Signed out");
            self.emit(CoreEvent::Auth(AuthEvent::SignedOut {
                user_id: principal.user_id().to_string(),
            }));
            self.notify(Notification::info(notifications::SIGNED_OUT));
        }
    }

    pub async fn auth_state(&self) -> AuthState {
        self.auth().await
    }

    // ------------------------------------------------------------------
    // Catalog
    // ------------------------------------------------------------------

    /// Reload the catalog from the gateway into the local cache.
    #[instrument(skip(self))]
    pub async fn refresh_catalog(&self) -> Result<Vec<Track>> {
        let loaded = match self.inner.catalog.load_tracks().await {
            Ok(loaded) => loaded,
            Err(err) => {
                warn!(error = %err, "Failed to load catalog");
                self.notify(Notification::error(notifications::CATALOG_LOAD_FAILED));
                return Err(err.into());
            }
        };

        self.emit(CoreEvent::Library(LibraryEvent::CatalogLoaded {
            track_count: loaded.tracks.len(),
            skipped: loaded.skipped,
        }));

        *self.inner.tracks.write().await = loaded.tracks.clone();
        Ok(loaded.tracks)
    }

    /// Cached catalog, newest first
    pub async fn tracks(&self) -> Vec<Track> {
        self.inner.tracks.read().await.clone()
    }

    pub async fn find_track(&self, track_id: &str) -> Option<Track> {
        self.inner
            .tracks
            .read()
            .await
            .iter()
            .find(|t| t.id == track_id)
            .cloned()
    }

    /// Filter the cached catalog by raw UI values.
    pub async fn search(&self, query: &str, type_filter: &str, language_filter: &str) -> Vec<Track> {
        let tracks = self.inner.tracks.read().await;
        filter_tracks(&tracks, query, type_filter, language_filter)
    }

    #[instrument(skip(self, upload), fields(title = %upload.title))]
    pub async fn upload_track(&self, upload: TrackUpload) -> Result<Track> {
        let auth = self.auth().await;

        match self.inner.catalog.upload_track(&auth, upload).await {
            Ok(track) => {
                self.inner.tracks.write().await.insert(0, track.clone());
                self.emit(CoreEvent::Library(LibraryEvent::TrackUploaded {
                    track_id: track.id.clone(),
                    title: track.title.clone(),
                }));
                self.notify(Notification::success(notifications::UPLOAD_SUCCEEDED));
                Ok(track)
            }
            Err(err) => {
                self.notify(notifications::upload_failure(&err));
                Err(err.into())
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_track(&self, track_id: &str) -> Result<()> {
        let auth = self.auth().await;
        self.library_outcome(self.inner.catalog.delete_track(&auth, track_id).await)?;

        self.inner.tracks.write().await.retain(|t| t.id != track_id);
        self.emit(CoreEvent::Library(LibraryEvent::TrackDeleted {
            track_id: track_id.to_string(),
        }));
        self.notify(Notification::success(notifications::TRACK_DELETED));
        Ok(())
    }

    /// Resolve a cached track into download details.
    pub async fn download(&self, track_id: &str) -> Result<Download> {
        let track = self.cached_track(track_id).await?;

        self.notify(Notification::success(notifications::DOWNLOAD_STARTED));
        Ok(Download {
            file_name: track.download_file_name(),
            url: track.audio_ref,
        })
    }

    // ------------------------------------------------------------------
    // Playback
    // ------------------------------------------------------------------

    pub async fn play(&self, track: Track) {
        self.inner.player.lock().await.play(track).await;
    }

    /// Play a track from the cached catalog.
    pub async fn play_track_id(&self, track_id: &str) -> Result<Track> {
        let track = self.cached_track(track_id).await?;
        self.play(track.clone()).await;
        Ok(track)
    }

    /// Skip ahead; returns the current track afterwards.
    pub async fn next(&self) -> Option<Track> {
        self.inner.player.lock().await.next().current().cloned()
    }

    /// Go back; returns the current track afterwards.
    pub async fn previous(&self) -> Option<Track> {
        self.inner.player.lock().await.previous().current().cloned()
    }

    pub async fn enqueue(&self, tracks: Vec<Track>) {
        self.inner.player.lock().await.enqueue(tracks);
    }

    pub async fn now_playing(&self) -> Option<Track> {
        self.inner.player.lock().await.current().cloned()
    }

    pub async fn queue(&self) -> Vec<Track> {
        self.inner.player.lock().await.queue().iter().cloned().collect()
    }

    pub async fn history(&self) -> Vec<Track> {
        self.inner.player.lock().await.history().to_vec()
    }

    pub async fn clear_history(&self) {
        self.inner.player.lock().await.clear_history().await;
    }

    // ------------------------------------------------------------------
    // Playlists
    // ------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let auth = self.auth().await;
        let playlist = self.library_outcome(self.inner.playlists.create_playlist(&auth, name).await)?;

        self.emit(CoreEvent::Library(LibraryEvent::PlaylistCreated {
            playlist_id: playlist.id.clone(),
            name: playlist.name.clone(),
        }));
        self.notify(Notification::success(notifications::PLAYLIST_CREATED));
        Ok(playlist)
    }

    /// Add a track; a track already present is reported as
    /// `LibraryError::Duplicate` and leaves the playlist unchanged.
    #[instrument(skip(self))]
    pub async fn add_to_playlist(&self, playlist_id: &str, track_id: &str) -> Result<Playlist> {
        let auth = self.auth().await;
        let playlist = self.library_outcome(
            self.inner
                .playlists
                .add_track(&auth, playlist_id, track_id)
                .await,
        )?;

        let title = self
            .find_track(track_id)
            .await
            .map(|t| t.title)
            .unwrap_or_else(|| track_id.to_string());

        self.emit(CoreEvent::Library(LibraryEvent::TrackAddedToPlaylist {
            playlist_id: playlist.id.clone(),
            track_id: track_id.to_string(),
        }));
        self.notify(notifications::added_to_playlist(&title, &playlist.name));
        Ok(playlist)
    }

    #[instrument(skip(self))]
    pub async fn remove_from_playlist(&self, playlist_id: &str, track_id: &str) -> Result<Playlist> {
        let auth = self.auth().await;
        let removal = self.library_outcome(
            self.inner
                .playlists
                .remove_track(&auth, playlist_id, track_id)
                .await,
        )?;

        if removal.removed {
            self.emit(CoreEvent::Library(LibraryEvent::TrackRemovedFromPlaylist {
                playlist_id: removal.playlist.id.clone(),
                track_id: track_id.to_string(),
            }));
            self.notify(Notification::info(notifications::REMOVED_FROM_PLAYLIST));
        }
        Ok(removal.playlist)
    }

    /// Playlists of the signed-in principal, newest first
    pub async fn playlists(&self) -> Result<Vec<Playlist>> {
        let auth = self.auth().await;
        self.library_outcome(self.inner.playlists.list_playlists(&auth).await)
    }

    pub async fn playlist(&self, playlist_id: &str) -> Result<Playlist> {
        let auth = self.auth().await;
        self.library_outcome(self.inner.playlists.get_playlist(&auth, playlist_id).await)
    }

    /// Tracks of a playlist in playlist order
    pub async fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>> {
        let auth = self.auth().await;
        self.library_outcome(self.inner.playlists.list_tracks_of(&auth, playlist_id).await)
    }

    // ------------------------------------------------------------------

    /// Publish the failure notification for `outcome` and lift it into
    /// [`CoreError`].
    fn library_outcome<T>(&self, outcome: core_library::Result<T>) -> Result<T> {
        outcome.map_err(|err| {
            debug!(kind = ?err.kind(), error = %err, "Library operation failed");
            self.notify(notifications::failure(&err));
            CoreError::from(err)
        })
    }

    async fn cached_track(&self, track_id: &str) -> Result<Track> {
        let outcome = self
            .find_track(track_id)
            .await
            .ok_or_else(|| LibraryError::not_found("track", track_id));
        self.library_outcome(outcome)
    }
}
