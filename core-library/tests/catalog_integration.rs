//! Catalog service and playlist store against the in-process gateway.

use bridge_desktop::LocalCatalogGateway;
use bridge_traits::gateway::{CatalogGateway, PlaylistRecord, TrackRecord};
use chrono::{Duration, Utc};
use core_auth::{AuthState, Principal, Role};
use core_library::{
    AssetPayload, CatalogService, ErrorKind, LibraryError, PlaylistStore, TrackKind, TrackUpload,
};
use std::sync::Arc;

fn admin() -> AuthState {
    AuthState::from(Principal::new("admin-1", Role::Admin))
}

fn listener() -> AuthState {
    AuthState::from(Principal::new("u1", Role::Listener))
}

fn row(id: &str, kind: &str, minutes_ago: i64) -> TrackRecord {
    TrackRecord {
        id: id.to_string(),
        song_name: format!("Song {}", id),
        artist_name: "Anirudh".to_string(),
        movie_name: "Master".to_string(),
        kind: kind.to_string(),
        language: "Tamil".to_string(),
        image_url: format!("https://cdn/{}.jpg", id),
        audio_url: format!("https://cdn/{}.mp3", id),
        created_at: Utc::now() - Duration::minutes(minutes_ago),
        uploaded_by: None,
    }
}

fn bgm_upload() -> TrackUpload {
    TrackUpload::new("  Master Theme ", "Anirudh", "Master")
        .with_kind(TrackKind::Bgm)
        .with_image(AssetPayload::new("poster.JPG", vec![0xFF, 0xD8]))
        .with_audio(AssetPayload::new("theme.mp3", vec![0x49, 0x44, 0x33]))
}

#[tokio::test]
async fn test_load_skips_rows_with_unknown_type() {
    let gateway = Arc::new(LocalCatalogGateway::new());
    gateway
        .seed_tracks([row("a", "Song", 5), row("b", "song", 3), row("c", "BGM", 1)])
        .await;

    let loaded = CatalogService::new(gateway).load_tracks().await.unwrap();
    let ids: Vec<&str> = loaded.tracks.iter().map(|t| t.id.as_str()).collect();

    assert_eq!(ids, vec!["c", "a"]);
    assert_eq!(loaded.skipped, 1);
}

#[tokio::test]
async fn test_upload_stores_assets_and_record() {
    let gateway = Arc::new(LocalCatalogGateway::new());
    let catalog = CatalogService::new(gateway.clone());

    let track = catalog.upload_track(&admin(), bgm_upload()).await.unwrap();

    assert_eq!(track.title, "Master Theme");
    assert_eq!(track.kind, TrackKind::Bgm);
    assert_eq!(track.language, "Tamil");
    assert!(track.image_ref.starts_with("local://song-images/admin-1/"));
    assert!(track.image_ref.ends_with(".jpg"));
    assert_eq!(
        gateway.asset(&track.audio_ref).await.as_deref(),
        Some(&[0x49, 0x44, 0x33][..])
    );

    let stored = gateway.fetch_tracks().await.unwrap();
    assert_eq!(stored[0].uploaded_by.as_deref(), Some("admin-1"));
}

#[tokio::test]
async fn test_upload_without_audio_writes_nothing() {
    let gateway = Arc::new(LocalCatalogGateway::new());
    let catalog = CatalogService::new(gateway.clone());

    let mut upload = bgm_upload();
    upload.audio = None;

    let err = catalog.upload_track(&admin(), upload).await.unwrap_err();
    assert_eq!(err, LibraryError::invalid_input("audio", "an audio file is required"));
    assert_eq!(gateway.track_count().await, 0);
}

#[tokio::test]
async fn test_delete_requires_admin_and_existing_track() {
    let gateway = Arc::new(LocalCatalogGateway::new());
    gateway.seed_tracks([row("a", "Song", 1)]).await;
    let catalog = CatalogService::new(gateway.clone());

    let err = catalog.delete_track(&listener(), "a").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Authorization);

    let err = catalog.delete_track(&AuthState::Anonymous, "a").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AuthRequired);

    catalog.delete_track(&admin(), "a").await.unwrap();
    let err = catalog.delete_track(&admin(), "a").await.unwrap_err();
    assert_eq!(err, LibraryError::not_found("track", "a"));
}

#[tokio::test]
async fn test_playlist_round_trip() {
    let gateway = Arc::new(LocalCatalogGateway::new());
    gateway
        .seed_tracks([row("track-1", "Song", 2), row("track-2", "BGM", 1)])
        .await;
    let store = PlaylistStore::new(gateway);
    let auth = listener();

    let favorites = store.create_playlist(&auth, "Favorites").await.unwrap();
    assert!(favorites.track_ids.is_empty());
    assert_eq!(favorites.owner_id, "u1");

    store.add_track(&auth, &favorites.id, "track-2").await.unwrap();
    let updated = store.add_track(&auth, &favorites.id, "track-1").await.unwrap();
    assert_eq!(updated.track_ids, vec!["track-2", "track-1"]);

    let err = store
        .add_track(&auth, &favorites.id, "track-1")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert_eq!(store.get_playlist(&auth, &favorites.id).await.unwrap().len(), 2);

    let titles: Vec<String> = store
        .list_tracks_of(&auth, &favorites.id)
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["Song track-2", "Song track-1"]);

    let listed = store.list_playlists(&auth).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(store.list_playlists(&AuthState::Anonymous).await.is_err());
}

fn playlist_row(id: &str, song_ids: &[&str], minutes_ago: i64) -> PlaylistRecord {
    PlaylistRecord {
        id: id.to_string(),
        name: format!("List {}", id),
        song_ids: song_ids.iter().map(|s| s.to_string()).collect(),
        user_id: "u1".to_string(),
        created_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

#[tokio::test]
async fn test_damaged_playlist_rows_do_not_hide_others() {
    let gateway = Arc::new(LocalCatalogGateway::new());
    let mut blank = playlist_row("blank", &[], 3);
    blank.name = "  ".to_string();
    gateway
        .seed_playlists([
            playlist_row("good", &["a"], 2),
            playlist_row("repeated", &["a", "b", "a"], 1),
            blank,
        ])
        .await;
    let store = PlaylistStore::new(gateway.clone());
    let auth = listener();

    let listed: Vec<String> = store
        .list_playlists(&auth)
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.id)
        .collect();
    assert_eq!(listed, vec!["repeated", "good"]);

    let removal = store.remove_track(&auth, "repeated", "a").await.unwrap();
    assert!(removal.removed);
    assert_eq!(removal.playlist.track_ids, vec!["b"]);

    let stored = gateway.fetch_playlist("repeated").await.unwrap().unwrap();
    assert_eq!(stored.song_ids, vec!["b"]);
}
