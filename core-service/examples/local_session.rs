//! # Local Session Example
//!
//! Runs a listening session against the in-process gateway: browse, build a
//! playlist, play a few tracks and print every notification.
//!
//! Run with: `cargo run --example local_session --package core-service`

use anyhow::Context;
use bridge_desktop::{LocalCatalogGateway, SqliteSettingsStore};
use bridge_traits::gateway::TrackRecord;
use chrono::{Duration, Utc};
use core_auth::{Principal, Role};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_service::{CoreConfig, CoreEvent, CoreService};
use std::sync::Arc;

fn seed() -> Vec<TrackRecord> {
    let now = Utc::now();
    [
        ("t1", "Vaathi Coming", "Anirudh", "Master", "Song", "Tamil"),
        ("t2", "Master Theme", "Anirudh", "Master", "BGM", "Tamil"),
        ("t3", "Butta Bomma", "Armaan Malik", "Ala Vaikunthapurramuloo", "Song", "Telugu"),
        ("t4", "Kesariya", "Arijit Singh", "Brahmastra", "Song", "Hindi"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (id, title, artist, movie, kind, language))| TrackRecord {
        id: id.to_string(),
        song_name: title.to_string(),
        artist_name: artist.to_string(),
        movie_name: movie.to_string(),
        kind: kind.to_string(),
        language: language.to_string(),
        image_url: format!("https://cdn.example.com/{}.jpg", id),
        audio_url: format!("https://cdn.example.com/{}.mp3", id),
        created_at: now - Duration::minutes(i as i64),
        uploaded_by: None,
    })
    .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default().with_format(LogFormat::Compact))?;

    let gateway = Arc::new(LocalCatalogGateway::new());
    gateway.seed_tracks(seed()).await;
    let settings = SqliteSettingsStore::in_memory()
        .await
        .context("opening settings store")?;

    let config = CoreConfig::builder()
        .gateway(gateway)
        .settings_store(Arc::new(settings))
        .build()?;
    let core = CoreService::new(config).await?;

    let mut toasts = core
        .subscribe()
        .filter(|event| matches!(event, CoreEvent::Notification(_)));
    let printer = tokio::spawn(async move {
        while let Ok(CoreEvent::Notification(n)) = toasts.recv().await {
            println!("[{:?}] {}", n.level, n.message);
        }
    });

    let catalog = core.refresh_catalog().await?;
    println!("Catalog: {} tracks", catalog.len());

    for track in core.search("", "Song", "Tamil").await {
        println!("  Tamil song: {} ({})", track.title, track.artist);
    }

    core.sign_in(Principal::new("listener-1", Role::Listener)).await;
    let favorites = core.create_playlist("Favorites").await?;
    core.add_to_playlist(&favorites.id, "t4").await?;
    core.add_to_playlist(&favorites.id, "t1").await?;
    // Reported, not fatal
    core.add_to_playlist(&favorites.id, "t1").await.ok();

    for track in core.playlist_tracks(&favorites.id).await? {
        println!("  In favorites: {}", track.title);
    }

    core.play_track_id("t1").await?;
    core.enqueue(core.search("", "BGM", "all").await).await;
    core.next().await;
    core.play_track_id("t3").await?;
    if let Some(track) = core.previous().await {
        println!("Back to: {}", track.title);
    }

    let history: Vec<String> = core.history().await.into_iter().map(|t| t.title).collect();
    println!("History: {:?}", history);

    drop(core);
    printer.await?;
    Ok(())
}
