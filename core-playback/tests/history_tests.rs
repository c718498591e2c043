//! History ledger and player session against real and failing settings
//! stores.

use async_trait::async_trait;
use bridge_desktop::SqliteSettingsStore;
use bridge_traits::{error::Result as BridgeResult, storage::SettingsStore, BridgeError};
use chrono::{TimeZone, Utc};
use core_library::{Track, TrackKind};
use core_playback::{HistoryLedger, PlayerSession, PlayerState};
use core_runtime::config::HistoryConfig;
use mockall::mock;
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

mock! {
    Store {}

    #[async_trait]
    impl SettingsStore for Store {
        async fn set_string(&self, key: &str, value: &str) -> BridgeResult<()>;
        async fn get_string(&self, key: &str) -> BridgeResult<Option<String>>;
        async fn delete(&self, key: &str) -> BridgeResult<()>;
        async fn has_key(&self, key: &str) -> BridgeResult<bool>;
        async fn list_keys(&self) -> BridgeResult<Vec<String>>;
        async fn clear_all(&self) -> BridgeResult<()>;
    }
}

fn track(id: &str) -> Track {
    Track {
        id: id.to_string(),
        title: format!("Song {}", id),
        artist: "Anirudh".to_string(),
        movie_or_album: "Master".to_string(),
        kind: TrackKind::Song,
        language: "Tamil".to_string(),
        image_ref: format!("https://cdn/{}.jpg", id),
        audio_ref: format!("https://cdn/{}.mp3", id),
        created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
}

fn ids(entries: &[Track]) -> Vec<&str> {
    entries.iter().map(|t| t.id.as_str()).collect()
}

async fn sqlite_store() -> Arc<SqliteSettingsStore> {
    Arc::new(SqliteSettingsStore::in_memory().await.unwrap())
}

fn failing_store() -> Arc<MockStore> {
    let mut store = MockStore::new();
    store
        .expect_get_string()
        .returning(|_| Err(BridgeError::OperationFailed("disk unavailable".into())));
    store
        .expect_set_string()
        .returning(|_, _| Err(BridgeError::OperationFailed("disk unavailable".into())));
    store
        .expect_delete()
        .returning(|_| Err(BridgeError::OperationFailed("disk unavailable".into())));
    Arc::new(store)
}

// ============================================================================
// Ledger
// ============================================================================

#[tokio::test]
async fn test_history_survives_reload() {
    let store = sqlite_store().await;

    let mut ledger = HistoryLedger::new(store.clone(), HistoryConfig::default());
    ledger.record(track("a")).await;
    ledger.record(track("b")).await;
    ledger.record(track("a")).await;

    let mut reloaded = HistoryLedger::new(store, HistoryConfig::default());
    let entries = reloaded.load().await;
    assert_eq!(ids(entries), vec!["a", "b"]);
    assert_eq!(entries[0], track("a"));
}

#[tokio::test]
async fn test_history_never_exceeds_capacity() {
    let store = sqlite_store().await;
    let mut ledger = HistoryLedger::new(store, HistoryConfig::default());

    for i in 0..30 {
        let entries = ledger.record(track(&format!("t{}", i))).await;
        assert!(entries.len() <= 20);
    }

    assert_eq!(ledger.len(), 20);
    assert_eq!(ledger.entries()[0].id, "t29");
    assert_eq!(ledger.capacity(), 20);
}

#[tokio::test]
async fn test_custom_slot_and_capacity() {
    let store = sqlite_store().await;
    let config = HistoryConfig::default().with_capacity(2).with_slot("recent");
    let mut ledger = HistoryLedger::new(store.clone(), config);

    ledger.record(track("a")).await;
    ledger.record(track("b")).await;
    ledger.record(track("c")).await;

    assert_eq!(ids(ledger.entries()), vec!["c", "b"]);
    assert!(store.has_key("recent").await.unwrap());
    assert!(!store.has_key("history").await.unwrap());
}

#[tokio::test]
async fn test_corrupt_slot_loads_empty() {
    let store = sqlite_store().await;
    store.set_string("history", "{not json").await.unwrap();

    let mut ledger = HistoryLedger::new(store, HistoryConfig::default());
    assert!(ledger.load().await.is_empty());
}

#[tokio::test]
async fn test_loaded_history_is_normalised() {
    let store = sqlite_store().await;
    let stored = vec![track("a"), track("b"), track("a"), track("c")];
    store
        .set_string("history", &serde_json::to_string(&stored).unwrap())
        .await
        .unwrap();

    let config = HistoryConfig::default().with_capacity(2);
    let mut ledger = HistoryLedger::new(store, config);
    assert_eq!(ids(ledger.load().await), vec!["a", "b"]);
}

#[tokio::test]
async fn test_clear_deletes_slot() {
    let store = sqlite_store().await;
    let mut ledger = HistoryLedger::new(store.clone(), HistoryConfig::default());
    ledger.record(track("a")).await;

    ledger.clear().await;
    assert!(ledger.is_empty());
    assert_eq!(store.get_string("history").await.unwrap(), None);
}

#[tokio::test]
async fn test_storage_failures_keep_in_memory_state() {
    let mut ledger = HistoryLedger::new(failing_store(), HistoryConfig::default());

    assert!(ledger.load().await.is_empty());
    ledger.record(track("a")).await;
    ledger.record(track("b")).await;
    assert_eq!(ids(ledger.entries()), vec!["b", "a"]);

    ledger.clear().await;
    assert!(ledger.is_empty());
}

// ============================================================================
// Session
// ============================================================================

#[tokio::test]
async fn test_previous_after_restore() {
    let store = sqlite_store().await;
    {
        let mut session = PlayerSession::new(HistoryLedger::new(
            store.clone(),
            HistoryConfig::default(),
        ));
        session.play(track("a")).await;
        session.play(track("b")).await;
    }

    let mut session = PlayerSession::new(HistoryLedger::new(store, HistoryConfig::default()));
    assert_eq!(ids(session.restore().await), vec!["b", "a"]);
    assert_eq!(session.state(), &PlayerState::Idle);

    // Restored history alone does not start playback
    session.previous();
    assert_eq!(session.state(), &PlayerState::Idle);

    session.play(track("c")).await;
    session.previous();
    assert_eq!(session.current().map(|t| t.id.as_str()), Some("b"));
}

#[tokio::test]
async fn test_replay_rerecords_track() {
    let store = sqlite_store().await;
    let mut session = PlayerSession::new(HistoryLedger::new(store, HistoryConfig::default()));

    session.play(track("a")).await;
    session.play(track("b")).await;
    session.play(track("a")).await;

    assert_eq!(ids(session.history()), vec!["a", "b"]);
}

#[tokio::test]
async fn test_session_plays_on_with_failing_store() {
    let mut session =
        PlayerSession::new(HistoryLedger::new(failing_store(), HistoryConfig::default()));

    let state = session.play(track("a")).await;
    assert!(state.is_playing());

    session.enqueue([track("b")]);
    session.next();
    assert_eq!(session.current().map(|t| t.id.as_str()), Some("b"));
}
