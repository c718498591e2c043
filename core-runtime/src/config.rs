//! # Core Configuration Module
//!
//! Builder-based configuration for the Cadence core.
//!
//! ## Overview
//!
//! [`CoreConfig`] holds the bridges and tunables the core needs. The builder
//! fails fast: a missing required bridge produces
//! [`Error::CapabilityMissing`] with a message telling the host what to
//! inject, and out-of-range values produce [`Error::Config`].
//!
//! ## Required Dependencies
//!
//! - `CatalogGateway` - Hosted catalog/playlist backend
//! - `SettingsStore` - Durable slot for the play history
//!
//! When the `desktop-shims` feature is enabled, a SQLite-backed
//! `SettingsStore` is created automatically if none is provided.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::{CoreConfig, HistoryConfig};
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .gateway(Arc::new(my_gateway))
//!     .settings_store(Arc::new(my_store))
//!     .history(HistoryConfig::default().with_capacity(50))
//!     .build()?;
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::CoreConfig;
//!
//! // No gateway was injected
//! let config = CoreConfig::builder()
//!     .build()
//!     .expect("Should fail - missing gateway");
//! ```

use crate::error::{Error, Result};
use crate::events::DEFAULT_EVENT_BUFFER_SIZE;
use bridge_traits::{CatalogGateway, SettingsStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Default number of entries kept in the play history
pub const DEFAULT_HISTORY_CAPACITY: usize = 20;

/// Upper bound accepted for the history capacity
pub const MAX_HISTORY_CAPACITY: usize = 500;

/// Default settings slot holding the serialised history
pub const DEFAULT_HISTORY_SLOT: &str = "history";

/// Play history tunables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of distinct tracks remembered
    pub capacity: usize,
    /// Settings key the history is persisted under
    pub slot: String,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_HISTORY_CAPACITY,
            slot: DEFAULT_HISTORY_SLOT.to_string(),
        }
    }
}

impl HistoryConfig {
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = slot.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 || self.capacity > MAX_HISTORY_CAPACITY {
            return Err(Error::Config(format!(
                "History capacity must be between 1 and {} (got {})",
                MAX_HISTORY_CAPACITY, self.capacity
            )));
        }

        if self.slot.trim().is_empty() {
            return Err(Error::Config(
                "History slot name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Core configuration.
///
/// Use [`CoreConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct CoreConfig {
    /// Hosted catalog/playlist backend (required)
    pub gateway: Arc<dyn CatalogGateway>,

    /// Durable local slots (required, desktop default: SQLite)
    pub settings_store: Arc<dyn SettingsStore>,

    pub history: HistoryConfig,

    /// Per-subscriber buffer of the event bus
    pub event_buffer_size: usize,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("gateway", &"CatalogGateway { ... }")
            .field("settings_store", &"SettingsStore { ... }")
            .field("history", &self.history)
            .field("event_buffer_size", &self.event_buffer_size)
            .finish()
    }
}

impl CoreConfig {
    /// Creates a new builder for constructing a `CoreConfig`.
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Validates tunables.
    ///
    /// This checks:
    /// - History capacity is within 1..=500 and the slot name is non-empty
    /// - The event buffer holds at least one event
    pub fn validate(&self) -> Result<()> {
        self.history.validate()?;

        if self.event_buffer_size == 0 {
            return Err(Error::Config(
                "Event buffer size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

fn gateway_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "CatalogGateway".to_string(),
        message: "CatalogGateway implementation is required for catalog and playlist access. \
                 Inject bridge_desktop::RestCatalogGateway for a hosted backend or \
                 bridge_desktop::LocalCatalogGateway for an in-process one."
            .to_string(),
    }
}

#[cfg(not(feature = "desktop-shims"))]
fn settings_store_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "SettingsStore".to_string(),
        message: "SettingsStore implementation is required for the play history. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default SqliteSettingsStore. \
                 Web: inject a localStorage-based settings store."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_settings_store(data_dir: Option<PathBuf>) -> Result<Arc<dyn SettingsStore>> {
    use bridge_desktop::SqliteSettingsStore;
    use std::thread;
    use tokio::runtime::{Handle, Runtime};

    let path = match data_dir {
        Some(dir) => dir.join(bridge_desktop::SETTINGS_FILE_NAME),
        None => SqliteSettingsStore::default_path().ok_or_else(|| {
            Error::Config(
                "Could not determine a data directory for the default SettingsStore. \
                 Use .data_dir() to set one."
                    .to_string(),
            )
        })?,
    };

    let init_store = move || -> Result<SqliteSettingsStore> {
        let runtime = Runtime::new().map_err(|e| {
            Error::Internal(format!(
                "Failed to create Tokio runtime for default settings store: {}",
                e
            ))
        })?;

        runtime
            .block_on(SqliteSettingsStore::new(path))
            .map_err(|e| {
                Error::Internal(format!("Failed to initialize default SettingsStore: {}", e))
            })
    };

    let store = match Handle::try_current() {
        Ok(_) => thread::spawn(init_store).join().map_err(|_| {
            Error::Internal(
                "Worker thread panicked while creating default SettingsStore".to_string(),
            )
        })??,
        Err(_) => init_store()?,
    };

    let store: Arc<dyn SettingsStore> = Arc::new(store);
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_settings_store(_data_dir: Option<PathBuf>) -> Result<Arc<dyn SettingsStore>> {
    Err(settings_store_missing_error())
}

/// Builder for constructing [`CoreConfig`] instances.
#[derive(Default)]
pub struct CoreConfigBuilder {
    gateway: Option<Arc<dyn CatalogGateway>>,
    settings_store: Option<Arc<dyn SettingsStore>>,
    data_dir: Option<PathBuf>,
    history: Option<HistoryConfig>,
    event_buffer_size: Option<usize>,
}

impl CoreConfigBuilder {
    /// Sets the catalog gateway (required).
    pub fn gateway(mut self, gateway: Arc<dyn CatalogGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Sets the settings store implementation.
    ///
    /// Required unless the `desktop-shims` feature is enabled.
    pub fn settings_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        self.settings_store = Some(store);
        self
    }

    /// Directory for the default SQLite settings file.
    ///
    /// Only consulted when no settings store is injected and `desktop-shims`
    /// is enabled. Defaults to the platform data directory.
    pub fn data_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn history(mut self, history: HistoryConfig) -> Self {
        self.history = Some(history);
        self
    }

    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history = Some(self.history.unwrap_or_default().with_capacity(capacity));
        self
    }

    pub fn event_buffer_size(mut self, size: usize) -> Self {
        self.event_buffer_size = Some(size);
        self
    }

    /// Builds the final `CoreConfig` instance.
    ///
    /// # Returns
    ///
    /// Returns an error if:
    /// - No gateway was injected
    /// - No settings store was injected and no default is available
    /// - History or event bus tunables are out of range
    pub fn build(self) -> Result<CoreConfig> {
        let gateway = self.gateway.ok_or_else(gateway_missing_error)?;

        let history = self.history.unwrap_or_default();
        history.validate()?;

        let settings_store = match self.settings_store {
            Some(store) => store,
            None => provide_default_settings_store(self.data_dir)?,
        };

        let config = CoreConfig {
            gateway,
            settings_store,
            history,
            event_buffer_size: self
                .event_buffer_size
                .unwrap_or(DEFAULT_EVENT_BUFFER_SIZE),
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::{AssetKind, NewTrackRecord, PlaylistRecord, TrackRecord};
    use bytes::Bytes;

    struct NullGateway;

    #[async_trait]
    impl CatalogGateway for NullGateway {
        async fn fetch_tracks(&self) -> BridgeResult<Vec<TrackRecord>> {
            Ok(Vec::new())
        }

        async fn fetch_tracks_by_ids(&self, _ids: &[String]) -> BridgeResult<Vec<TrackRecord>> {
            Ok(Vec::new())
        }

        async fn fetch_playlist(&self, _playlist_id: &str) -> BridgeResult<Option<PlaylistRecord>> {
            Ok(None)
        }

        async fn fetch_playlists(&self, _owner_id: &str) -> BridgeResult<Vec<PlaylistRecord>> {
            Ok(Vec::new())
        }

        async fn create_playlist(&self, _owner_id: &str, _name: &str) -> BridgeResult<PlaylistRecord> {
            unimplemented!()
        }

        async fn update_playlist_track_ids(
            &self,
            _playlist_id: &str,
            _track_ids: &[String],
        ) -> BridgeResult<()> {
            Ok(())
        }

        async fn delete_track(&self, _track_id: &str) -> BridgeResult<()> {
            Ok(())
        }

        async fn upload_asset(&self, _kind: AssetKind, path: &str, _data: Bytes) -> BridgeResult<String> {
            Ok(path.to_string())
        }

        async fn create_track_record(&self, _record: NewTrackRecord) -> BridgeResult<TrackRecord> {
            unimplemented!()
        }
    }

    struct NullSettingsStore;

    #[async_trait]
    impl SettingsStore for NullSettingsStore {
        async fn set_string(&self, _key: &str, _value: &str) -> BridgeResult<()> {
            Ok(())
        }

        async fn get_string(&self, _key: &str) -> BridgeResult<Option<String>> {
            Ok(None)
        }

        async fn delete(&self, _key: &str) -> BridgeResult<()> {
            Ok(())
        }

        async fn list_keys(&self) -> BridgeResult<Vec<String>> {
            Ok(Vec::new())
        }

        async fn clear_all(&self) -> BridgeResult<()> {
            Ok(())
        }
    }

    fn builder_with_bridges() -> CoreConfigBuilder {
        CoreConfig::builder()
            .gateway(Arc::new(NullGateway))
            .settings_store(Arc::new(NullSettingsStore))
    }

    #[test]
    fn test_builder_defaults() {
        let config = builder_with_bridges().build().unwrap();

        assert_eq!(config.history.capacity, 20);
        assert_eq!(config.history.slot, "history");
        assert_eq!(config.event_buffer_size, DEFAULT_EVENT_BUFFER_SIZE);
    }

    #[test]
    fn test_builder_requires_gateway() {
        let result = CoreConfig::builder()
            .settings_store(Arc::new(NullSettingsStore))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "CatalogGateway")
            }
            other => panic!("expected missing gateway, got {:?}", other),
        }
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn test_builder_requires_settings_store() {
        let result = CoreConfig::builder().gateway(Arc::new(NullGateway)).build();

        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("SettingsStore"));
        assert!(err_msg.contains("desktop-shims"));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn test_build_with_desktop_default_settings_store() {
        let dir = std::env::temp_dir().join(format!("cadence-config-{}", std::process::id()));

        let config = CoreConfig::builder()
            .gateway(Arc::new(NullGateway))
            .data_dir(&dir)
            .build()
            .expect("desktop defaults should succeed");

        let settings = config.settings_store.clone();
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            settings.set_string("history", "[]").await.unwrap();
            let value = settings.get_string("history").await.unwrap();
            assert_eq!(value.as_deref(), Some("[]"));
        });

        drop(config);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_history_capacity_bounds() {
        let zero = builder_with_bridges().history_capacity(0).build();
        assert!(matches!(zero, Err(Error::Config(_))));

        let too_large = builder_with_bridges()
            .history_capacity(MAX_HISTORY_CAPACITY + 1)
            .build();
        assert!(matches!(too_large, Err(Error::Config(_))));

        let max = builder_with_bridges()
            .history_capacity(MAX_HISTORY_CAPACITY)
            .build()
            .unwrap();
        assert_eq!(max.history.capacity, MAX_HISTORY_CAPACITY);
    }

    #[test]
    fn test_history_slot_must_not_be_blank() {
        let result = builder_with_bridges()
            .history(HistoryConfig::default().with_slot("  "))
            .build();

        assert!(result
            .unwrap_err()
            .to_string()
            .contains("History slot name cannot be empty"));
    }

    #[test]
    fn test_event_buffer_must_be_positive() {
        let result = builder_with_bridges().event_buffer_size(0).build();
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_debug_hides_bridges() {
        let config = builder_with_bridges().build().unwrap();
        let debug = format!("{:?}", config);

        assert!(debug.contains("CatalogGateway { ... }"));
        assert!(debug.contains("capacity: 20"));
    }
}
