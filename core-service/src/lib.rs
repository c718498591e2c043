//! Core service façade and bootstrap helpers.
//!
//! This crate wires the host-provided bridges (catalog gateway, settings
//! store) into the catalog, playlist and playback crates and exposes them
//! through one [`CoreService`] handle. Desktop apps typically enable the
//! `desktop-shims` feature, which lets [`CoreConfig`] default to the SQLite
//! settings store from `bridge-desktop`. The `rest-gateway` feature adds
//! [`bootstrap_rest`] for hosted backends.
//!
//! Outcomes of user-triggered operations are published as
//! [`Notification`]s on the event bus, so a UI can render toasts from one
//! subscription:
//!
//! ```ignore
//! let core = CoreService::new(config).await?;
//! let mut toasts = core
//!     .subscribe()
//!     .filter(|e| matches!(e, CoreEvent::Notification(_)));
//!
//! core.create_playlist("Favorites").await.ok();
//! ```

pub mod error;
pub mod notifications;
mod service;

pub use error::{CoreError, Result};
pub use service::{CoreService, Download};

pub use core_runtime::config::{CoreConfig, CoreConfigBuilder, HistoryConfig};
pub use core_runtime::events::{CoreEvent, EventStream, Notification, NotificationLevel};

#[cfg(feature = "rest-gateway")]
pub use bridge_desktop::RestGatewayConfig;

/// Convenience bootstrapper for a hosted REST backend.
///
/// Opens the SQLite settings store in `data_dir` and connects the REST
/// gateway described by `gateway`.
///
/// ```no_run
/// # #[cfg(feature = "rest-gateway")]
/// # async fn example() -> core_service::Result<()> {
/// use core_service::{bootstrap_rest, RestGatewayConfig};
///
/// let gateway = RestGatewayConfig::new("https://demo.supabase.co", "anon-key");
/// let core = bootstrap_rest(gateway, "/tmp/cadence").await?;
/// core.refresh_catalog().await?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "rest-gateway")]
pub async fn bootstrap_rest(
    gateway: RestGatewayConfig,
    data_dir: impl Into<std::path::PathBuf>,
) -> Result<CoreService> {
    use bridge_desktop::{RestCatalogGateway, SqliteSettingsStore, SETTINGS_FILE_NAME};
    use std::sync::Arc;

    let gateway = RestCatalogGateway::new(gateway)
        .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;
    let settings = SqliteSettingsStore::new(data_dir.into().join(SETTINGS_FILE_NAME))
        .await
        .map_err(|err| CoreError::InitializationFailed(err.to_string()))?;

    let config = CoreConfig::builder()
        .gateway(Arc::new(gateway))
        .settings_store(Arc::new(settings))
        .build()?;

    CoreService::new(config).await
}
