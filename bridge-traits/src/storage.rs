//! Durable Local State
//!
//! Key-value slots that survive application restarts. The core keeps small
//! client-owned state here (the play history mirror, preferences); everything
//! shared with other devices lives behind the
//! [`CatalogGateway`](crate::gateway::CatalogGateway).

use async_trait::async_trait;

use crate::error::Result;

/// Key-value settings storage trait
///
/// Abstracts platform-specific preferences storage:
/// - Desktop: SQLite file in the user's data directory
/// - Web: localStorage
/// - Tests: in-memory SQLite or hand-written fakes
///
/// Values are strings; callers serialise structured data themselves
/// (the history ledger stores a JSON array in a single slot).
///
/// # Example
///
/// ```ignore
/// use bridge_traits::storage::SettingsStore;
///
/// async fn remember_filter(store: &dyn SettingsStore) -> Result<()> {
///     store.set_string("last_language", "Tamil").await?;
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Store a string value, replacing any previous value
    async fn set_string(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a string value
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Delete a setting. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Check if a setting exists
    async fn has_key(&self, key: &str) -> Result<bool> {
        Ok(self.get_string(key).await?.is_some())
    }

    /// List all setting keys
    async fn list_keys(&self) -> Result<Vec<String>>;

    /// Clear all settings
    async fn clear_all(&self) -> Result<()>;
}
