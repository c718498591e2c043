//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - [`SqliteSettingsStore`] - `SettingsStore` on a SQLite key-value table
//! - [`RestCatalogGateway`] - `CatalogGateway` against a hosted REST backend
//!   using `reqwest`
//! - [`LocalCatalogGateway`] - `CatalogGateway` kept in process memory, for
//!   offline use and tests
//!
//! ## Feature Flags
//!
//! - `rest-gateway`: Enable the hosted REST gateway (default)
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{RestCatalogGateway, RestGatewayConfig, SqliteSettingsStore};
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let gateway = RestCatalogGateway::new(RestGatewayConfig::new(
//!         "https://demo.supabase.co",
//!         "anon-key",
//!     ))?;
//!     let settings = SqliteSettingsStore::in_memory().await?;
//!
//!     // Use in core configuration
//!     Ok(())
//! }
//! ```

mod local_gateway;
mod settings;

#[cfg(feature = "rest-gateway")]
mod rest_gateway;

pub use local_gateway::LocalCatalogGateway;
pub use settings::{SqliteSettingsStore, SETTINGS_FILE_NAME};

#[cfg(feature = "rest-gateway")]
pub use rest_gateway::{RestCatalogGateway, RestGatewayConfig};
