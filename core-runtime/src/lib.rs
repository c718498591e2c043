//! # Core Runtime Module
//!
//! Foundational infrastructure shared by the Cadence core crates:
//! - Logging and tracing setup
//! - Configuration with fail-fast bridge validation
//! - The event bus, including user-facing notifications

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use config::{CoreConfig, CoreConfigBuilder, HistoryConfig};
pub use error::{Error, Result};
pub use events::{CoreEvent, EventBus, EventStream, Notification, NotificationLevel};
