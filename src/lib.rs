//! Workspace placeholder crate.
//!
//! This crate exposes feature flags that map to the individual workspace
//! crates (`core-service`, `core-library`, `core-playback`). Host
//! applications can depend on `cadence-workspace` and enable the documented
//! features without wiring each crate individually.

#[cfg(any(feature = "desktop-shims", feature = "rest-gateway"))]
pub use core_service as service;

#[cfg(feature = "library-only")]
pub use core_library as library;

#[cfg(feature = "library-only")]
pub use core_playback as playback;
