//! # Playback Error Types
//!
//! Failures of the history mirror. Public playback operations never return
//! these: the ledger logs them and keeps its in-memory state.

use bridge_traits::BridgeError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlaybackError {
    /// The settings store could not be read or written.
    #[error("History storage failed: {0}")]
    Storage(#[from] BridgeError),

    /// The persisted history slot is not valid JSON of the expected shape.
    #[error("Persisted history is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
