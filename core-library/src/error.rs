use bridge_traits::error::BridgeError;
use core_auth::AuthError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibraryError {
    #[error("Invalid input: {field} - {message}")]
    InvalidInput { field: String, message: String },

    #[error("Sign-in required")]
    AuthRequired,

    #[error("Not authorized: {0}")]
    Forbidden(String),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Playlist {playlist_id} already contains track {track_id}")]
    Duplicate {
        playlist_id: String,
        track_id: String,
    },

    /// A backend row failed validation while being mapped into a model
    #[error("Invalid {entity_type} record {id}: {reason}")]
    InvalidRecord {
        entity_type: String,
        id: String,
        reason: String,
    },

    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Coarse classification used by callers that only care about the kind of
/// failure (for instance to pick a notification message).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    AuthRequired,
    Authorization,
    NotFound,
    /// Informational; the requested state already holds
    Duplicate,
    Persistence,
}

impl LibraryError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        LibraryError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn not_found(entity_type: impl Into<String>, id: impl Into<String>) -> Self {
        LibraryError::NotFound {
            entity_type: entity_type.into(),
            id: id.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            LibraryError::InvalidInput { .. } => ErrorKind::Validation,
            LibraryError::AuthRequired => ErrorKind::AuthRequired,
            LibraryError::Forbidden(_) => ErrorKind::Authorization,
            LibraryError::NotFound { .. } => ErrorKind::NotFound,
            LibraryError::Duplicate { .. } => ErrorKind::Duplicate,
            LibraryError::InvalidRecord { .. } | LibraryError::Persistence(_) => {
                ErrorKind::Persistence
            }
        }
    }
}

impl From<BridgeError> for LibraryError {
    fn from(err: BridgeError) -> Self {
        match err {
            BridgeError::NotFound(what) => LibraryError::not_found("resource", what),
            other => LibraryError::Persistence(other.to_string()),
        }
    }
}

impl From<AuthError> for LibraryError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NotAuthenticated | AuthError::InvalidClaims(_) => LibraryError::AuthRequired,
            AuthError::InsufficientRole { .. } => LibraryError::Forbidden(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, LibraryError>;
